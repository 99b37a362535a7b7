/// All game entity types — pure data, plus the shared geometry/damage
/// capability (`Rect`, `Body`) that both combatant types are built from.

#[derive(Clone, Debug, PartialEq)]
pub enum Phase {
    Menu,
    Play,
    GameOver,
}

/// Discrete UI actions routed back from the presentation adapter.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Start,
    Retry,
    Menu,
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in world units.
#[derive(Clone, Debug, PartialEq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    /// Non-strict intersection: touching edges count as overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x <= other.x + other.w
            && other.x <= self.x + self.w
            && self.y <= other.y + other.h
            && other.y <= self.y + self.h
    }

    /// Non-strict point containment (edges included).
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x <= self.x + self.w && y >= self.y && y <= self.y + self.h
    }
}

// ── Shared combatant body ─────────────────────────────────────────────────────

/// Position, size and health shared by player and enemies.  Sub-pixel
/// position is simulated in floats; collision always goes through the
/// truncated `rect()` so the boundary rule stays symmetric.
#[derive(Clone, Debug)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub w: i32,
    pub h: i32,
    pub hp: i32,
}

impl Body {
    /// Subtract `amount` from health, clamping at 0.
    pub fn take_damage(&mut self, amount: i32) {
        self.hp = (self.hp - amount).max(0);
    }

    /// Derived: a body with no health left takes no further actions.
    pub fn alive(&self) -> bool {
        self.hp > 0
    }

    /// Bounding box with integer-truncated coordinates.
    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x as i32,
            y: self.y as i32,
            w: self.w,
            h: self.h,
        }
    }
}

// ── Player & enemy ────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub body: Body,
    pub speed: f32,
    /// Damage dealt by one connecting swing.
    pub damage: i32,
    /// Ticks remaining until the next swing is allowed.
    pub cooldown: u32,
    /// Facing direction: -1 left, +1 right.
    pub face: i32,
    pub score: u32,
    pub kills: u32,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub body: Body,
    pub speed: f32,
    /// Damage applied on contact with the player.
    pub damage: i32,
    /// Ticks remaining until this enemy may deal contact damage again.
    pub hit_cooldown: u32,
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// One tick's worth of sampled key state.  Built once per frame by the
/// adapter; the simulation never re-queries live input mid-tick.
#[derive(Clone, Debug, Default)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub attack: bool,
}

// ── Per-tick effects ──────────────────────────────────────────────────────────

/// Side effects of one tick, for the presentation layer only.
#[derive(Clone, Debug, Default)]
pub struct TickFx {
    /// Hitbox of a swing that happened this tick (sound + one-frame flash).
    pub swing: Option<Rect>,
    /// Enemies killed this tick.
    pub kills: u32,
}

// ── Master match state ────────────────────────────────────────────────────────

/// The entire match state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct MatchState {
    pub phase: Phase,
    pub player: Player,
    /// Every enemy currently in the arena (dead ones are pruned each tick).
    pub enemies: Vec<Enemy>,
    /// Difficulty parameter stamped onto enemies at spawn time.
    pub wave: u32,
    /// Ticks since the last spawn.
    pub spawn_timer: u32,
    /// Elapsed Play ticks this match.
    pub frame: u64,
}
