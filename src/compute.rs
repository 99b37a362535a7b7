/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current state
/// (and, where needed, an RNG handle) and returns a brand-new value.  Side
/// effects are limited to the injected RNG; everything the presentation
/// layer must react to comes back in `TickFx`.

use rand::Rng;

use crate::entities::{
    Action, Body, Enemy, InputSnapshot, MatchState, Phase, Player, Rect, TickFx,
};

// ── World constants ──────────────────────────────────────────────────────────

pub const SCREEN_W: i32 = 800;
pub const SCREEN_H: i32 = 600;
/// Top strip reserved for the status bar; the player cannot enter it.
pub const HUD_MARGIN: i32 = 100;

pub const PLAYER_SIZE: i32 = 96;
pub const PLAYER_MAX_HP: i32 = 200;
pub const PLAYER_SPEED: f32 = 4.0;
pub const PLAYER_DAMAGE: i32 = 45;
/// Ticks before another swing is allowed.
pub const SWING_RECOVERY: u32 = 20;
pub const SWING_REACH: i32 = 50;
pub const SWING_HEIGHT: i32 = 45;
pub const SWING_Y_OFFSET: i32 = 25;

pub const ENEMY_SIZE: i32 = 80;
/// Ticks before the same enemy may deal contact damage again.
pub const CONTACT_RECOVERY: u32 = 45;

/// A new enemy appears once the spawn timer exceeds this many ticks.
pub const SPAWN_INTERVAL: u32 = 80;
/// How far outside the visible area enemies spawn.
pub const SPAWN_OFFSET: i32 = 90;
/// Left/right edges only spawn in the lower band of the screen; the top
/// strip is HUD and empty sky.
pub const SIDE_SPAWN_MIN_Y: i32 = 300;

pub const KILL_SCORE: u32 = 10;

// ── Wave difficulty tables ───────────────────────────────────────────────────

fn wave_health(wave: u32) -> i32 {
    35 + 5 * wave as i32
}

fn wave_speed(wave: u32) -> f32 {
    1.2 + 0.1 * wave as f32
}

fn wave_damage(wave: u32) -> i32 {
    7 + wave as i32
}

// ── Constructors ─────────────────────────────────────────────────────────────

pub fn new_player() -> Player {
    Player {
        body: Body {
            x: 100.0,
            y: 420.0,
            w: PLAYER_SIZE,
            h: PLAYER_SIZE,
            hp: PLAYER_MAX_HP,
        },
        speed: PLAYER_SPEED,
        damage: PLAYER_DAMAGE,
        cooldown: 0,
        face: 1,
        score: 0,
        kills: 0,
    }
}

/// Build an enemy at a position with stats derived from the wave number.
pub fn new_enemy(x: f32, y: f32, wave: u32) -> Enemy {
    Enemy {
        body: Body {
            x,
            y,
            w: ENEMY_SIZE,
            h: ENEMY_SIZE,
            hp: wave_health(wave),
        },
        speed: wave_speed(wave),
        damage: wave_damage(wave),
        hit_cooldown: 0,
    }
}

/// Reinitialize the match: fresh player, empty arena, timers at zero.
/// A full reset lands in the menu; a quick reset goes straight to play.
pub fn reset(full: bool) -> MatchState {
    MatchState {
        phase: if full { Phase::Menu } else { Phase::Play },
        player: new_player(),
        enemies: Vec::new(),
        wave: 1,
        spawn_timer: 0,
        frame: 0,
    }
}

/// Initial state at process start.
pub fn new_match() -> MatchState {
    reset(true)
}

// ── UI hit-regions (world units, exposed for click routing) ──────────────────

pub fn start_button() -> Rect {
    Rect { x: 280, y: 360, w: 240, h: 60 }
}

/// Game-over panel, centered on screen.
pub fn game_over_panel() -> Rect {
    Rect { x: 190, y: 160, w: 420, h: 280 }
}

pub fn retry_button() -> Rect {
    Rect { x: 230, y: 373, w: 160, h: 55 }
}

pub fn menu_button() -> Rect {
    Rect { x: 410, y: 373, w: 160, h: 55 }
}

// ── State-machine actions ────────────────────────────────────────────────────

/// Apply a discrete UI action.  Actions delivered in the wrong phase are
/// no-ops.
pub fn apply_action(state: &MatchState, action: Action) -> MatchState {
    match (&state.phase, action) {
        (Phase::Menu, Action::Start) => reset(false),
        (Phase::GameOver, Action::Retry) => reset(false),
        (Phase::GameOver, Action::Menu) => reset(true),
        _ => state.clone(),
    }
}

// ── Player (pure) ────────────────────────────────────────────────────────────

/// Advance the player one tick of movement.  Axes are independent and
/// diagonal movement is not normalized, so diagonals run √2 faster.  Right
/// wins a same-tick facing tie because it is evaluated last.  The swing
/// cooldown decrements every tick regardless of movement.
pub fn move_player(player: &Player, input: &InputSnapshot) -> Player {
    let mut dx = 0.0f32;
    let mut dy = 0.0f32;
    let mut face = player.face;

    if input.left {
        dx = -1.0;
        face = -1;
    }
    if input.right {
        dx = 1.0;
        face = 1;
    }
    if input.up {
        dy = -1.0;
    }
    if input.down {
        dy = 1.0;
    }

    let x = (player.body.x + dx * player.speed).clamp(0.0, (SCREEN_W - player.body.w) as f32);
    let y = (player.body.y + dy * player.speed)
        .clamp(HUD_MARGIN as f32, (SCREEN_H - player.body.h) as f32);

    Player {
        body: Body { x, y, ..player.body.clone() },
        face,
        cooldown: player.cooldown.saturating_sub(1),
        ..player.clone()
    }
}

/// Attempt a melee swing.  Returns the player with the recovery window set
/// and the one-tick hitbox, or `None` while still recovering.  The hitbox
/// extends from the player's leading edge in the facing direction.
pub fn player_swing(player: &Player) -> (Player, Option<Rect>) {
    if player.cooldown > 0 {
        return (player.clone(), None);
    }

    let reach_x = if player.face == 1 {
        player.body.x + player.body.w as f32
    } else {
        player.body.x - SWING_REACH as f32
    };
    let hitbox = Rect {
        x: reach_x as i32,
        y: (player.body.y + SWING_Y_OFFSET as f32) as i32,
        w: SWING_REACH,
        h: SWING_HEIGHT,
    };

    (
        Player { cooldown: SWING_RECOVERY, ..player.clone() },
        Some(hitbox),
    )
}

// ── Enemy (pure) ─────────────────────────────────────────────────────────────

/// Pure pursuit: advance along the unit vector toward the player's
/// position.  At exactly zero distance the enemy holds still (no division
/// by zero).
pub fn enemy_chase(enemy: &Enemy, target_x: f32, target_y: f32) -> Enemy {
    let dx = target_x - enemy.body.x;
    let dy = target_y - enemy.body.y;
    let dist = dx.hypot(dy);
    if dist == 0.0 {
        return enemy.clone();
    }

    Enemy {
        body: Body {
            x: enemy.body.x + dx / dist * enemy.speed,
            y: enemy.body.y + dy / dist * enemy.speed,
            ..enemy.body.clone()
        },
        ..enemy.clone()
    }
}

/// Resolve contact damage for one enemy.  While the cooldown is running it
/// only decrements; an enemy never strikes on a decrement tick.
pub fn enemy_strike(enemy: &Enemy, player: &Player) -> (Enemy, Player) {
    if enemy.hit_cooldown > 0 {
        return (
            Enemy { hit_cooldown: enemy.hit_cooldown - 1, ..enemy.clone() },
            player.clone(),
        );
    }

    if enemy.body.rect().overlaps(&player.body.rect()) {
        let mut hit = player.clone();
        hit.body.take_damage(enemy.damage);
        return (
            Enemy { hit_cooldown: CONTACT_RECOVERY, ..enemy.clone() },
            hit,
        );
    }

    (enemy.clone(), player.clone())
}

// ── Spawn director ───────────────────────────────────────────────────────────

/// Pick one of the four screen edges and place a new enemy just outside the
/// visible area.  All randomness comes through `rng` so callers control
/// determinism.
pub fn spawn_enemy(wave: u32, rng: &mut impl Rng) -> Enemy {
    let (x, y) = match rng.gen_range(0..4) {
        0 => (rng.gen_range(0..=SCREEN_W) as f32, -(SPAWN_OFFSET as f32)),
        1 => (
            rng.gen_range(0..=SCREEN_W) as f32,
            (SCREEN_H + SPAWN_OFFSET) as f32,
        ),
        2 => (
            -(SPAWN_OFFSET as f32),
            rng.gen_range(SIDE_SPAWN_MIN_Y..=SCREEN_H) as f32,
        ),
        _ => (
            (SCREEN_W + SPAWN_OFFSET) as f32,
            rng.gen_range(SIDE_SPAWN_MIN_Y..=SCREEN_H) as f32,
        ),
    };
    new_enemy(x, y, wave)
}

// ── Per-tick update ──────────────────────────────────────────────────────────

/// Advance the simulation by one tick.  Outside the Play phase this is the
/// identity transition; the state machine only moves on discrete actions.
pub fn tick(state: &MatchState, input: &InputSnapshot, rng: &mut impl Rng) -> (MatchState, TickFx) {
    if state.phase != Phase::Play {
        return (state.clone(), TickFx::default());
    }

    let frame = state.frame + 1;
    let mut fx = TickFx::default();

    // ── 1. Player movement ───────────────────────────────────────────────────
    let mut player = move_player(&state.player, input);
    let mut enemies = state.enemies.clone();

    // ── 2. Swing resolution ──────────────────────────────────────────────────
    // Each overlapping enemy is damaged once; score and kill count move only
    // on the alive→dead transition, so a corpse can never be counted twice.
    if input.attack {
        let (recovered, hitbox) = player_swing(&player);
        player = recovered;
        if let Some(hb) = hitbox {
            for enemy in enemies.iter_mut() {
                if enemy.body.alive() && hb.overlaps(&enemy.body.rect()) {
                    enemy.body.take_damage(player.damage);
                    if !enemy.body.alive() {
                        player.score += KILL_SCORE;
                        player.kills += 1;
                        fx.kills += 1;
                    }
                }
            }
            fx.swing = Some(hb);
        }
    }

    // ── 3. Enemy pursuit & contact damage ────────────────────────────────────
    // Enemies killed by the swing take no further actions and drop out here.
    let mut survivors: Vec<Enemy> = Vec::with_capacity(enemies.len());
    for enemy in &enemies {
        if !enemy.body.alive() {
            continue;
        }
        let chased = enemy_chase(enemy, player.body.x, player.body.y);
        let (struck, hit_player) = enemy_strike(&chased, &player);
        player = hit_player;
        survivors.push(struck);
    }
    let mut enemies = survivors;

    // ── 4. Spawn director ────────────────────────────────────────────────────
    let mut spawn_timer = state.spawn_timer + 1;
    if spawn_timer > SPAWN_INTERVAL {
        spawn_timer = 0;
        enemies.push(spawn_enemy(state.wave, rng));
    }

    // ── 5. Defeat check ──────────────────────────────────────────────────────
    let phase = if player.body.alive() {
        Phase::Play
    } else {
        Phase::GameOver
    };

    (
        MatchState {
            phase,
            player,
            enemies,
            wave: state.wave,
            spawn_timer,
            frame,
        },
        fx,
    )
}
