/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// match state.  No game logic is performed; this module only translates
/// world-space state onto the terminal grid.  The same scaling is exposed
/// in reverse (`cell_to_world`) so the input side can map clicks back onto
/// the core's hit-regions.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use crate::compute::{
    game_over_panel, menu_button, retry_button, start_button, PLAYER_MAX_HP, SCREEN_H, SCREEN_W,
};
use crate::entities::{MatchState, Phase, Rect, TickFx};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_TITLE: Color = Color::Cyan;
const C_HUD: Color = Color::Yellow;
const C_HP_OK: Color = Color::Green;
const C_HP_LOW: Color = Color::Red;
const C_PLAYER: Color = Color::Cyan;
const C_ENEMY: Color = Color::Red;
const C_SWING: Color = Color::Yellow;
const C_BUTTON: Color = Color::Blue;
const C_PANEL: Color = Color::White;
const C_GAME_OVER: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;

/// Hp fraction below which the bar turns red.
const LOW_HP_NUM: i32 = 1;
const LOW_HP_DEN: i32 = 4;

// ── World ↔ cell mapping ─────────────────────────────────────────────────────

/// World x → column.  Clamped into the visible world first; the result may
/// equal `tw` when used as an exclusive right edge.
fn cell_x(x: i32, tw: u16) -> u16 {
    (x.clamp(0, SCREEN_W) as i64 * tw as i64 / SCREEN_W as i64) as u16
}

fn cell_y(y: i32, th: u16) -> u16 {
    (y.clamp(0, SCREEN_H) as i64 * th as i64 / SCREEN_H as i64) as u16
}

/// Terminal cell → world coordinate, for routing mouse clicks.
pub fn cell_to_world(column: u16, row: u16, tw: u16, th: u16) -> (i32, i32) {
    (
        column as i32 * SCREEN_W / tw.max(1) as i32,
        row as i32 * SCREEN_H / th.max(1) as i32,
    )
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame for the current phase.
pub fn render<W: Write>(out: &mut W, state: &MatchState, fx: &TickFx) -> std::io::Result<()> {
    let (tw, th) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    match state.phase {
        Phase::Menu => draw_menu(out, tw, th)?,
        Phase::Play => draw_play(out, state, fx, tw, th)?,
        Phase::GameOver => draw_game_over(out, state, tw, th)?,
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, th.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Shared helpers ────────────────────────────────────────────────────────────

fn print_centered<W: Write>(
    out: &mut W,
    row: u16,
    text: &str,
    color: Color,
    tw: u16,
) -> std::io::Result<()> {
    let col = (tw / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

/// Fill a world-space rectangle with a repeated glyph, clipped to the
/// visible area.  Anything fully off-screen draws nothing.
fn fill_rect<W: Write>(
    out: &mut W,
    rect: &Rect,
    glyph: char,
    color: Color,
    tw: u16,
    th: u16,
) -> std::io::Result<()> {
    let x0 = rect.x.max(0);
    let y0 = rect.y.max(0);
    let x1 = (rect.x + rect.w).min(SCREEN_W);
    let y1 = (rect.y + rect.h).min(SCREEN_H);
    if x0 >= x1 || y0 >= y1 {
        return Ok(());
    }

    let c0 = cell_x(x0, tw);
    let c1 = cell_x(x1, tw).max(c0 + 1).min(tw);
    let r0 = cell_y(y0, th);
    let r1 = cell_y(y1, th).max(r0 + 1).min(th);

    let line: String = std::iter::repeat(glyph).take((c1 - c0) as usize).collect();
    out.queue(style::SetForegroundColor(color))?;
    for row in r0..r1 {
        out.queue(cursor::MoveTo(c0, row))?;
        out.queue(Print(&line))?;
    }
    Ok(())
}

/// Draw a box frame around a world-space rectangle.  Returns the cell
/// bounds (left col, top row, right col, bottom row) so callers can place
/// content inside.
fn draw_frame<W: Write>(
    out: &mut W,
    rect: &Rect,
    color: Color,
    tw: u16,
    th: u16,
) -> std::io::Result<(u16, u16, u16, u16)> {
    let c0 = cell_x(rect.x, tw);
    let c1 = cell_x(rect.x + rect.w, tw)
        .max(c0 + 3)
        .min(tw.saturating_sub(1));
    let r0 = cell_y(rect.y, th);
    let r1 = cell_y(rect.y + rect.h, th)
        .max(r0 + 2)
        .min(th.saturating_sub(1));
    let inner = c1.saturating_sub(c0).saturating_sub(1) as usize;

    out.queue(style::SetForegroundColor(color))?;
    out.queue(cursor::MoveTo(c0, r0))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(inner))))?;
    for row in r0 + 1..r1 {
        out.queue(cursor::MoveTo(c0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(c1, row))?;
        out.queue(Print("│"))?;
    }
    out.queue(cursor::MoveTo(c0, r1))?;
    out.queue(Print(format!("└{}┘", "─".repeat(inner))))?;

    Ok((c0, r0, c1, r1))
}

/// A clickable button: frame plus a centered label.
fn draw_button<W: Write>(
    out: &mut W,
    rect: &Rect,
    label: &str,
    tw: u16,
    th: u16,
) -> std::io::Result<()> {
    let (c0, r0, c1, r1) = draw_frame(out, rect, C_BUTTON, tw, th)?;
    let mid = r0 + r1.saturating_sub(r0) / 2;
    let width = c1.saturating_sub(c0) as usize;
    let col = c0 + width.saturating_sub(label.chars().count()) as u16 / 2;
    out.queue(cursor::MoveTo(col.max(c0 + 1), mid))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(label))?;
    Ok(())
}

// ── Menu ──────────────────────────────────────────────────────────────────────

fn draw_menu<W: Write>(out: &mut W, tw: u16, th: u16) -> std::io::Result<()> {
    print_centered(out, cell_y(180, th), "★  WARRIOR  RUSH  ★", C_TITLE, tw)?;
    print_centered(
        out,
        cell_y(230, th),
        "Survive the rush — cut down everything that comes",
        C_HINT,
        tw,
    )?;

    draw_button(out, &start_button(), "START", tw, th)?;

    out.queue(cursor::MoveTo(1, th.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("Click START or press ENTER   Q : Quit"))?;
    Ok(())
}

// ── Play ──────────────────────────────────────────────────────────────────────

fn draw_play<W: Write>(
    out: &mut W,
    state: &MatchState,
    fx: &TickFx,
    tw: u16,
    th: u16,
) -> std::io::Result<()> {
    draw_hud(out, state)?;

    for enemy in &state.enemies {
        fill_rect(out, &enemy.body.rect(), '▓', C_ENEMY, tw, th)?;
    }

    fill_rect(out, &state.player.body.rect(), '█', C_PLAYER, tw, th)?;

    // One-frame flash where the swing connected this tick
    if let Some(hitbox) = &fx.swing {
        fill_rect(out, hitbox, '░', C_SWING, tw, th)?;
    }

    out.queue(cursor::MoveTo(1, th.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("WASD / ← ↑ ↓ → : Move   SPACE : Attack   Q : Quit"))?;
    Ok(())
}

fn draw_hud<W: Write>(out: &mut W, state: &MatchState) -> std::io::Result<()> {
    let p = &state.player;

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(format!(
        "Score: {:>6}   Kills: {:>4}   Wave: {}",
        p.score, p.kills, state.wave
    )))?;

    // Health bar, width proportional to current hp (20 cells at full)
    let filled = (p.body.hp * 20 / PLAYER_MAX_HP).clamp(0, 20) as usize;
    let color = if p.body.hp * LOW_HP_DEN <= PLAYER_MAX_HP * LOW_HP_NUM {
        C_HP_LOW
    } else {
        C_HP_OK
    };
    out.queue(cursor::MoveTo(1, 1))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(format!(
        "HP [{}{}] {:>3}/{}",
        "█".repeat(filled),
        "░".repeat(20 - filled),
        p.body.hp,
        PLAYER_MAX_HP
    )))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    state: &MatchState,
    tw: u16,
    th: u16,
) -> std::io::Result<()> {
    let (_, r0, _, _) = draw_frame(out, &game_over_panel(), C_PANEL, tw, th)?;

    print_centered(out, r0 + 1, "G A M E   O V E R", C_GAME_OVER, tw)?;
    print_centered(
        out,
        r0 + 3,
        &format!("FINAL SCORE : {}", state.player.score),
        C_PANEL,
        tw,
    )?;
    print_centered(
        out,
        r0 + 4,
        &format!("ENEMY KILLED: {}", state.player.kills),
        C_PANEL,
        tw,
    )?;

    draw_button(out, &retry_button(), "RETRY", tw, th)?;
    draw_button(out, &menu_button(), "MENU", tw, th)?;

    out.queue(cursor::MoveTo(1, th.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("Click a button, or press R : Retry   M : Menu   Q : Quit"))?;
    Ok(())
}
