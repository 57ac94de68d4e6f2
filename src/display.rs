/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only projects
/// world coordinates onto the terminal and translates state into
/// terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use crate::compute::{COIN_VALUE, PLAYER_W, WORLD_H, WORLD_W};
use crate::entities::{Cloud, Coin, Effect, EffectKind, Enemy, GameState, GameStatus, Platform, Player};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_HEALTH: Color = Color::Red;
const C_HUD_LIVES: Color = Color::Magenta;
const C_PLAYER: Color = Color::Red;
const C_PLAYER_FLASH: Color = Color::White;
const C_ENEMY: Color = Color::Magenta;
const C_COIN: Color = Color::Yellow;
const C_GROUND: Color = Color::Green;
const C_PLATFORM: Color = Color::DarkYellow;
const C_CLOUD: Color = Color::White;
const C_DUST: Color = Color::DarkGrey;
const C_POPUP: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

// ── World → terminal projection ───────────────────────────────────────────────

/// The playfield interior is columns `1..=cols-2` between the border
/// rows: row 0 is the HUD, row 1 the top bar, row `rows-2` the bottom
/// bar and row `rows-1` the controls hint.
struct Viewport {
    cols: u16,
    rows: u16,
}

impl Viewport {
    fn sx(&self, wx: f32) -> u16 {
        let inner = self.cols.saturating_sub(2).max(1);
        let col = 1.0 + wx / WORLD_W * inner as f32;
        (col as u16).clamp(1, inner)
    }

    fn sy(&self, wy: f32) -> u16 {
        let inner = self.rows.saturating_sub(4).max(1);
        let row = 2.0 + wy / WORLD_H * inner as f32;
        (row as u16).clamp(2, self.rows.saturating_sub(3).max(2))
    }

    fn play_bottom(&self) -> u16 {
        self.rows.saturating_sub(3).max(2)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame onto a `cols` × `rows` terminal.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let vp = Viewport { cols, rows };

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, &vp)?;
    draw_hud(out, state, &vp)?;

    for cloud in &state.clouds {
        draw_cloud(out, &vp, cloud)?;
    }
    for plat in &state.platforms {
        draw_platform(out, &vp, plat)?;
    }
    for coin in &state.coins {
        draw_coin(out, &vp, coin)?;
    }
    for enemy in &state.enemies {
        draw_enemy(out, &vp, enemy)?;
    }
    for effect in &state.effects {
        draw_effect(out, &vp, effect)?;
    }
    if let Some(player) = &state.player {
        draw_player(out, &vp, player)?;
    }

    draw_controls_hint(out, &vp)?;

    if state.status == GameStatus::GameOver {
        draw_game_over(out, state, &vp)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, vp: &Viewport) -> std::io::Result<()> {
    let w = vp.cols as usize;
    let h = vp.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(vp.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, vp: &Viewport) -> std::io::Result<()> {
    // Score — left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {:>6}", state.score)))?;

    // Health — centre
    let health_text = format!("Health: {}", "♥".repeat(state.health as usize));
    let cx = (vp.cols / 2).saturating_sub(health_text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(cx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
    out.queue(Print(&health_text))?;

    // Lives — right
    let lives_text = format!("Lives: {}", "♥".repeat(state.lives as usize));
    let rx = vp
        .cols
        .saturating_sub(lives_text.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_text))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_platform<W: Write>(out: &mut W, vp: &Viewport, plat: &Platform) -> std::io::Result<()> {
    let x0 = vp.sx(plat.x);
    let x1 = vp.sx(plat.x + plat.w);
    let y = vp.sy(plat.y);
    let len = x1.saturating_sub(x0) as usize + 1;

    let color = if plat.w >= WORLD_W { C_GROUND } else { C_PLATFORM };
    out.queue(style::SetForegroundColor(color))?;
    out.queue(cursor::MoveTo(x0, y))?;
    out.queue(Print("█".repeat(len)))?;
    Ok(())
}

fn draw_player<W: Write>(out: &mut W, vp: &Viewport, p: &Player) -> std::io::Result<()> {
    // Sprite (2 rows, 1 col):
    //   ●    ← head
    //   █    ← body
    let color = if p.flash > 0.0 { C_PLAYER_FLASH } else { C_PLAYER };
    let x = vp.sx(p.x + PLAYER_W / 2.0);
    let y = vp.sy(p.y);

    out.queue(style::SetForegroundColor(color))?;
    out.queue(cursor::MoveTo(x, y))?;
    out.queue(Print("●"))?;
    if y + 1 <= vp.play_bottom() {
        out.queue(cursor::MoveTo(x, y + 1))?;
        out.queue(Print("█"))?;
    }
    Ok(())
}

fn draw_enemy<W: Write>(out: &mut W, vp: &Viewport, enemy: &Enemy) -> std::io::Result<()> {
    let x = vp.sx(enemy.x);
    let y = vp.sy(enemy.y);
    out.queue(style::SetForegroundColor(C_ENEMY))?;
    out.queue(cursor::MoveTo(x, y))?;
    out.queue(Print("<ö>"))?;
    Ok(())
}

fn draw_coin<W: Write>(out: &mut W, vp: &Viewport, coin: &Coin) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(vp.sx(coin.x), vp.sy(coin.y)))?;
    out.queue(style::SetForegroundColor(C_COIN))?;
    out.queue(Print("$"))?;
    Ok(())
}

fn draw_cloud<W: Write>(out: &mut W, vp: &Viewport, cloud: &Cloud) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(vp.sx(cloud.x), vp.sy(cloud.y)))?;
    out.queue(style::SetForegroundColor(C_CLOUD))?;
    out.queue(Print("~"))?;
    Ok(())
}

fn draw_effect<W: Write>(out: &mut W, vp: &Viewport, effect: &Effect) -> std::io::Result<()> {
    let (text, color) = match effect.kind {
        EffectKind::Dust => (".".to_string(), C_DUST),
        EffectKind::JumpDust => ("∙".to_string(), C_DUST),
        EffectKind::JumpFlash => ("*".to_string(), Color::Yellow),
        EffectKind::ScorePopup => (format!("+{}", COIN_VALUE), C_POPUP),
    };
    out.queue(cursor::MoveTo(vp.sx(effect.x), vp.sy(effect.y)))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, vp: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, vp.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE : Jump   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, state: &GameState, vp: &Viewport) -> std::io::Result<()> {
    let score_line = format!("Final Score: {}", state.score);
    let lines: &[(&str, Color)] = &[
        ("╔══════════════════╗", Color::Red),
        ("║    GAME  OVER    ║", Color::Red),
        ("╚══════════════════╝", Color::Red),
        (&score_line, Color::Yellow),
        ("R - Play Again  Q - Quit", Color::White),
    ];

    let cx = vp.cols / 2;
    let start_row = (vp.rows / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}
