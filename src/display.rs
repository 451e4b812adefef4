/// Rendering layer. All terminal output lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state. No game logic is performed; this module only translates
/// state into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::assets::{AssetCatalog, Sprite};
use crate::entities::{EnemyKind, EntityRef, GameState, GameStatus, PowerUpKind, Rect};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BACKGROUND: Color = Color::DarkGrey;
const C_HUD_HEALTH: Color = Color::Red;
const C_HUD_KILLS: Color = Color::White;
const C_HUD_ROUND: Color = Color::Yellow;
const C_PLAYER: Color = Color::White;
const C_ENEMY_WEAK: Color = Color::Green;
const C_ENEMY_MID: Color = Color::Yellow;
const C_ENEMY_STRONG: Color = Color::Red;
const C_BULLET_PLAYER: Color = Color::Red;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_BOMB: Color = Color::Blue;
const C_POWERUP_DOUBLE: Color = Color::Green;
const C_POWERUP_BOMB: Color = Color::Blue;
const C_HINT: Color = Color::DarkGrey;

const CONTROLS_HINT: &str = "← → / A D : Move   SPACE : Shoot   Q : Quit";

// ── Public entry points ───────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    assets: &AssetCatalog,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let clip = Clip::for_state(state);
    draw_sprite(out, &assets.background, 0, 1, C_BACKGROUND, &clip)?;

    for entity in state.entities() {
        draw_entity(out, entity, assets, &clip)?;
    }

    draw_hud(out, state)?;

    match state.status {
        GameStatus::Announcing { round, .. } => draw_round_banner(out, state, round)?,
        GameStatus::GameOverMenu => draw_game_over(out, state)?,
        GameStatus::Playing | GameStatus::Terminated => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, state.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

/// Title screen.
pub fn render_menu<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let cx = width / 2;
    let cy = height / 2;

    centered(out, cx, cy.saturating_sub(4), "★  FORMATION  SHOOTER  ★", Color::Cyan)?;

    let options: &[(&str, &str, Color)] = &[
        ("S", "Start", Color::Green),
        ("I", "Info ", Color::Yellow),
        ("Q", "Quit ", Color::Red),
    ];
    for (i, (key, label, color)) in options.iter().enumerate() {
        let row = cy.saturating_sub(1) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(5), row))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*label))?;
    }

    out.queue(style::ResetColor)?;
    out.flush()
}

/// Controls and power-up legend, reached from the title screen.
pub fn render_info<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let cx = width / 2;
    let top = (height / 2).saturating_sub(6);

    centered(out, cx, top, "HOW TO PLAY", Color::Cyan)?;

    let lines: &[(&str, Color)] = &[
        ("Destroy formations and falling raiders.", Color::White),
        ("Every kill counts toward the next round;", Color::White),
        ("each round the enemies get faster.", Color::White),
        ("", Color::White),
        ("2  Double shot: fire two bullets at once", C_POWERUP_DOUBLE),
        ("B  Bomb mode:   shots explode on contact", C_POWERUP_BOMB),
        ("   A new power-up replaces the old one.", C_HINT),
        ("", Color::White),
        (CONTROLS_HINT, C_HINT),
        ("press any key", C_HINT),
    ];
    for (i, (text, color)) in lines.iter().enumerate() {
        centered(out, cx, top + 2 + i as u16, text, *color)?;
    }

    out.queue(style::ResetColor)?;
    out.flush()
}

// ── Sprites ───────────────────────────────────────────────────────────────────

/// Drawable area: the whole screen except the HUD row.
struct Clip {
    width: i32,
    height: i32,
}

impl Clip {
    fn for_state(state: &GameState) -> Self {
        Self {
            width: i32::from(state.width),
            height: i32::from(state.height),
        }
    }

    fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 1 && y < self.height
    }
}

fn cell_origin(rect: &Rect) -> (i32, i32) {
    (rect.x.round() as i32, rect.y.round() as i32)
}

/// Draw the non-space cells of `sprite` with its top-left at (`x`, `y`).
fn draw_sprite<W: Write>(
    out: &mut W,
    sprite: &Sprite,
    x: i32,
    y: i32,
    color: Color,
    clip: &Clip,
) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(color))?;
    for (dy, row) in sprite.rows().iter().enumerate() {
        for (dx, ch) in row.chars().enumerate() {
            let (cx, cy) = (x + dx as i32, y + dy as i32);
            if ch != ' ' && clip.contains(cx, cy) {
                out.queue(cursor::MoveTo(cx as u16, cy as u16))?;
                out.queue(Print(ch))?;
            }
        }
    }
    Ok(())
}

/// Fill a rect with one glyph.
fn draw_block<W: Write>(
    out: &mut W,
    rect: &Rect,
    glyph: char,
    color: Color,
    clip: &Clip,
) -> std::io::Result<()> {
    let (x, y) = cell_origin(rect);
    let (w, h) = ((rect.w.ceil() as i32).max(1), (rect.h.ceil() as i32).max(1));
    out.queue(style::SetForegroundColor(color))?;
    for cy in y..y + h {
        for cx in x..x + w {
            if clip.contains(cx, cy) {
                out.queue(cursor::MoveTo(cx as u16, cy as u16))?;
                out.queue(Print(glyph))?;
            }
        }
    }
    Ok(())
}

fn draw_entity<W: Write>(
    out: &mut W,
    entity: EntityRef<'_>,
    assets: &AssetCatalog,
    clip: &Clip,
) -> std::io::Result<()> {
    let rect = entity.rect();
    let (x, y) = cell_origin(&rect);
    match entity {
        EntityRef::Player(_) => draw_sprite(out, &assets.player, x, y, C_PLAYER, clip),
        EntityRef::Enemy(enemy) => {
            let color = match enemy.kind {
                EnemyKind::Weak => C_ENEMY_WEAK,
                EnemyKind::Mid => C_ENEMY_MID,
                EnemyKind::Strong => C_ENEMY_STRONG,
            };
            draw_sprite(out, assets.enemy(enemy.kind), x, y, color, clip)
        }
        EntityRef::PowerUp(power_up) => match power_up.kind {
            PowerUpKind::DoubleShot => draw_block(out, &rect, '2', C_POWERUP_DOUBLE, clip),
            PowerUpKind::BombMode => draw_block(out, &rect, 'B', C_POWERUP_BOMB, clip),
        },
        EntityRef::Bomb(_) => draw_block(out, &rect, 'O', C_BOMB, clip),
        EntityRef::Bullet(_) => draw_block(out, &rect, '║', C_BULLET_PLAYER, clip),
        EntityRef::EnemyBullet(_) => draw_block(out, &rect, '•', C_BULLET_ENEMY, clip),
    }
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    // Health, left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
    out.queue(Print(format!("Health: {}", state.player.health)))?;

    let power_tag = match state.player.power_up {
        Some(PowerUpKind::DoubleShot) => Some((" [2x]", C_POWERUP_DOUBLE)),
        Some(PowerUpKind::BombMode) => Some((" [BOMB]", C_POWERUP_BOMB)),
        None => None,
    };
    if let Some((tag, color)) = power_tag {
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(tag))?;
    }

    // Round and score, centre
    let round_str = format!(
        "Round {}  Score {}",
        state.round.round_number, state.round.score
    );
    out.queue(cursor::MoveTo(
        (state.width / 2).saturating_sub(round_str.chars().count() as u16 / 2),
        0,
    ))?;
    out.queue(style::SetForegroundColor(C_HUD_ROUND))?;
    out.queue(Print(&round_str))?;

    // Kills, right
    let kills_str = format!("Kills: {}", state.round.kills_this_round);
    out.queue(cursor::MoveTo(
        state.width.saturating_sub(kills_str.chars().count() as u16 + 1),
        0,
    ))?;
    out.queue(style::SetForegroundColor(C_HUD_KILLS))?;
    out.queue(Print(&kills_str))?;

    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn centered<W: Write>(
    out: &mut W,
    cx: u16,
    row: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let col = cx.saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn draw_round_banner<W: Write>(out: &mut W, state: &GameState, round: u32) -> std::io::Result<()> {
    let cx = state.width / 2;
    let cy = state.height / 2;
    centered(out, cx, cy, &format!("Round {}", round), Color::White)?;
    centered(out, cx, cy + 2, "press any key", C_HINT)
}

fn draw_game_over<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Red),
        ("║     GAME  OVER     ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
    ];
    let cx = state.width / 2;
    let total_rows = lines.len() + 3; // 3 box lines + round + kills + hint
    let start_row = (state.height / 2).saturating_sub(total_rows as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        centered(out, cx, start_row + i as u16, msg, *color)?;
    }

    let row = start_row + lines.len() as u16;
    let round_line = format!("Reached round {}", state.round.round_number);
    centered(out, cx, row, &round_line, Color::Yellow)?;
    let kills_line = format!(
        "Kills: {}   Score: {}",
        state.round.total_kills, state.round.score
    );
    centered(out, cx, row + 1, &kills_line, Color::Yellow)?;
    centered(out, cx, row + 2, "R - Play Again  Q - Quit", Color::White)?;

    Ok(())
}
