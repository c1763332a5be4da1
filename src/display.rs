/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// state into terminal commands.  Entity positions live in the abstract
/// 800×600 playfield and are projected onto the terminal cell grid here.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use jet_shooter::compute::{ENEMY_HEALTH, WORLD_H, WORLD_W};
use jet_shooter::entities::{Boss, Bullet, BulletOwner, Enemy, GameState, GameStatus};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_HEALTH: Color = Color::Red;
const C_HUD_BOSS: Color = Color::Magenta;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_ENEMY_HURT: Color = Color::Yellow;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::DarkYellow;
const C_BULLET_BOSS: Color = Color::Magenta;
const C_BOSS: Color = Color::Red;
const C_BOSS_BAR: Color = Color::Green;
const C_BOSS_BAR_BG: Color = Color::DarkGrey;
const C_LASER: Color = Color::Cyan;
const C_LASER_READY: Color = Color::DarkYellow;
const C_HINT: Color = Color::DarkGrey;

// ── World → cell projection ───────────────────────────────────────────────────

/// Playfield interior: columns 1..width-1, rows 2..height-3 (HUD row 0,
/// border rows 1 and height-2, hint row height-1).

fn col_of(x: f32, width: u16) -> u16 {
    let c = 1.0 + x / WORLD_W * (width as f32 - 2.0);
    (c as u16).max(1).min(width.saturating_sub(2).max(1))
}

fn row_of(y: f32, height: u16) -> u16 {
    let r = 2.0 + y / WORLD_H * (height as f32 - 4.0);
    (r as u16).max(2).min(height.saturating_sub(3).max(2))
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height)?;
    draw_hud(out, state, width)?;

    if let Some(boss) = &state.boss {
        draw_boss(out, boss, width, height)?;
    }
    for enemy in &state.enemies {
        draw_enemy(out, enemy, width, height)?;
    }
    if state.laser.active {
        draw_laser(out, state, width, height)?;
    }
    for bullet in &state.bullets {
        draw_bullet(out, bullet, width, height)?;
    }

    draw_ship(out, state, width, height)?;
    draw_controls_hint(out, height)?;

    if state.status == GameStatus::GameOver {
        draw_game_over(out, state, width, height)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1 — top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row height-2 — bottom bar
    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, width: u16) -> std::io::Result<()> {
    // Score and high score — left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    if state.high_score > 0 {
        out.queue(Print(format!(
            "Score:{:>6}  Hi:{:>6}",
            state.score, state.high_score
        )))?;
    } else {
        out.queue(Print(format!("Score:{:>6}", state.score)))?;
    }

    // Boss level — centre
    let boss_str = format!("[ BOSS Lv {} ]", state.boss_level);
    let bx = (width / 2).saturating_sub(boss_str.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(bx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_BOSS))?;
    out.queue(Print(&boss_str))?;

    // Laser status + health — right side
    let laser_tag = if state.laser.active {
        "[LASER ACTIVE] ".to_string()
    } else if state.laser.unlocked {
        "[Z LASER READY] ".to_string()
    } else {
        String::new()
    };
    let health_str = format!("HP:{}/{}", state.ship.health, state.ship.max_health);
    let right_str = format!("{}{}", laser_tag, health_str);

    let rx = width.saturating_sub(right_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;

    if !laser_tag.is_empty() {
        let tag_color = if state.laser.active { C_LASER } else { C_LASER_READY };
        out.queue(style::SetForegroundColor(tag_color))?;
        out.queue(Print(&laser_tag))?;
    }
    out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
    out.queue(Print(&health_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_ship<W: Write>(
    out: &mut W,
    state: &GameState,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    // 2-row sprite anchored at the ship's top-centre:
    //   ▲       ← tip
    //  /█\      ← fuselage + wings
    let ship = &state.ship;
    let cx = col_of(ship.x + ship.width / 2.0, width);
    let cy = row_of(ship.y, height);

    out.queue(style::SetForegroundColor(C_PLAYER))?;
    out.queue(cursor::MoveTo(cx, cy))?;
    out.queue(Print("▲"))?;

    let wing_y = cy + 1;
    if wing_y < height.saturating_sub(2) {
        out.queue(cursor::MoveTo(cx.saturating_sub(1).max(1), wing_y))?;
        out.queue(Print("/█\\"))?;
    }

    Ok(())
}

fn draw_enemy<W: Write>(
    out: &mut W,
    enemy: &Enemy,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    // 2-row sprite:
    //   «▼»    ← swept-back wings
    //   ╚═╝    ← engine block
    // Laser chip damage shows as a colour change.
    let color = if enemy.health < ENEMY_HEALTH { C_ENEMY_HURT } else { C_ENEMY };
    let cx = col_of(enemy.x + enemy.width / 2.0, width);
    let cy = row_of(enemy.y, height);
    let lx = cx.saturating_sub(1).max(1);

    out.queue(style::SetForegroundColor(color))?;
    out.queue(cursor::MoveTo(lx, cy))?;
    out.queue(Print("«▼»"))?;
    if cy + 1 < height.saturating_sub(2) {
        out.queue(cursor::MoveTo(lx, cy + 1))?;
        out.queue(Print("╚═╝"))?;
    }
    Ok(())
}

fn draw_boss<W: Write>(
    out: &mut W,
    boss: &Boss,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let left = col_of(boss.x, width);
    let right = col_of(boss.x + boss.width, width);
    let top = row_of(boss.y, height);
    let bottom = row_of(boss.y + boss.height, height);
    let span = right.saturating_sub(left).max(1) as usize;

    // Health bar on the top row, hull below it, filled proportionally.
    let filled = (span as f32 * boss.health.max(0) as f32 / boss.max_health as f32) as usize;
    out.queue(cursor::MoveTo(left, top))?;
    out.queue(style::SetForegroundColor(C_BOSS_BAR))?;
    out.queue(Print("█".repeat(filled)))?;
    out.queue(style::SetForegroundColor(C_BOSS_BAR_BG))?;
    out.queue(Print("░".repeat(span.saturating_sub(filled))))?;

    out.queue(style::SetForegroundColor(C_BOSS))?;
    for row in (top + 1)..=bottom {
        out.queue(cursor::MoveTo(left, row))?;
        out.queue(Print("▓".repeat(span)))?;
    }
    Ok(())
}

fn draw_bullet<W: Write>(
    out: &mut W,
    bullet: &Bullet,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let cx = col_of(bullet.x, width);
    let cy = row_of(bullet.y, height);
    out.queue(cursor::MoveTo(cx, cy))?;
    match bullet.owner {
        BulletOwner::Player => {
            out.queue(style::SetForegroundColor(C_BULLET_PLAYER))?;
            out.queue(Print("║"))?;
        }
        BulletOwner::Enemy => {
            out.queue(style::SetForegroundColor(C_BULLET_ENEMY))?;
            out.queue(Print("•"))?;
        }
        BulletOwner::Boss => {
            out.queue(style::SetForegroundColor(C_BULLET_BOSS))?;
            out.queue(Print("▼"))?;
        }
    }
    Ok(())
}

/// The beam runs from the playfield top down to the ship's tip along the
/// ship's x-centre column.
fn draw_laser<W: Write>(
    out: &mut W,
    state: &GameState,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let ship = &state.ship;
    let cx = col_of(ship.x + ship.width / 2.0, width);
    let ship_row = row_of(ship.y, height);

    out.queue(style::SetForegroundColor(C_LASER))?;
    for row in 2..ship_row {
        out.queue(cursor::MoveTo(cx, row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → / A D : Move   SPACE : Shoot   Z : Laser   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    state: &GameState,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let score_line = format!("Final Score: {:>6}", state.score);
    let best_score = state.high_score.max(state.score);
    let best_line = if state.score >= state.high_score && state.score > 0 {
        format!("★ NEW BEST: {:>6} ★", best_score)
    } else {
        format!("Best Score:  {:>6}", best_score)
    };

    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
    ];
    let best_color = if state.score >= state.high_score && state.score > 0 {
        Color::Yellow
    } else {
        Color::DarkGrey
    };

    let cx = width / 2;
    let total_rows = lines.len() + 3; // 3 box lines + score + best + hint
    let start_row = (height / 2).saturating_sub(total_rows as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    let score_row = start_row + lines.len() as u16;
    let col = cx.saturating_sub(score_line.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, score_row))?;
    out.queue(style::SetForegroundColor(Color::Yellow))?;
    out.queue(Print(&score_line))?;

    let best_row = score_row + 1;
    let col = cx.saturating_sub(best_line.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, best_row))?;
    out.queue(style::SetForegroundColor(best_color))?;
    out.queue(Print(&best_line))?;

    let hint = "R - Play Again  Q - Quit";
    let hint_row = best_row + 1;
    let col = cx.saturating_sub(hint.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, hint_row))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(hint))?;

    Ok(())
}
