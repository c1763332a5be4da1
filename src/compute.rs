/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, an RNG handle and a millisecond clock
/// reading) and returns a brand-new `GameState`.  Side effects are limited
/// to the injected RNG, so callers control determinism — tests drive the
/// simulation with a seeded RNG and a hand-picked clock.

use rand::Rng;

use crate::entities::{
    Boss, Bullet, BulletOwner, Enemy, GameState, GameStatus, Input, Laser, Ship, Sound,
};

// ── Playfield ────────────────────────────────────────────────────────────────

pub const WORLD_W: f32 = 800.0;
pub const WORLD_H: f32 = 600.0;

// ── Ship ─────────────────────────────────────────────────────────────────────

pub const SHIP_SIZE: f32 = 60.0;
pub const SHIP_SPEED: f32 = 5.0;
pub const SHIP_START_HEALTH: i32 = 100;

// ── Projectiles ──────────────────────────────────────────────────────────────

pub const PLAYER_BULLET_W: f32 = 4.0;
pub const PLAYER_BULLET_H: f32 = 8.0;
pub const PLAYER_BULLET_SPEED: f32 = 7.0;
pub const PLAYER_BULLET_DAMAGE: i32 = 10;
/// Min milliseconds between player shots while the fire key is held
/// (≈12 shots/sec).
pub const FIRE_INTERVAL_MS: u64 = 80;

pub const ENEMY_BULLET_SIZE: f32 = 6.0;
pub const ENEMY_BULLET_SPEED: f32 = 3.0;
pub const ENEMY_BULLET_DAMAGE: i32 = 10;

pub const BOSS_BULLET_W: f32 = 10.0;
pub const BOSS_BULLET_H: f32 = 20.0;
pub const BOSS_BULLET_SPEED: f32 = 4.0;
pub const BOSS_BULLET_DAMAGE: i32 = 20;

// ── Enemies ──────────────────────────────────────────────────────────────────

pub const ENEMY_SIZE: f32 = 60.0;
pub const ENEMY_SPEED: f32 = 1.5;
pub const ENEMY_HEALTH: i32 = 10;
/// Per-frame chance of one enemy spawning (only while no boss is up).
pub const ENEMY_SPAWN_CHANCE: f64 = 0.02;
/// Per-frame chance of each enemy firing a radial bullet.
pub const ENEMY_FIRE_CHANCE: f64 = 0.005;

// ── Boss ─────────────────────────────────────────────────────────────────────

pub const BOSS_SIZE: f32 = 300.0;
pub const BOSS_Y: f32 = 30.0;
pub const BOSS_BASE_HEALTH: i32 = 500;
/// Boss health scales by this factor per level.
pub const BOSS_HEALTH_GROWTH: f32 = 1.5;
pub const BOSS_FIRE_INTERVAL_MS: u64 = 1000;
pub const BOSS_SCORE: u32 = 100;
pub const BOSS_HEAL: i32 = 200;

// ── Laser power-up ───────────────────────────────────────────────────────────

pub const LASER_COOLDOWN_MS: u64 = 5000;
pub const LASER_DURATION_MS: u64 = 10000;
pub const LASER_DAMAGE: i32 = 1;

// ── Quotas & scaling ─────────────────────────────────────────────────────────

/// Enemy kills required before the next boss appears.
fn boss_quota(boss_level: u32) -> u32 {
    if boss_level == 1 {
        15
    } else {
        20
    }
}

fn boss_health_for(boss_level: u32) -> i32 {
    (BOSS_BASE_HEALTH as f32 * BOSS_HEALTH_GROWTH.powi(boss_level as i32 - 1)) as i32
}

/// Axis-aligned box overlap.
fn overlap(ax: f32, ay: f32, aw: f32, ah: f32, bx: f32, by: f32, bw: f32, bh: f32) -> bool {
    ax < bx + bw && ax + aw > bx && ay < by + bh && ay + ah > by
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial game state: ship centered at the bottom, nothing else
/// on the field, laser still locked.
pub fn init_state(high_score: u32) -> GameState {
    GameState {
        ship: Ship {
            x: WORLD_W / 2.0 - SHIP_SIZE / 2.0,
            y: WORLD_H - 80.0,
            width: SHIP_SIZE,
            height: SHIP_SIZE,
            speed: SHIP_SPEED,
            health: SHIP_START_HEALTH,
            max_health: SHIP_START_HEALTH,
        },
        bullets: Vec::new(),
        enemies: Vec::new(),
        boss: None,
        laser: Laser {
            unlocked: false,
            active: false,
            started_at: 0,
            last_deactivated: 0,
        },
        score: 0,
        high_score,
        boss_level: 1,
        kills_since_boss: 0,
        last_player_shot: 0,
        status: GameStatus::Playing,
        frame: 0,
    }
}

// ── Per-frame tick (nearly pure — RNG and clock are injected) ────────────────

/// Advance the simulation by one frame.  `now` is milliseconds since session
/// start.  Returns the new state plus the sound cues this frame produced;
/// callers must stop ticking once the status is `GameOver`.
pub fn tick(
    state: &GameState,
    input: &Input,
    now: u64,
    rng: &mut impl Rng,
) -> (GameState, Vec<Sound>) {
    let frame = state.frame + 1;
    let mut sounds: Vec<Sound> = Vec::new();

    // ── 1. Ship movement ─────────────────────────────────────────────────────
    let mut ship = state.ship.clone();
    if input.left {
        ship.x = (ship.x - ship.speed).max(0.0);
    }
    if input.right {
        ship.x = (ship.x + ship.speed).min(WORLD_W - ship.width);
    }

    // ── 2. Fire control ──────────────────────────────────────────────────────
    let mut laser = state.laser.clone();
    let mut last_player_shot = state.last_player_shot;
    let mut bullets = state.bullets.clone();

    if laser.unlocked
        && input.laser
        && !laser.active
        && now.saturating_sub(laser.last_deactivated) >= LASER_COOLDOWN_MS
    {
        laser.active = true;
        laser.started_at = now;
    }
    if laser.active && now.saturating_sub(laser.started_at) >= LASER_DURATION_MS {
        laser.active = false;
        laser.last_deactivated = now;
    }
    // Normal fire is suppressed while the beam is running.
    if !laser.active && input.fire && now.saturating_sub(last_player_shot) >= FIRE_INTERVAL_MS {
        bullets.push(Bullet {
            x: ship.x + ship.width / 2.0 - PLAYER_BULLET_W / 2.0,
            y: ship.y,
            width: PLAYER_BULLET_W,
            height: PLAYER_BULLET_H,
            vx: 0.0,
            vy: -PLAYER_BULLET_SPEED,
            owner: BulletOwner::Player,
        });
        last_player_shot = now;
        sounds.push(Sound::Shoot);
    }

    // ── 3. Move projectiles, prune out-of-bounds ─────────────────────────────
    let mut bullets: Vec<Bullet> = bullets
        .into_iter()
        .filter_map(|mut b| {
            b.x += b.vx;
            b.y += b.vy;
            let gone = match b.owner {
                BulletOwner::Player => b.y < 0.0,
                BulletOwner::Boss => b.y > WORLD_H,
                BulletOwner::Enemy => {
                    b.x < 0.0 || b.x > WORLD_W || b.y < 0.0 || b.y > WORLD_H
                }
            };
            if gone {
                None
            } else {
                Some(b)
            }
        })
        .collect();

    // ── 4. Move enemies, prune past the bottom, random radial fire ───────────
    let mut enemies: Vec<Enemy> = state
        .enemies
        .iter()
        .filter_map(|e| {
            let new_y = e.y + ENEMY_SPEED;
            if new_y > WORLD_H {
                None
            } else {
                Some(Enemy { y: new_y, ..e.clone() })
            }
        })
        .collect();

    for enemy in &enemies {
        if rng.gen_bool(ENEMY_FIRE_CHANCE) {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            bullets.push(Bullet {
                x: enemy.x + enemy.width / 2.0,
                y: enemy.y + enemy.height / 2.0,
                width: ENEMY_BULLET_SIZE,
                height: ENEMY_BULLET_SIZE,
                vx: angle.cos() * ENEMY_BULLET_SPEED,
                vy: angle.sin() * ENEMY_BULLET_SPEED,
                owner: BulletOwner::Enemy,
            });
        }
    }

    // ── 5. Spawn a new enemy (only while no boss is up) ──────────────────────
    let mut boss = state.boss.clone();
    if boss.is_none() && rng.gen_bool(ENEMY_SPAWN_CHANCE) {
        let x = rng.gen_range(0.0..(WORLD_W - ENEMY_SIZE));
        enemies.push(Enemy {
            x,
            y: 0.0,
            width: ENEMY_SIZE,
            height: ENEMY_SIZE,
            health: ENEMY_HEALTH,
        });
    }

    // ── 6. Boss lifecycle ────────────────────────────────────────────────────
    let mut kills_since_boss = state.kills_since_boss;
    if boss.is_none() && kills_since_boss >= boss_quota(state.boss_level) {
        let hp = boss_health_for(state.boss_level);
        boss = Some(Boss {
            x: WORLD_W / 2.0 - BOSS_SIZE / 2.0,
            y: BOSS_Y,
            width: BOSS_SIZE,
            height: BOSS_SIZE,
            health: hp,
            max_health: hp,
            last_shot: now,
        });
        kills_since_boss = 0;
    }
    if let Some(b) = boss.as_mut() {
        if now.saturating_sub(b.last_shot) >= BOSS_FIRE_INTERVAL_MS {
            bullets.push(Bullet {
                x: b.x + b.width / 2.0 - BOSS_BULLET_W / 2.0,
                y: b.y + b.height,
                width: BOSS_BULLET_W,
                height: BOSS_BULLET_H,
                vx: 0.0,
                vy: BOSS_BULLET_SPEED,
                owner: BulletOwner::Boss,
            });
            b.last_shot = now;
        }
    }

    // ── 7. Collisions ────────────────────────────────────────────────────────
    // Damage is applied in place and the dead are compacted afterwards, so a
    // removal never disturbs an in-progress scan.
    let mut consumed = vec![false; bullets.len()];
    let mut score = state.score;

    // 7a. Player bullets — each is spent on the first enemy it overlaps,
    //     otherwise on the boss.
    for (bi, bullet) in bullets.iter().enumerate() {
        if bullet.owner != BulletOwner::Player {
            continue;
        }
        let mut hit = false;
        for enemy in enemies.iter_mut() {
            if overlap(
                bullet.x, bullet.y, bullet.width, bullet.height,
                enemy.x, enemy.y, enemy.width, enemy.height,
            ) {
                enemy.health -= PLAYER_BULLET_DAMAGE;
                sounds.push(Sound::Hit);
                hit = true;
                break;
            }
        }
        if hit {
            consumed[bi] = true;
            continue;
        }
        if let Some(b) = boss.as_mut() {
            if overlap(
                bullet.x, bullet.y, bullet.width, bullet.height,
                b.x, b.y, b.width, b.height,
            ) {
                b.health -= PLAYER_BULLET_DAMAGE;
                sounds.push(Sound::Hit);
                consumed[bi] = true;
            }
        }
    }

    // 7b. Laser beam — continuous damage to everything whose horizontal span
    //     contains the ship's x-center.
    if laser.active {
        let beam_x = ship.x + ship.width / 2.0;
        for enemy in enemies.iter_mut() {
            if beam_x > enemy.x && beam_x < enemy.x + enemy.width {
                enemy.health -= LASER_DAMAGE;
            }
        }
        if let Some(b) = boss.as_mut() {
            if beam_x > b.x && beam_x < b.x + b.width {
                b.health -= LASER_DAMAGE;
            }
        }
    }

    // 7c. Bury dead enemies: score, kill quota, explosion per kill.
    let killed = enemies.iter().filter(|e| e.health <= 0).count() as u32;
    if killed > 0 {
        score += killed;
        kills_since_boss += killed;
        for _ in 0..killed {
            sounds.push(Sound::Explosion);
        }
        enemies.retain(|e| e.health > 0);
    }

    // 7d. Boss defeat sequence.
    let mut boss_level = state.boss_level;
    if boss.as_ref().map_or(false, |b| b.health <= 0) {
        boss = None;
        sounds.push(Sound::Explosion);
        score += BOSS_SCORE;
        boss_level += 1;
        // The beam weapon unlocks permanently on the first kill and starts
        // (or restarts) its cooldown from the moment of victory.
        laser.unlocked = true;
        laser.active = false;
        laser.last_deactivated = now;
        ship.health += BOSS_HEAL;
        ship.max_health *= 2;
        ship.health = ship.health.min(ship.max_health);
    }

    // 7e. Enemy and boss bullets vs the ship.
    for (bi, bullet) in bullets.iter().enumerate() {
        if consumed[bi] {
            continue;
        }
        let damage = match bullet.owner {
            BulletOwner::Enemy => ENEMY_BULLET_DAMAGE,
            BulletOwner::Boss => BOSS_BULLET_DAMAGE,
            BulletOwner::Player => continue,
        };
        if overlap(
            bullet.x, bullet.y, bullet.width, bullet.height,
            ship.x, ship.y, ship.width, ship.height,
        ) {
            ship.health -= damage;
            sounds.push(Sound::Hit);
            consumed[bi] = true;
        }
    }

    let bullets: Vec<Bullet> = bullets
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !consumed[*i])
        .map(|(_, b)| b)
        .collect();

    // ── 8. Single terminal-state check, after all damage is in ───────────────
    let status = if ship.health <= 0 {
        ship.health = 0;
        laser.active = false;
        GameStatus::GameOver
    } else {
        GameStatus::Playing
    };

    let high_score = state.high_score.max(score);

    (
        GameState {
            ship,
            bullets,
            enemies,
            boss,
            laser,
            score,
            high_score,
            boss_level,
            kills_since_boss,
            last_player_shot,
            status,
            frame,
        },
        sounds,
    )
}
