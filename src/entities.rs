/// All game entity types — pure data, no logic.
///
/// Positions live in an abstract 800×600 playfield (origin top-left,
/// y grows downward); the display layer projects them onto terminal cells.

#[derive(Clone, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BulletOwner {
    Player,
    Enemy,
    Boss,
}

/// A projectile of any owner. Player and boss bullets are axis-aligned
/// (vx = 0); enemy bullets carry a radial velocity.
#[derive(Clone, Debug)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Horizontal velocity added each frame.
    pub vx: f32,
    /// Vertical velocity added each frame (positive = downward).
    pub vy: f32,
    pub owner: BulletOwner,
}

// ── Ship, enemy, boss ─────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Ship {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Horizontal shift per frame while a direction key is held.
    pub speed: f32,
    pub health: i32,
    /// Doubles on each boss defeat; healing clamps against it.
    pub max_health: i32,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub health: i32,
}

#[derive(Clone, Debug)]
pub struct Boss {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub health: i32,
    pub max_health: i32,
    /// Millisecond timestamp of the last bullet fired.
    pub last_shot: u64,
}

// ── Laser power-up ────────────────────────────────────────────────────────────

/// Beam weapon state. Not a discrete entity: while `active` the beam runs
/// from the ship's top to the playfield top along the ship's x-center.
#[derive(Clone, Debug)]
pub struct Laser {
    /// Permanently granted on the first boss defeat.
    pub unlocked: bool,
    pub active: bool,
    /// Millisecond timestamp of the last activation.
    pub started_at: u64,
    /// Millisecond timestamp of the last deactivation; reactivation is
    /// blocked until the cooldown elapses from here.
    pub last_deactivated: u64,
}

// ── Input & sound cues ────────────────────────────────────────────────────────

/// Held-key snapshot for one frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct Input {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub laser: bool,
}

/// Sound cues emitted by the tick for the audio collaborator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sound {
    Shoot,
    Hit,
    Explosion,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub ship: Ship,
    /// Every live projectile, owner-tagged.
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    /// At most one boss exists at a time.
    pub boss: Option<Boss>,
    pub laser: Laser,
    pub score: u32,
    /// The highest score seen so far (updated live during play).
    pub high_score: u32,
    /// Incremented on each boss defeat; scales boss health and kill quota.
    pub boss_level: u32,
    /// Enemy kills since the last boss spawn; reset to 0 when one spawns.
    pub kills_since_boss: u32,
    /// Millisecond timestamp of the last player bullet fired.
    pub last_player_shot: u64,
    pub status: GameStatus,
    pub frame: u64,
}
