/// All game entity types — pure data, no logic.

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

/// Horizontal input direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Dir {
    Left,
    Right,
}

impl Dir {
    pub fn sign(self) -> f32 {
        match self {
            Dir::Left => -1.0,
            Dir::Right => 1.0,
        }
    }
}

/// Everything that can change the game state, whether it came from the
/// keyboard or from a collision found during the frame tick.  Processed
/// by `compute::apply_event`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    EnemyHit,
    CoinCollected(usize),
    FellOffScreen,
    JumpPressed,
    MovePressed(Dir),
    RestartPressed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EffectKind {
    /// Ground dust kicked up while running.
    Dust,
    /// Flash at the feet on take-off.
    JumpFlash,
    /// Scattered take-off particles.
    JumpDust,
    /// "+10" text above a collected coin.
    ScorePopup,
}

// ── Player & level entities ───────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Resting on a platform top per the last tick's landing check.
    pub grounded: bool,
    /// Remaining seconds of the white damage flash.
    pub flash: f32,
}

/// Patrol enemy.  Static body: collides but ignores gravity; walks
/// horizontally and bounces between the world bounds.
#[derive(Clone, Debug)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    /// -1.0 or +1.0
    pub direction: f32,
    pub speed: f32,
}

#[derive(Clone, Debug)]
pub struct Coin {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// A short-lived decorative entity.  Carries no gameplay state and
/// self-removes once `ttl` runs out.
#[derive(Clone, Debug)]
pub struct Effect {
    pub x: f32,
    pub y: f32,
    pub ttl: f32,
    pub kind: EffectKind,
}

/// Fixed background decoration.
#[derive(Clone, Copy, Debug)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    /// `None` once the terminal Game-Over destroys the player.
    pub player: Option<Player>,
    pub platforms: Vec<Platform>,
    pub enemies: Vec<Enemy>,
    pub coins: Vec<Coin>,
    /// Short-lived decorative entities (dust, popups, ...).
    pub effects: Vec<Effect>,
    pub clouds: Vec<Cloud>,
    pub score: u32,
    /// Hits remaining on the current life, 0..=3.
    pub health: u32,
    /// Lives remaining, 0..=3.  0 means terminal Game-Over.
    pub lives: u32,
    pub status: GameStatus,
}
