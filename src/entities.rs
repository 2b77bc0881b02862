//! All game entity types — pure data, no logic.

/// Edge length of every sprite, in canvas units.
pub const SIZE: f64 = 32.0;

/// Gap between the player's sprite and the bottom edge of the playfield.
pub const PLAYER_BOTTOM_GAP: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Active,
    GameOver,
}

// ── Player ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f64,
    /// Fixed for the whole run.
    pub y: f64,
}

// ── Projectiles & obstacles ──────────────────────────────────────────────────

/// A shot fired upward by the player.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub x: f64,
    pub y: f64,
    /// Units per second; negative is upward.
    pub vy: f64,
}

/// A rock falling toward the player.
#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    /// Units per second; positive is downward.
    pub vy: f64,
}

// ── Master game state ────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub player: Player,
    pub projectiles: Vec<Projectile>,
    pub obstacles: Vec<Obstacle>,
    pub score: u32,
    pub run_state: RunState,
    /// Milliseconds accumulated toward the next obstacle spawn.
    pub spawn_timer_ms: f64,
    /// Simulation ticks since the last reset.
    pub frame: u64,
    pub width: f64,
    pub height: f64,
}

impl GameState {
    pub fn is_active(&self) -> bool {
        self.run_state == RunState::Active
    }

    /// Leftmost x the player may occupy.
    pub fn min_player_x(&self) -> f64 {
        SIZE / 2.0
    }

    /// Rightmost x the player may occupy.
    pub fn max_player_x(&self) -> f64 {
        (self.width - SIZE / 2.0).max(self.min_player_x())
    }
}
