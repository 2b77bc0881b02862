//! Tunable game parameters.
//!
//! Defaults reproduce the classic feel of the game; a JSON file can
//! override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entities::SIZE;
use crate::error::{GameError, Result};

/// Backlog ceiling for a single frame in fixed-timestep mode, unless
/// `max_frame_delta_ms` says otherwise.
pub const FIXED_STEP_BACKLOG_MS: f64 = 250.0;

/// Maximum fixed steps run for a single frame in fixed-timestep mode.
pub const MAX_SUBSTEPS: u32 = 8;

/// How wall-clock frame time is turned into simulation ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TimestepMode {
    /// One tick per frame using the measured delta.
    #[default]
    Variable,
    /// Ticks of exactly `step_ms`, driven by an accumulator.
    Fixed { step_ms: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Playfield width in canvas units.
    pub width: f64,
    /// Playfield height in canvas units.
    pub height: f64,
    /// Horizontal player speed, units/sec.
    pub player_speed: f64,
    /// Upward projectile speed, units/sec.
    pub projectile_speed: f64,
    /// Projectiles are dropped once they pass this far above the top edge.
    pub projectile_top_margin: f64,
    pub spawn_interval_ms: f64,
    pub obstacle_min_speed: f64,
    pub obstacle_max_speed: f64,
    pub points_per_hit: u32,
    /// Optional cap on a single frame delta.  `None` leaves variable-step
    /// frames uncapped; fixed-step mode falls back to `FIXED_STEP_BACKLOG_MS`.
    pub max_frame_delta_ms: Option<f64>,
    pub timestep: TimestepMode,
    /// Fixed RNG seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            player_speed: 200.0,
            projectile_speed: 400.0,
            projectile_top_margin: 10.0,
            spawn_interval_ms: 800.0,
            obstacle_min_speed: 50.0,
            obstacle_max_speed: 150.0,
            points_per_hit: 10,
            max_frame_delta_ms: None,
            timestep: TimestepMode::Variable,
            seed: None,
        }
    }
}

impl Config {
    /// Frame-delta ceiling used by the fixed-timestep accumulator.
    pub fn fixed_step_backlog_ms(&self) -> f64 {
        self.max_frame_delta_ms.unwrap_or(FIXED_STEP_BACKLOG_MS)
    }

    /// Read a JSON config file.  Missing fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text).map_err(|source| GameError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded config from {}", path.display());
        config.validated()
    }

    /// Reject non-finite values and clamp the rest into a playable range.
    pub fn validated(mut self) -> Result<Self> {
        let fields = [
            ("width", self.width),
            ("height", self.height),
            ("player_speed", self.player_speed),
            ("projectile_speed", self.projectile_speed),
            ("projectile_top_margin", self.projectile_top_margin),
            ("spawn_interval_ms", self.spawn_interval_ms),
            ("obstacle_min_speed", self.obstacle_min_speed),
            ("obstacle_max_speed", self.obstacle_max_speed),
            ("max_frame_delta_ms", self.max_frame_delta_ms.unwrap_or(0.0)),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(GameError::InvalidConfig(format!("{name} must be finite, got {value}")));
            }
        }

        // A playfield narrower than one sprite would invert the player bounds.
        self.width = self.width.max(SIZE);
        self.height = self.height.max(SIZE);
        self.player_speed = self.player_speed.max(0.0);
        self.projectile_speed = self.projectile_speed.max(0.0);
        self.projectile_top_margin = self.projectile_top_margin.max(0.0);
        self.spawn_interval_ms = self.spawn_interval_ms.max(0.0);
        self.obstacle_min_speed = self.obstacle_min_speed.max(0.0);
        self.obstacle_max_speed = self.obstacle_max_speed.max(self.obstacle_min_speed);
        self.max_frame_delta_ms = self.max_frame_delta_ms.map(|ms| ms.max(0.0));

        if let TimestepMode::Fixed { step_ms } = self.timestep {
            if !step_ms.is_finite() || step_ms <= 0.0 {
                return Err(GameError::InvalidConfig(format!(
                    "fixed step must be a positive number of ms, got {step_ms}"
                )));
            }
        }

        Ok(self)
    }
}
