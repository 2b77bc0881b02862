//! Rock Shooter: steer a ship along the bottom of the playfield, shoot the
//! falling rocks, and don't let one hit you.
//!
//! - `entities`: plain game data
//! - `compute`: pure state transitions
//! - `input`: per-frame input snapshot and press detection
//! - `session`: `GameLoop`, the owner of a running game
//! - `render`: the `Renderer` seam and frame drawing
//! - `config`: tunables, loadable from JSON

pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod input;
pub mod render;
pub mod session;

pub use config::{Config, TimestepMode};
pub use error::GameError;
pub use session::GameLoop;
