use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the I/O shell around the game.  The simulation itself
/// never fails; losing is a normal game state, not an error.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to install logger: {0}")]
    Logger(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
