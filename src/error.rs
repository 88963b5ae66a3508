use thiserror::Error;

/// Errors raised while building a maze.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    #[error("grid {rows}x{cols} is too small, need at least {min}x{min}")]
    TooSmall { rows: usize, cols: usize, min: usize },
    #[error("maze still disconnected after {attempts} generation attempts and repair")]
    Disconnected { attempts: u32 },
}

/// Errors raised when validating a [`crate::config::GameConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tick_ms must be greater than zero")]
    ZeroTick,
    #[error("generation_attempts must be greater than zero")]
    ZeroAttempts,
    #[error(transparent)]
    Maze(#[from] MazeError),
}

/// Errors surfaced by [`crate::game::Game`] construction and reset.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("maze generation failed: {0}")]
    Maze(#[from] MazeError),
}
