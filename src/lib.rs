//! Maze-chase arcade simulation.
//!
//! [`game::Game`] owns a procedurally generated maze, the player, the ghosts
//! and the collectibles. A front end calls [`game::Game::on_tick`] at a fixed
//! rate, forwards key presses through [`game::Game::on_directional_input`],
//! drains [`game::GameEvent`]s and reads the state back to draw it.

pub mod clock;
pub mod collectibles;
pub mod config;
pub mod error;
pub mod game;
pub mod ghost;
pub mod grid;
pub mod maze;
pub mod motion;
pub mod player;

pub use config::GameConfig;
pub use error::{ConfigError, GameError, MazeError};
pub use game::{Game, GameEvent, Phase};
pub use ghost::{Ghost, GhostKind, GhostMode};
pub use grid::{Cell, Grid, Heading, Tile};
