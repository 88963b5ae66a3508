use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, MazeError};
use crate::grid::MIN_DIM;

const CONFIG_ENV: &str = "MAZE_CHASE_CONFIG";
const CONFIG_PATH: &str = "config/maze_chase.toml";

/// Data-driven configuration for a game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Grid height in cells.
    pub rows: usize,
    /// Grid width in cells.
    pub cols: usize,
    /// Ghosts spawned in the house (capped by the house's open cells).
    pub ghost_count: usize,
    /// Upper bound on power pellets; also capped at a tenth of the open cells.
    pub max_power_pellets: usize,
    /// Simulation tick length (ms).
    pub tick_ms: u64,
    /// How long ghosts stay frightened after a power pellet (ms).
    pub frightened_ms: u64,
    /// Delay before an eaten ghost respawns (ms).
    pub respawn_ms: u64,
    /// Terminal redraw rate.
    pub render_fps: u64,
    /// Full regenerations tried before patching a disconnected maze.
    pub generation_attempts: u32,
    /// Fixed seed for reproducible sessions.
    pub seed: Option<u64>,
    /// Where the binary writes its log; stdout belongs to the terminal UI.
    pub log_file: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            cols: 20,
            ghost_count: 4,
            max_power_pellets: 4,
            tick_ms: 200,
            frightened_ms: 9000,
            respawn_ms: 4000,
            render_fps: 60,
            generation_attempts: 8,
            seed: None,
            log_file: None,
        }
    }
}

impl GameConfig {
    /// Load config from the file named by `MAZE_CHASE_CONFIG` or
    /// `config/maze_chase.toml`, falling back to defaults, then apply
    /// environment overrides.
    pub fn load() -> Self {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| CONFIG_PATH.to_string());
        let mut config = match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        };
        config.apply_env();
        config
    }

    fn apply_env(&mut self) {
        if let Some(tick_ms) = env_positive("MAZE_CHASE_TICK_MS") {
            self.tick_ms = tick_ms;
        }
        if let Some(fps) = env_positive("MAZE_CHASE_FPS") {
            self.render_fps = fps;
        }
        if let Some(seed) = std::env::var("MAZE_CHASE_SEED")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            self.seed = Some(seed);
        }
        if let Ok(path) = std::env::var("MAZE_CHASE_LOG") {
            if !path.is_empty() {
                self.log_file = Some(PathBuf::from(path));
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTick);
        }
        if self.generation_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if self.rows < MIN_DIM || self.cols < MIN_DIM {
            return Err(MazeError::TooSmall {
                rows: self.rows,
                cols: self.cols,
                min: MIN_DIM,
            }
            .into());
        }
        Ok(())
    }

    pub fn frightened_ticks(&self) -> u32 {
        self.ms_to_ticks(self.frightened_ms)
    }

    pub fn respawn_ticks(&self) -> u32 {
        self.ms_to_ticks(self.respawn_ms)
    }

    fn ms_to_ticks(&self, ms: u64) -> u32 {
        let tick = self.tick_ms.max(1);
        u32::try_from(ms.div_ceil(tick)).unwrap_or(u32::MAX).max(1)
    }
}

fn env_positive(key: &str) -> Option<u64> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|v| *v > 0)
}
