use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::clock::SimulationClock;
use crate::collectibles::{CollectibleSet, PickupKind};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::ghost::{spawn_ghosts, Ghost, GhostMode};
use crate::grid::{Grid, Heading};
use crate::maze::generate_connected;
use crate::player::{spawn_point, Player};

pub const GHOST_POINTS: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Running,
    Won,
    Lost,
}

/// Notifications for the presentation layer, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ScoreChanged(u32),
    GameOver,
    GameWon,
}

/// One game session: maze, agents, collectibles, timers and score.
pub struct Game {
    config: GameConfig,
    seed: u64,
    rng: StdRng,
    grid: Grid,
    player: Player,
    ghosts: Vec<Ghost>,
    collectibles: CollectibleSet,
    clock: SimulationClock,
    score: u32,
    phase: Phase,
    events: Vec<GameEvent>,
}

impl Game {
    /// Validate `config` and build the first board. Uses `config.seed` when
    /// set, otherwise a random one.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);
        let grid = generate_connected(
            &mut rng,
            config.rows,
            config.cols,
            config.generation_attempts,
        )?;
        let player = Player::new(spawn_point(&grid, &mut rng));
        let ghosts = spawn_ghosts(&grid, config.ghost_count, &mut rng);
        let collectibles =
            CollectibleSet::place(&grid, player.pos, config.max_power_pellets, &mut rng);
        tracing::info!(seed, rows = config.rows, cols = config.cols, "New maze generated");

        Ok(Self {
            clock: SimulationClock::new(config.tick_ms),
            config,
            seed,
            rng,
            grid,
            player,
            ghosts,
            collectibles,
            score: 0,
            phase: Phase::NotStarted,
            events: Vec::new(),
        })
    }

    /// Throw the board away and build a new one. Without a seed the next one
    /// is drawn from the current generator, so seeded sessions replay
    /// exactly. Leaves the game in [`Phase::NotStarted`]; on error the
    /// previous board is kept.
    pub fn reset(&mut self, seed: Option<u64>) -> Result<(), GameError> {
        let seed = seed.unwrap_or_else(|| self.rng.gen());
        let config = GameConfig {
            seed: Some(seed),
            ..self.config.clone()
        };
        let fresh = Self::new(config)?;
        *self = Self {
            config: self.config.clone(),
            ..fresh
        };
        Ok(())
    }

    /// NotStarted -> Running. Returns false in any other phase.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::NotStarted {
            return false;
        }
        self.phase = Phase::Running;
        tracing::info!(seed = self.seed, "Game started");
        true
    }

    /// Buffer a heading for the player's next move. Ignored unless running.
    pub fn on_directional_input(&mut self, heading: Heading) {
        if self.phase == Phase::Running {
            self.player.steer(heading);
        }
    }

    /// Advance the simulation by one tick.
    pub fn on_tick(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.advance_timers();
        self.player.advance(&self.grid);
        self.collect();
        for ghost in &mut self.ghosts {
            ghost.advance(&self.grid, self.player.pos);
        }
        if self.resolve_collisions() {
            return;
        }
        if self.collectibles.is_empty() {
            self.phase = Phase::Won;
            self.events.push(GameEvent::GameWon);
            tracing::info!(score = self.score, ticks = self.clock.ticks(), "Board cleared");
        }
    }

    /// Hand over everything emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn advance_timers(&mut self) {
        if self.clock.advance() {
            tracing::debug!("Frighten expired");
            for ghost in &mut self.ghosts {
                ghost.calm();
            }
        }
        for ghost in &mut self.ghosts {
            if ghost.tick_respawn(&self.grid, &mut self.rng) {
                tracing::debug!(ghost = ?ghost.kind, "Ghost respawned");
            }
        }
    }

    fn collect(&mut self) {
        let Some(pickup) = self.collectibles.consume(self.player.pos) else {
            return;
        };
        self.add_score(pickup.points);
        if pickup.kind == PickupKind::Power {
            for ghost in &mut self.ghosts {
                ghost.frighten(&self.grid, &mut self.rng);
            }
            self.clock.start_frighten(self.config.frightened_ticks());
            tracing::debug!(
                ticks = self.config.frightened_ticks(),
                "Power pellet eaten, ghosts frightened"
            );
        }
    }

    /// Returns true when the player was caught and the tick must stop.
    fn resolve_collisions(&mut self) -> bool {
        let respawn_ticks = self.config.respawn_ticks();
        for idx in 0..self.ghosts.len() {
            if self.ghosts[idx].pos != self.player.pos {
                continue;
            }
            match self.ghosts[idx].mode {
                GhostMode::Normal => {
                    self.phase = Phase::Lost;
                    self.events.push(GameEvent::GameOver);
                    tracing::info!(
                        score = self.score,
                        ghost = ?self.ghosts[idx].kind,
                        "Player caught"
                    );
                    return true;
                }
                GhostMode::Frightened => {
                    self.ghosts[idx].eat(&self.grid, respawn_ticks, &mut self.rng);
                    self.add_score(GHOST_POINTS);
                    tracing::debug!(ghost = ?self.ghosts[idx].kind, "Ghost eaten");
                }
                GhostMode::Eaten => {}
            }
        }
        false
    }

    fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        self.events.push(GameEvent::ScoreChanged(self.score));
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    pub fn collectibles(&self) -> &CollectibleSet {
        &self.collectibles
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn tick_count(&self) -> u64 {
        self.clock.ticks()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.clock.elapsed_ms()
    }

    pub fn frightened_remaining(&self) -> Option<u32> {
        self.clock.frighten_remaining()
    }
}
