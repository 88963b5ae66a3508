use std::cmp::Ordering;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::clock::Countdown;
use crate::grid::{Cell, Grid, Heading};
use crate::motion::step;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostKind {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

impl GhostKind {
    pub const ALL: [GhostKind; 4] = [
        GhostKind::Blinky,
        GhostKind::Pinky,
        GhostKind::Inky,
        GhostKind::Clyde,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostMode {
    /// Chasing the player.
    Normal,
    /// Fleeing the player; edible.
    Frightened,
    /// Caught; heading back to the exit until it respawns.
    Eaten,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ghost {
    pub kind: GhostKind,
    pub pos: Cell,
    pub heading: Heading,
    pub mode: GhostMode,
    /// Spawn cell, used when no house cell is open for a respawn.
    pub home: Cell,
    respawn: Countdown,
}

impl Ghost {
    pub fn new(kind: GhostKind, home: Cell) -> Self {
        Self {
            kind,
            pos: home,
            heading: Heading::None,
            mode: GhostMode::Normal,
            home,
            respawn: Countdown::default(),
        }
    }

    pub fn respawn_remaining(&self) -> Option<u32> {
        self.respawn.remaining()
    }

    /// Decide and take one step toward this tick's objective.
    pub fn advance(&mut self, grid: &Grid, player: Cell) {
        let choice = choose_heading(grid, self, player);
        if choice == Heading::None {
            if self.mode != GhostMode::Eaten || self.pos != grid.exit() {
                tracing::trace!(
                    ghost = ?self.kind,
                    row = self.pos.row,
                    col = self.pos.col,
                    "Ghost has no legal heading"
                );
            }
            self.heading = Heading::None;
            return;
        }
        let stride = step(self.pos, self.heading, Some(choice), |c| grid.is_passable(c));
        self.pos = stride.pos;
        self.heading = stride.heading;
    }

    /// Normal ghosts turn tail and become edible. Others are unaffected.
    pub fn frighten(&mut self, grid: &Grid, rng: &mut impl Rng) {
        if self.mode != GhostMode::Normal {
            return;
        }
        self.mode = GhostMode::Frightened;
        self.heading = self.heading.opposite();
        if self.heading == Heading::None {
            self.heading = random_heading(grid, self.pos, rng);
        }
    }

    pub fn calm(&mut self) {
        if self.mode == GhostMode::Frightened {
            self.mode = GhostMode::Normal;
        }
    }

    /// Caught while frightened: back into the house to wait out the respawn.
    pub fn eat(&mut self, grid: &Grid, respawn_ticks: u32, rng: &mut impl Rng) {
        if self.mode != GhostMode::Frightened {
            return;
        }
        self.mode = GhostMode::Eaten;
        let spots: Vec<Cell> = grid
            .house()
            .cells()
            .filter(|c| grid.is_passable(*c))
            .collect();
        self.pos = spots.choose(rng).copied().unwrap_or(self.home);
        self.heading = Heading::None;
        self.respawn.start(respawn_ticks);
    }

    /// Count down the respawn delay; returns true when the ghost came back.
    pub fn tick_respawn(&mut self, grid: &Grid, rng: &mut impl Rng) -> bool {
        if !self.respawn.advance() {
            return false;
        }
        self.revive(grid, rng);
        true
    }

    fn revive(&mut self, grid: &Grid, rng: &mut impl Rng) {
        self.mode = GhostMode::Normal;
        self.respawn.stop();
        let exit = grid.exit();
        let toward = if self.pos == exit {
            Heading::Up
        } else if exit.row.abs_diff(self.pos.row) > exit.col.abs_diff(self.pos.col) {
            if exit.row > self.pos.row {
                Heading::Down
            } else {
                Heading::Up
            }
        } else if exit.col > self.pos.col {
            Heading::Right
        } else {
            Heading::Left
        };
        let open = self.pos.offset(toward).is_some_and(|c| grid.is_passable(c));
        self.heading = if open {
            toward
        } else {
            random_heading(grid, self.pos, rng)
        };
    }
}

fn random_heading(grid: &Grid, pos: Cell, rng: &mut impl Rng) -> Heading {
    grid.legal_headings(pos, Heading::None, false)
        .choose(rng)
        .copied()
        .unwrap_or(Heading::None)
}

/// The heading `ghost` wants this tick, or [`Heading::None`] to stand still.
pub fn choose_heading(grid: &Grid, ghost: &Ghost, player: Cell) -> Heading {
    match ghost.mode {
        GhostMode::Eaten => toward_exit(grid, ghost.pos),
        GhostMode::Normal => pursue(grid, ghost, player, Ordering::Less),
        GhostMode::Frightened => pursue(grid, ghost, player, Ordering::Greater),
    }
}

/// Pick among legal headings by Manhattan distance to `target`; `better`
/// is `Less` to close in and `Greater` to flee. Only re-decides at
/// intersections or when the current heading is blocked.
fn pursue(grid: &Grid, ghost: &Ghost, target: Cell, better: Ordering) -> Heading {
    let options = grid.legal_headings(ghost.pos, ghost.heading, true);
    if options.len() == 1 && options[0] == ghost.heading {
        return ghost.heading;
    }

    let mut best: Option<(Heading, usize)> = None;
    for heading in options {
        let Some(next) = ghost.pos.offset(heading) else {
            continue;
        };
        let dist = next.manhattan(target);
        match best {
            Some((_, best_dist)) if dist.cmp(&best_dist) != better => {}
            _ => best = Some((heading, dist)),
        }
    }
    best.map_or(Heading::None, |(heading, _)| heading)
}

/// First passable heading that gets strictly closer to the exit, else the
/// first passable heading at all. Waits once on the exit.
fn toward_exit(grid: &Grid, pos: Cell) -> Heading {
    let exit = grid.exit();
    if pos == exit {
        return Heading::None;
    }
    let here = pos.manhattan(exit);
    let options = grid.legal_headings(pos, Heading::None, false);
    options
        .iter()
        .copied()
        .find(|h| pos.offset(*h).is_some_and(|c| c.manhattan(exit) < here))
        .or_else(|| options.first().copied())
        .unwrap_or(Heading::None)
}

/// Up to `count` ghosts on distinct, shuffled house cells.
pub fn spawn_ghosts(grid: &Grid, count: usize, rng: &mut impl Rng) -> Vec<Ghost> {
    let mut spots: Vec<Cell> = grid
        .house()
        .cells()
        .filter(|c| grid.is_passable(*c))
        .collect();
    spots.shuffle(rng);

    let mut ghosts = Vec::with_capacity(count);
    for i in 0..count {
        let Some(home) = spots.pop() else {
            break;
        };
        ghosts.push(Ghost::new(GhostKind::ALL[i % GhostKind::ALL.len()], home));
    }
    ghosts
}
