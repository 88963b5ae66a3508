use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::{Cell, Grid, Heading};
use crate::motion::step;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub pos: Cell,
    pub heading: Heading,
    /// Last requested heading, applied at the first tick it is legal.
    pub next_heading: Option<Heading>,
}

impl Player {
    pub fn new(pos: Cell) -> Self {
        Self {
            pos,
            heading: Heading::None,
            next_heading: None,
        }
    }

    pub fn steer(&mut self, heading: Heading) {
        if heading != Heading::None {
            self.next_heading = Some(heading);
        }
    }

    pub fn advance(&mut self, grid: &Grid) {
        let stride = step(self.pos, self.heading, self.next_heading, |c| grid.is_passable(c));
        self.pos = stride.pos;
        self.heading = stride.heading;
        self.next_heading = stride.desired;
    }
}

/// A random open cell strictly inside the border and outside the house.
pub fn spawn_point(grid: &Grid, rng: &mut impl Rng) -> Cell {
    let candidates: Vec<Cell> = grid
        .open_cells()
        .filter(|c| {
            c.row > 0 && c.col > 0 && c.row < grid.rows() - 1 && c.col < grid.cols() - 1
        })
        .filter(|c| !grid.is_in_house(*c))
        .collect();
    candidates.choose(rng).copied().unwrap_or(Cell::new(1, 1))
}
