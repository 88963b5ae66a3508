use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::{Cell, Grid};

pub const DOT_POINTS: u32 = 10;
pub const PELLET_POINTS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupKind {
    Dot,
    Power,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pickup {
    pub kind: PickupKind,
    pub points: u32,
}

/// Dots and power pellets still on the board. The two sets never overlap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectibleSet {
    dots: BTreeSet<Cell>,
    pellets: BTreeSet<Cell>,
}

impl CollectibleSet {
    /// Fill every open cell outside the house except `player_start`. Up to
    /// `max_pellets` of them, and never more than a tenth, become pellets.
    pub fn place(grid: &Grid, player_start: Cell, max_pellets: usize, rng: &mut impl Rng) -> Self {
        let candidates: Vec<Cell> = grid
            .open_cells()
            .filter(|c| !grid.is_in_house(*c) && *c != player_start)
            .collect();
        let count = max_pellets.min(candidates.len() / 10);
        let pellets: BTreeSet<Cell> = candidates.choose_multiple(rng, count).copied().collect();
        let dots = candidates
            .into_iter()
            .filter(|c| !pellets.contains(c))
            .collect();
        Self { dots, pellets }
    }

    /// Remove whatever sits on `cell`. Returns `None` if nothing was there,
    /// so a repeated call never scores twice.
    pub fn consume(&mut self, cell: Cell) -> Option<Pickup> {
        if self.dots.remove(&cell) {
            Some(Pickup {
                kind: PickupKind::Dot,
                points: DOT_POINTS,
            })
        } else if self.pellets.remove(&cell) {
            Some(Pickup {
                kind: PickupKind::Power,
                points: PELLET_POINTS,
            })
        } else {
            None
        }
    }

    pub fn dots(&self) -> &BTreeSet<Cell> {
        &self.dots
    }

    pub fn pellets(&self) -> &BTreeSet<Cell> {
        &self.pellets
    }

    pub fn remaining(&self) -> usize {
        self.dots.len() + self.pellets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dots.is_empty() && self.pellets.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn from_cells(
        dots: impl IntoIterator<Item = Cell>,
        pellets: impl IntoIterator<Item = Cell>,
    ) -> Self {
        let pellets: BTreeSet<Cell> = pellets.into_iter().collect();
        let dots = dots.into_iter().filter(|c| !pellets.contains(c)).collect();
        Self { dots, pellets }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::maze::generate_connected;
    use crate::player::spawn_point;

    #[test]
    fn placement_respects_exclusions() {
        let mut rng = StdRng::seed_from_u64(5);
        let grid = generate_connected(&mut rng, 20, 20, 4).unwrap();
        let start = spawn_point(&grid, &mut rng);
        let set = CollectibleSet::place(&grid, start, 4, &mut rng);

        assert_eq!(set.pellets().len(), 4);
        assert!(set.dots().is_disjoint(set.pellets()));
        for cell in set.dots().iter().chain(set.pellets()) {
            assert!(grid.is_passable(*cell));
            assert!(!grid.is_in_house(*cell));
            assert_ne!(*cell, start);
        }
        let expected = grid
            .open_cells()
            .filter(|c| !grid.is_in_house(*c) && *c != start)
            .count();
        assert_eq!(set.remaining(), expected);
    }

    #[test]
    fn pellets_capped_by_tenth_of_candidates() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut grid = Grid::walled(20, 20);
        for col in 1..16 {
            grid.set(Cell::new(1, col), crate::grid::Tile::Open);
        }
        let set = CollectibleSet::place(&grid, Cell::new(1, 1), 4, &mut rng);
        // 14 candidates allow a single pellet.
        assert_eq!(set.pellets().len(), 1);
        assert_eq!(set.dots().len(), 13);
    }

    #[test]
    fn consume_is_idempotent() {
        let mut set = CollectibleSet::from_cells([Cell::new(1, 1)], [Cell::new(1, 2)]);
        assert_eq!(
            set.consume(Cell::new(1, 1)),
            Some(Pickup {
                kind: PickupKind::Dot,
                points: DOT_POINTS
            })
        );
        assert_eq!(set.consume(Cell::new(1, 1)), None);
        assert_eq!(set.consume(Cell::new(1, 2)).map(|p| p.kind), Some(PickupKind::Power));
        assert_eq!(set.consume(Cell::new(1, 2)), None);
        assert!(set.is_empty());
    }
}
