use rand::Rng;

use crate::error::MazeError;
use crate::grid::{Cell, Grid, Heading, Tile, MIN_DIM};

/// Build a connected maze, regenerating up to `attempts` times and patching
/// the last attempt if none of them came out connected.
pub fn generate_connected(
    rng: &mut impl Rng,
    rows: usize,
    cols: usize,
    attempts: u32,
) -> Result<Grid, MazeError> {
    let attempts = attempts.max(1);
    let mut last = None;
    for attempt in 1..=attempts {
        let grid = generate(rng, rows, cols)?;
        if grid.is_connected() {
            return Ok(grid);
        }
        tracing::warn!(attempt, rows, cols, "Generated maze is disconnected, regenerating");
        last = Some(grid);
    }

    let mut grid = match last {
        Some(grid) => grid,
        None => generate(rng, rows, cols)?,
    };
    ensure_connected(&mut grid);
    if grid.is_connected() {
        Ok(grid)
    } else {
        Err(MazeError::Disconnected { attempts })
    }
}

/// One pass of randomized Prim's over the odd cells, then the house and its
/// exit carved on top. Connectivity is not checked here.
pub fn generate(rng: &mut impl Rng, rows: usize, cols: usize) -> Result<Grid, MazeError> {
    if rows < MIN_DIM || cols < MIN_DIM {
        return Err(MazeError::TooSmall {
            rows,
            cols,
            min: MIN_DIM,
        });
    }
    let mut grid = Grid::walled(rows, cols);

    let start = Cell::new(random_odd(rng, rows), random_odd(rng, cols));
    grid.set(start, Tile::Open);
    let mut frontier: Vec<(Cell, Cell)> = Vec::new();
    add_frontier(&grid, start, &mut frontier);

    while !frontier.is_empty() {
        let idx = rng.gen_range(0..frontier.len());
        let (cell, origin) = frontier.swap_remove(idx);
        if grid.is_passable(cell) {
            continue;
        }
        grid.set(cell, Tile::Open);
        grid.set(between(cell, origin), Tile::Open);
        add_frontier(&grid, cell, &mut frontier);
    }

    carve_house(&mut grid);
    Ok(grid)
}

fn random_odd(rng: &mut impl Rng, len: usize) -> usize {
    rng.gen_range(0..(len - 1) / 2) * 2 + 1
}

/// Push the still-walled step-2 neighbours of `cell` that stay inside the
/// border.
fn add_frontier(grid: &Grid, cell: Cell, frontier: &mut Vec<(Cell, Cell)>) {
    for heading in Heading::AXES {
        let Some(next) = cell.offset(heading).and_then(|c| c.offset(heading)) else {
            continue;
        };
        let inside = next.row > 0
            && next.row < grid.rows() - 1
            && next.col > 0
            && next.col < grid.cols() - 1;
        if inside && !grid.is_passable(next) {
            frontier.push((next, cell));
        }
    }
}

fn between(a: Cell, b: Cell) -> Cell {
    Cell::new((a.row + b.row) / 2, (a.col + b.col) / 2)
}

fn carve_house(grid: &mut Grid) {
    let house = *grid.house();
    for cell in house.cells() {
        grid.set(cell, Tile::Open);
    }
    grid.set(house.exit, Tile::Open);

    // Carve upward from the exit until we hit open space so the exit always
    // touches the maze outside the house.
    let mut row = house.exit.row;
    while row > 1 {
        row -= 1;
        let cell = Cell::new(row, house.exit.col);
        if grid.is_passable(cell) {
            break;
        }
        grid.set(cell, Tile::Open);
    }
}

/// Open single wall tiles that join the exit's region to an unreachable one
/// until everything is reachable or no such tile exists.
fn ensure_connected(grid: &mut Grid) {
    let rows = grid.rows();
    let cols = grid.cols();
    let mut iterations = 0;
    while !grid.is_connected() && iterations < rows * cols {
        let reachable = grid.reachable_from(grid.exit());
        let mut bridge = None;
        'scan: for row in 1..rows - 1 {
            for col in 1..cols - 1 {
                let cell = Cell::new(row, col);
                if grid.is_passable(cell) {
                    continue;
                }
                let mut has_reach = false;
                let mut has_unreach = false;
                for heading in Heading::AXES {
                    let Some(n) = cell.offset(heading) else {
                        continue;
                    };
                    if !grid.is_passable(n) {
                        continue;
                    }
                    if reachable[n.row][n.col] {
                        has_reach = true;
                    } else {
                        has_unreach = true;
                    }
                }
                if has_reach && has_unreach {
                    bridge = Some(cell);
                    break 'scan;
                }
            }
        }

        let Some(cell) = bridge else {
            break;
        };
        tracing::debug!(row = cell.row, col = cell.col, "Bridging disconnected maze region");
        grid.set(cell, Tile::Open);
        iterations += 1;
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn classic_grid_house_and_exit_are_open() {
        let mut rng = StdRng::seed_from_u64(1);
        let grid = generate_connected(&mut rng, 20, 20, 8).unwrap();
        let house = *grid.house();

        assert!(house.cells().all(|c| grid.is_passable(c)));
        assert!(grid.is_passable(house.exit));

        let outside = Heading::AXES
            .into_iter()
            .filter_map(|h| house.exit.offset(h))
            .filter(|c| grid.is_passable(*c) && !grid.is_in_house(*c))
            .count();
        assert!(outside >= 1, "exit must touch the maze outside the house");
        assert!(grid.is_connected());
    }

    #[test]
    fn border_stays_wall() {
        let mut rng = StdRng::seed_from_u64(9);
        let grid = generate(&mut rng, 21, 31).unwrap();
        for col in 0..grid.cols() {
            assert!(!grid.is_passable(Cell::new(0, col)));
            assert!(!grid.is_passable(Cell::new(grid.rows() - 1, col)));
        }
        for row in 0..grid.rows() {
            assert!(!grid.is_passable(Cell::new(row, 0)));
            assert!(!grid.is_passable(Cell::new(row, grid.cols() - 1)));
        }
    }

    #[test]
    fn same_seed_same_maze() {
        let a = generate(&mut StdRng::seed_from_u64(42), 20, 20).unwrap();
        let b = generate(&mut StdRng::seed_from_u64(42), 20, 20).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn too_small_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            generate(&mut rng, 6, 20),
            Err(MazeError::TooSmall {
                rows: 6,
                cols: 20,
                min: MIN_DIM
            })
        );
    }

    #[test]
    fn repair_bridges_an_island() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut grid = generate(&mut rng, 20, 20).unwrap();
        // Cut both links into the bottom-right odd cell.
        grid.set(Cell::new(17, 16), Tile::Wall);
        grid.set(Cell::new(16, 17), Tile::Wall);
        assert!(!grid.is_connected());

        ensure_connected(&mut grid);
        assert!(grid.is_connected());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn every_open_cell_reachable_from_exit(
                seed in 0u64..5000,
                rows in MIN_DIM..40usize,
                cols in MIN_DIM..40usize,
            ) {
                let mut rng = StdRng::seed_from_u64(seed);
                let grid = generate_connected(&mut rng, rows, cols, 4).unwrap();
                prop_assert!(grid.is_connected());
                prop_assert!(grid.is_passable(grid.exit()));
                prop_assert!(grid.house().cells().all(|c| grid.is_passable(c)));
            }
        }
    }
}
