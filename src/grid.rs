use std::collections::VecDeque;

/// Smallest grid edge that still fits the house, its exit and the border.
pub const MIN_DIM: usize = 8;

const HOUSE_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Open,
}

/// A grid position. Rows grow downward, columns grow to the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The neighbouring cell along `heading`, or `None` when it would fall
    /// off the top or left edge.
    pub fn offset(self, heading: Heading) -> Option<Cell> {
        let (dr, dc) = heading.delta();
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        Some(Cell { row, col })
    }

    pub fn manhattan(self, other: Cell) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
    None,
}

impl Heading {
    /// Axis headings in tie-break order.
    pub const AXES: [Heading; 4] = [Heading::Right, Heading::Left, Heading::Down, Heading::Up];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Heading::Up => (-1, 0),
            Heading::Down => (1, 0),
            Heading::Left => (0, -1),
            Heading::Right => (0, 1),
            Heading::None => (0, 0),
        }
    }

    pub fn opposite(self) -> Heading {
        match self {
            Heading::Up => Heading::Down,
            Heading::Down => Heading::Up,
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
            Heading::None => Heading::None,
        }
    }
}

/// The ghost house: a fixed open rectangle centred in the grid with one
/// exit cell above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct House {
    pub top: usize,
    pub left: usize,
    /// Exclusive.
    pub bottom: usize,
    /// Exclusive.
    pub right: usize,
    pub exit: Cell,
}

impl House {
    /// House bounds for a `rows x cols` grid. Callers guarantee both are at
    /// least [`MIN_DIM`].
    pub fn for_grid(rows: usize, cols: usize) -> Self {
        let top = rows / 2 - 2;
        let left = cols / 2 - 2;
        Self {
            top,
            left,
            bottom: top + HOUSE_SIZE,
            right: left + HOUSE_SIZE,
            exit: Cell::new(top - 1, left + 1),
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (self.top..self.bottom).contains(&cell.row) && (self.left..self.right).contains(&cell.col)
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (self.top..self.bottom)
            .flat_map(move |row| (self.left..self.right).map(move |col| Cell::new(row, col)))
    }
}

/// The static maze: tiles plus the house they were carved around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    tiles: Vec<Vec<Tile>>,
    house: House,
}

impl Grid {
    /// A grid of solid wall with the house bounds for its size.
    pub(crate) fn walled(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            tiles: vec![vec![Tile::Wall; cols]; rows],
            house: House::for_grid(rows, cols),
        }
    }

    pub(crate) fn set(&mut self, cell: Cell, tile: Tile) {
        if cell.row < self.rows && cell.col < self.cols {
            self.tiles[cell.row][cell.col] = tile;
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn house(&self) -> &House {
        &self.house
    }

    pub fn exit(&self) -> Cell {
        self.house.exit
    }

    /// Out-of-bounds cells read as wall.
    pub fn tile(&self, cell: Cell) -> Tile {
        self.tiles
            .get(cell.row)
            .and_then(|row| row.get(cell.col))
            .copied()
            .unwrap_or(Tile::Wall)
    }

    pub fn is_passable(&self, cell: Cell) -> bool {
        self.tile(cell) == Tile::Open
    }

    pub fn is_in_house(&self, cell: Cell) -> bool {
        self.house.contains(cell)
    }

    fn can_step(&self, cell: Cell, heading: Heading) -> bool {
        cell.offset(heading).is_some_and(|next| self.is_passable(next))
    }

    /// Axis headings out of `cell` that lead onto open tiles, in
    /// [`Heading::AXES`] order. With `forbid_reverse`, the heading opposite
    /// `current` is dropped unless it is the only way out.
    pub fn legal_headings(
        &self,
        cell: Cell,
        current: Heading,
        forbid_reverse: bool,
    ) -> Vec<Heading> {
        let mut options: Vec<Heading> = Heading::AXES
            .into_iter()
            .filter(|h| self.can_step(cell, *h))
            .collect();
        if forbid_reverse && current != Heading::None && options.len() > 1 {
            let back = current.opposite();
            options.retain(|h| *h != back);
        }
        options
    }

    pub fn open_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows)
            .flat_map(move |row| (0..self.cols).map(move |col| Cell::new(row, col)))
            .filter(move |c| self.is_passable(*c))
    }

    /// Flood fill over open tiles from `start`.
    pub fn reachable_from(&self, start: Cell) -> Vec<Vec<bool>> {
        let mut seen = vec![vec![false; self.cols]; self.rows];
        if !self.is_passable(start) {
            return seen;
        }
        let mut q = VecDeque::new();
        seen[start.row][start.col] = true;
        q.push_back(start);
        while let Some(pos) = q.pop_front() {
            for heading in Heading::AXES {
                let Some(next) = pos.offset(heading) else {
                    continue;
                };
                if !self.is_passable(next) || seen[next.row][next.col] {
                    continue;
                }
                seen[next.row][next.col] = true;
                q.push_back(next);
            }
        }
        seen
    }

    /// True when every open tile can be reached from the house exit.
    pub fn is_connected(&self) -> bool {
        let reachable = self.reachable_from(self.exit());
        self.open_cells().all(|c| reachable[c.row][c.col])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> Grid {
        let mut grid = Grid::walled(9, 9);
        for col in 1..8 {
            grid.set(Cell::new(1, col), Tile::Open);
        }
        grid.set(Cell::new(2, 4), Tile::Open);
        grid
    }

    #[test]
    fn house_formula_for_classic_grid() {
        let house = House::for_grid(20, 20);
        assert_eq!((house.top, house.left, house.bottom, house.right), (8, 8, 12, 12));
        assert_eq!(house.exit, Cell::new(7, 9));
        assert_eq!(house.cells().count(), 16);
        assert!(house.contains(Cell::new(11, 11)));
        assert!(!house.contains(Cell::new(12, 11)));
        assert!(!house.contains(house.exit));
    }

    #[test]
    fn out_of_bounds_is_not_passable() {
        let grid = corridor();
        assert!(!grid.is_passable(Cell::new(1, 9)));
        assert!(!grid.is_passable(Cell::new(40, 1)));
        assert_eq!(Cell::new(0, 0).offset(Heading::Up), None);
        assert_eq!(Cell::new(0, 0).offset(Heading::Left), None);
    }

    #[test]
    fn legal_headings_use_fixed_order() {
        let grid = corridor();
        assert_eq!(
            grid.legal_headings(Cell::new(1, 4), Heading::None, false),
            vec![Heading::Right, Heading::Left, Heading::Down]
        );
    }

    #[test]
    fn reverse_dropped_unless_dead_end() {
        let grid = corridor();
        assert_eq!(
            grid.legal_headings(Cell::new(1, 4), Heading::Right, true),
            vec![Heading::Right, Heading::Down]
        );
        // (1,7) is a dead end: reversing is the only way out.
        assert_eq!(
            grid.legal_headings(Cell::new(1, 7), Heading::Right, true),
            vec![Heading::Left]
        );
    }

    #[test]
    fn connectivity_detects_islands() {
        // The exit (1,3) sits on the corridor.
        let mut grid = corridor();
        assert!(grid.is_passable(grid.exit()));
        assert!(grid.is_connected());

        grid.set(Cell::new(7, 7), Tile::Open);
        assert!(!grid.is_connected());
    }
}
