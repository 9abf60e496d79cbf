/// Number of cells per grid axis.
pub const GRID_DIM: usize = 5;

/// Fixed 5×5 row-major container. Constructed through [`Grid::from_fn`],
/// so a malformed outer shape cannot be represented.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    cells: Vec<T>,
}

impl<T> Grid<T> {
    pub fn from_fn(mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut cells = Vec::with_capacity(GRID_DIM * GRID_DIM);
        for row in 0..GRID_DIM {
            for col in 0..GRID_DIM {
                cells.push(f(row, col));
            }
        }
        Self { cells }
    }

    pub fn get(&self, row: usize, col: usize) -> &T {
        &self.cells[row * GRID_DIM + col]
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        &mut self.cells[row * GRID_DIM + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) -> T {
        std::mem::replace(&mut self.cells[row * GRID_DIM + col], value)
    }

    pub fn map<U>(&self, mut f: impl FnMut(usize, usize, &T) -> U) -> Grid<U> {
        Grid::from_fn(|row, col| f(row, col, self.get(row, col)))
    }
}

/// All `(row, col)` positions in row-major order.
pub fn grid_positions() -> impl Iterator<Item = (usize, usize)> {
    (0..GRID_DIM).flat_map(|row| (0..GRID_DIM).map(move |col| (row, col)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_fn_is_row_major() {
        let grid = Grid::from_fn(|row, col| (row, col));
        assert_eq!(*grid.get(0, 4), (0, 4));
        assert_eq!(*grid.get(4, 0), (4, 0));
        assert_eq!(*grid.get(2, 3), (2, 3));
    }

    #[test]
    fn set_returns_previous_value() {
        let mut grid = Grid::from_fn(|row, col| row * 10 + col);
        let old = grid.set(1, 2, 99);
        assert_eq!(old, 12);
        assert_eq!(*grid.get(1, 2), 99);
    }

    #[test]
    fn positions_cover_all_cells() {
        assert_eq!(grid_positions().count(), GRID_DIM * GRID_DIM);
    }
}
