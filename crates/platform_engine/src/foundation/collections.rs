//! Specialized collection types

use thiserror::Error;

/// Errors raised when building a [`Grid`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Flat data length does not match `width * height`
    #[error("grid data has {actual} cells, expected {width}x{height} = {expected}")]
    SizeMismatch {
        /// Grid width in cells
        width: usize,
        /// Grid height in cells
        height: usize,
        /// `width * height`
        expected: usize,
        /// Length of the supplied data
        actual: usize,
    },
}

/// Row-major 2D grid backed by a single owned buffer
///
/// Used for tile layers. Dropping the grid releases every row at once, so
/// scene unload has nothing to free by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Build a grid from row-major data
    pub fn from_flat(width: usize, height: usize, cells: Vec<T>) -> Result<Self, GridError> {
        let expected = width * height;
        if cells.len() != expected {
            return Err(GridError::SizeMismatch {
                width,
                height,
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self { width, height, cells })
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell at `(row, col)`, `None` when out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        self.index_of(row, col).map(|index| &self.cells[index])
    }

    /// Mutable cell at `(row, col)`, `None` when out of bounds
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        self.index_of(row, col).map(move |index| &mut self.cells[index])
    }

    /// One row as a slice
    pub fn row(&self, row: usize) -> Option<&[T]> {
        if row >= self.height {
            return None;
        }
        let start = row * self.width;
        Some(&self.cells[start..start + self.width])
    }

    /// Iterate `(row, col, cell)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, cell)| (index / width, index % width, cell))
    }

    fn index_of(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.height && col < self.width).then(|| row * self.width + col)
    }
}

impl<T: Clone> Grid<T> {
    /// Grid filled with `value`
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width * height],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_indexing() {
        let grid = Grid::from_flat(3, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(grid.get(0, 2), Some(&3));
        assert_eq!(grid.get(1, 0), Some(&4));
        assert_eq!(grid.row(1), Some(&[4, 5, 6][..]));
    }

    #[test]
    fn test_out_of_bounds_is_none() {
        let grid = Grid::filled(2, 2, 0);
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.get(0, 2), None);
        assert_eq!(grid.row(2), None);
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let err = Grid::from_flat(2, 2, vec![0; 3]).unwrap_err();
        assert_eq!(
            err,
            GridError::SizeMismatch { width: 2, height: 2, expected: 4, actual: 3 }
        );
    }

    #[test]
    fn test_iter_yields_coordinates() {
        let mut grid = Grid::filled(2, 2, 0);
        *grid.get_mut(1, 1).unwrap() = 7;
        let found: Vec<_> = grid.iter().filter(|(_, _, v)| **v == 7).map(|(r, c, _)| (r, c)).collect();
        assert_eq!(found, vec![(1, 1)]);
    }
}
