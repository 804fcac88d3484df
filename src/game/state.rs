use std::fmt;

use thiserror::Error;

/// Value of a single cell: `0` for empty, otherwise a power of two
pub type Tile = u64;

/// Largest tile a grid may hold. Two tiles of this value do not merge.
pub const MAX_TILE: Tile = 1 << 62;

/// A cell coordinate on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Reasons a set of rows cannot form a grid
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid must have at least one row")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("cell ({row}, {col}) holds {value}, which is neither 0 nor a power of two in [2, 2^62]")]
    InvalidTile { row: usize, col: usize, value: Tile },
}

/// Square N×N board of tiles, stored row-major.
///
/// A `Grid` is a value: every transition produces a new one and the
/// previous grid is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    cells: Vec<Tile>,
}

impl Grid {
    /// All-empty grid of `size`×`size` cells
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Build a grid from explicit rows, checking shape and tile values
    pub fn from_rows<R: AsRef<[Tile]>>(rows: &[R]) -> Result<Self, GridError> {
        let size = rows.len();
        if size == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != size {
                return Err(GridError::Ragged {
                    row,
                    expected: size,
                    found: values.len(),
                });
            }
            for (col, &value) in values.iter().enumerate() {
                if !is_valid_tile(value) {
                    return Err(GridError::InvalidTile { row, col, value });
                }
                cells.push(value);
            }
        }

        Ok(Self { size, cells })
    }

    /// Side length N
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, pos: Position) -> Tile {
        self.cells[self.index(pos)]
    }

    /// Copy of this grid with one cell replaced
    pub fn with_tile(&self, pos: Position, value: Tile) -> Grid {
        debug_assert!(is_valid_tile(value), "invalid tile value {value}");
        let mut next = self.clone();
        next.set(pos, value);
        next
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.cells.chunks(self.size)
    }

    pub fn to_rows(&self) -> Vec<Vec<Tile>> {
        self.rows().map(|row| row.to_vec()).collect()
    }

    /// Coordinates of every empty cell, row-major
    pub fn empty_positions(&self) -> Vec<Position> {
        self.positions().filter(|&pos| self.get(pos) == 0).collect()
    }

    /// Number of nonzero cells
    pub fn tile_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v != 0).count()
    }

    /// Sum of all tile values, widened so large boards cannot overflow
    pub fn total_value(&self) -> u128 {
        self.cells.iter().map(|&v| u128::from(v)).sum()
    }

    pub fn highest_tile(&self) -> Tile {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Every coordinate on the grid, row-major
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.size).flat_map(move |row| (0..self.size).map(move |col| Position::new(row, col)))
    }

    pub(crate) fn set(&mut self, pos: Position, value: Tile) {
        let idx = self.index(pos);
        self.cells[idx] = value;
    }

    fn index(&self, pos: Position) -> usize {
        assert!(
            pos.row < self.size && pos.col < self.size,
            "position {:?} outside {}x{} grid",
            pos,
            self.size,
            self.size
        );
        pos.row * self.size + pos.col
    }
}

/// Returns true for `0` and for powers of two from 2 up to `MAX_TILE`
pub fn is_valid_tile(value: Tile) -> bool {
    value == 0 || ((2..=MAX_TILE).contains(&value) && value.is_power_of_two())
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.highest_tile().to_string().len().max(4);
        let separator = "-".repeat((width + 1) * self.size - 1);

        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f, "{separator}")?;
            }
            let cells: Vec<String> = row
                .iter()
                .map(|&v| {
                    if v == 0 {
                        format!("{:>width$}", ".")
                    } else {
                        format!("{v:>width$}")
                    }
                })
                .collect();
            writeln!(f, "{}", cells.join("|"))?;
        }

        Ok(())
    }
}
