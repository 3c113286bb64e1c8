//! Grid module - the placed-block playfield
//!
//! Row 0 is the bottom row, row `height - 1` the top. Cells are stored in a flat
//! row-major vector (`y * width + x`) whose size never changes after construction.
//! Clearing rows compacts the survivors downwards in place and refills the top with
//! empty rows, so a clear and the following collapse happen in one pass.

use arrayvec::ArrayVec;
use tracing::warn;

use crate::error::EngineError;
use crate::pieces::ActivePiece;
use crate::types::{Cell, GRID_HEIGHT, GRID_WIDTH};

/// Allowed width range; pieces spawn at column 3 and coordinates are `i8`.
pub const WIDTH_RANGE: std::ops::RangeInclusive<u8> = 7..=64;

/// Allowed height range.
pub const HEIGHT_RANGE: std::ops::RangeInclusive<u8> = 4..=100;

/// The placed-block playfield
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u8,
    height: u8,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty grid
    pub fn new(width: u8, height: u8) -> Result<Self, EngineError> {
        if !WIDTH_RANGE.contains(&width) || !HEIGHT_RANGE.contains(&height) {
            return Err(EngineError::InvalidGrid { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        })
    }

    #[inline(always)]
    fn index(&self, x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= self.width as i8 || y < 0 || y >= self.height as i8 {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Whether a single piece cell may sit at (x, y).
    ///
    /// Columns must be inside the grid and rows non-negative. Rows at or above the top
    /// are the spawn buffer and never block.
    pub fn accepts(&self, x: i8, y: i8) -> bool {
        if x < 0 || x >= self.width as i8 || y < 0 {
            return false;
        }
        y >= self.height as i8 || !self.is_occupied(x, y)
    }

    /// One row, left to right. Panics if `y` is out of range.
    pub fn row(&self, y: usize) -> &[Cell] {
        let start = y * self.width as usize;
        &self.cells[start..start + self.width as usize]
    }

    /// Rows from bottom (index 0) to top.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width as usize)
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= self.height as usize {
            return false;
        }
        self.row(y).iter().all(|cell| cell.is_some())
    }

    /// Remove the given rows and append as many empty rows at the top.
    ///
    /// Surviving rows keep their relative order. Duplicate and out-of-range indices are
    /// ignored. Returns the number of rows removed.
    pub fn clear_and_collapse(&mut self, rows: &[usize]) -> usize {
        let width = self.width as usize;
        let height = self.height as usize;
        let mut write_y = 0usize;

        // Scan bottom to top, moving each survivor down to the write position
        for read_y in 0..height {
            if rows.contains(&read_y) {
                continue;
            }
            if write_y != read_y {
                let src_start = read_y * width;
                self.cells
                    .copy_within(src_start..src_start + width, write_y * width);
            }
            write_y += 1;
        }

        for cell in &mut self.cells[write_y * width..] {
            *cell = None;
        }

        height - write_y
    }

    /// Clear every full row among `candidates`; returns the cleared rows bottom to top.
    pub fn clear_full_rows<I>(&mut self, candidates: I) -> ArrayVec<u8, 4>
    where
        I: IntoIterator<Item = i8>,
    {
        let mut full = ArrayVec::<u8, 4>::new();
        for y in candidates {
            if y < 0 || full.contains(&(y as u8)) || !self.is_row_full(y as usize) {
                continue;
            }
            if full.try_push(y as u8).is_err() {
                break;
            }
        }
        full.sort_unstable();

        let rows: ArrayVec<usize, 4> = full.iter().map(|&y| y as usize).collect();
        self.clear_and_collapse(&rows);
        full
    }

    /// Whether every cell of the piece lies on a stored row.
    pub fn holds(&self, piece: &ActivePiece) -> bool {
        piece.cells().all(|(_, y)| y < self.height as i8)
    }

    /// Write the piece's cells into the grid.
    ///
    /// The piece must fit and lie entirely below the top. Anything else is a caller bug:
    /// it trips a debug assertion, and release builds log it and leave the grid
    /// untouched, so a piece is never stored with blocks missing.
    pub fn place(&mut self, piece: &ActivePiece) -> bool {
        let fits = self.holds(piece) && piece.cells().all(|(x, y)| self.accepts(x, y));
        debug_assert!(fits, "placing a piece that does not fit: {:?}", piece);
        if !fits {
            warn!(kind = ?piece.kind, x = piece.x, y = piece.y, "refusing to place piece");
            return false;
        }

        for (x, y) in piece.cells() {
            self.set(x, y, Some(piece.kind));
        }
        true
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire grid
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            cells: vec![None; GRID_WIDTH as usize * GRID_HEIGHT as usize],
        }
    }
}
