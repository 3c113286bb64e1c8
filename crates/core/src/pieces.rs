//! Pieces module - piece shapes and matrix rotation
//!
//! Each kind is described by a single spawn-state occupancy matrix. The other three
//! rotation states are derived by rotating that matrix 90° at a time rather than being
//! authored per state.
//!
//! Matrix row 0 is the *top* row. A piece anchored at grid `(x, y)` maps matrix cell
//! `(row, col)` to grid cell `(x + col, y + n - 1 - row)`, so the anchor locates the
//! matrix's bottom-left corner.

use crate::types::{Direction, PieceKind, Rotation, GRID_HEIGHT};

/// Largest matrix side length (the I piece).
pub const MAX_MATRIX: usize = 4;

/// Square occupancy matrix of side `n` (2, 3 or 4), stored in a fixed 4x4 array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Matrix {
    n: u8,
    cells: [[bool; MAX_MATRIX]; MAX_MATRIX],
}

impl Matrix {
    /// Build an `n`x`n` matrix from the top-left corner of `rows`.
    pub const fn new(n: u8, rows: [[bool; MAX_MATRIX]; MAX_MATRIX]) -> Self {
        Self { n, cells: rows }
    }

    pub fn size(&self) -> u8 {
        self.n
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        row < self.n as usize && col < self.n as usize && self.cells[row][col]
    }

    /// Rotate clockwise: `m'[i][j] = m[n-1-j][i]`.
    pub fn rotate_cw(&self) -> Self {
        let n = self.n as usize;
        let mut out = [[false; MAX_MATRIX]; MAX_MATRIX];
        for (i, out_row) in out.iter_mut().enumerate().take(n) {
            for (j, cell) in out_row.iter_mut().enumerate().take(n) {
                *cell = self.cells[n - 1 - j][i];
            }
        }
        Self { n: self.n, cells: out }
    }

    /// Rotate counter-clockwise: `m'[i][j] = m[j][n-1-i]`.
    pub fn rotate_ccw(&self) -> Self {
        let n = self.n as usize;
        let mut out = [[false; MAX_MATRIX]; MAX_MATRIX];
        for (i, out_row) in out.iter_mut().enumerate().take(n) {
            for (j, cell) in out_row.iter_mut().enumerate().take(n) {
                *cell = self.cells[j][n - 1 - i];
            }
        }
        Self { n: self.n, cells: out }
    }

    /// Occupied cells as `(dx, dy)` offsets from the bottom-left corner.
    pub fn offsets(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        let n = self.n as usize;
        (0..n).flat_map(move |row| {
            (0..n).filter_map(move |col| {
                self.cells[row][col].then_some((col as i8, (n - 1 - row) as i8))
            })
        })
    }
}

/// Static per-kind data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceShape {
    pub kind: PieceKind,
    /// Spawn-state occupancy
    pub matrix: Matrix,
    /// Anchor (column, row) of the matrix's bottom-left cell on a 22-row grid
    pub spawn: (i8, i8),
    /// Centering offset for next/hold previews; presentation only
    pub display_offset: (f32, f32),
}

impl PieceShape {
    /// Spawn anchor for a grid of the given height; the row keeps its distance from the top.
    pub fn spawn_anchor(&self, grid_height: u8) -> (i8, i8) {
        let shift = grid_height as i8 - GRID_HEIGHT as i8;
        (self.spawn.0, self.spawn.1 + shift)
    }
}

const O: bool = false;
const X: bool = true;

static SHAPES: [PieceShape; 7] = [
    PieceShape {
        kind: PieceKind::I,
        matrix: Matrix::new(
            4,
            [[O, O, O, O], [X, X, X, X], [O, O, O, O], [O, O, O, O]],
        ),
        spawn: (3, 19),
        display_offset: (1.0, 0.0),
    },
    PieceShape {
        kind: PieceKind::J,
        matrix: Matrix::new(
            3,
            [[X, O, O, O], [X, X, X, O], [O, O, O, O], [O, O, O, O]],
        ),
        spawn: (3, 19),
        display_offset: (1.5, 0.5),
    },
    PieceShape {
        kind: PieceKind::L,
        matrix: Matrix::new(
            3,
            [[O, O, X, O], [X, X, X, O], [O, O, O, O], [O, O, O, O]],
        ),
        spawn: (3, 19),
        display_offset: (1.5, 0.5),
    },
    PieceShape {
        kind: PieceKind::O,
        matrix: Matrix::new(
            2,
            [[X, X, O, O], [X, X, O, O], [O, O, O, O], [O, O, O, O]],
        ),
        spawn: (3, 20),
        display_offset: (2.0, 1.5),
    },
    PieceShape {
        kind: PieceKind::S,
        matrix: Matrix::new(
            3,
            [[O, X, X, O], [X, X, O, O], [O, O, O, O], [O, O, O, O]],
        ),
        spawn: (3, 19),
        display_offset: (1.5, 0.5),
    },
    PieceShape {
        kind: PieceKind::T,
        matrix: Matrix::new(
            3,
            [[O, X, O, O], [X, X, X, O], [O, O, O, O], [O, O, O, O]],
        ),
        spawn: (3, 19),
        display_offset: (1.5, 0.5),
    },
    PieceShape {
        kind: PieceKind::Z,
        matrix: Matrix::new(
            3,
            [[X, X, O, O], [O, X, X, O], [O, O, O, O], [O, O, O, O]],
        ),
        spawn: (3, 19),
        display_offset: (1.5, 0.5),
    },
];

/// Get the static shape data for a piece kind
pub fn shape(kind: PieceKind) -> &'static PieceShape {
    &SHAPES[kind.index()]
}

/// Currently controlled piece
///
/// The matrix is an owned value replaced wholesale on every rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub matrix: Matrix,
    pub x: i8,
    pub y: i8,
}

impl ActivePiece {
    /// Create a piece in its spawn state at the kind's spawn anchor
    pub fn spawn(kind: PieceKind, grid_height: u8) -> Self {
        let shape = shape(kind);
        let (x, y) = shape.spawn_anchor(grid_height);
        Self {
            kind,
            rotation: Rotation::North,
            matrix: shape.matrix,
            x,
            y,
        }
    }

    /// Grid coordinates of every occupied cell
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.matrix
            .offsets()
            .map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Same anchor, matrix turned 90° in the given sense.
    pub fn rotated(&self, clockwise: bool) -> Self {
        let (matrix, rotation) = if clockwise {
            (self.matrix.rotate_cw(), self.rotation.rotate_cw())
        } else {
            (self.matrix.rotate_ccw(), self.rotation.rotate_ccw())
        };
        Self {
            matrix,
            rotation,
            ..*self
        }
    }

    pub fn shift(&mut self, direction: Direction) {
        let (dx, dy) = direction.delta();
        self.x += dx;
        self.y += dy;
    }
}
