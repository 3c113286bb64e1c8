//! Kick resolution for moves, drops and rotations.
//!
//! No kick tables: a candidate that does not fit is nudged one cell at a time along a
//! single axis until it fits or the attempt budget runs out. Rejection is an ordinary
//! outcome reported through the return value.

use crate::grid::Grid;
use crate::pieces::ActivePiece;
use crate::types::Direction;

/// Corrective cells a rotation may use per direction; the widest overhang in the
/// shape set is 2 cells.
pub const ROTATION_KICK_ALLOWANCE: u8 = 2;

/// One past the allowance, so an exhausted budget is distinguishable from a last-step fit.
const ROTATION_KICK_ATTEMPTS: u8 = ROTATION_KICK_ALLOWANCE + 1;

/// Whether every occupied cell of the piece is placeable.
pub fn fits(piece: &ActivePiece, grid: &Grid) -> bool {
    piece.cells().all(|(x, y)| grid.accepts(x, y))
}

/// Nudge `piece` towards `direction` while it does not fit, at most `attempts` times.
///
/// Returns the number of shifts applied. A result equal to `attempts` means the final
/// position was never checked and the caller should treat the kick as failed.
pub fn kick(piece: &mut ActivePiece, grid: &Grid, direction: Direction, attempts: u8) -> u8 {
    let mut shifts = 0;
    while shifts < attempts && !fits(piece, grid) {
        piece.shift(direction);
        shifts += 1;
    }
    shifts
}

/// Move one cell sideways. A blocked move is kicked straight back.
///
/// Returns true if the piece ended up one cell further in `direction`.
pub fn try_shift(piece: &mut ActivePiece, grid: &Grid, direction: Direction) -> bool {
    piece.shift(direction);
    kick(piece, grid, direction.opposite(), 1) == 0
}

/// Move one row down. Returns false (with the piece back in place) when blocked,
/// meaning the piece must lock.
pub fn try_drop(piece: &mut ActivePiece, grid: &Grid) -> bool {
    piece.shift(Direction::Down);
    kick(piece, grid, Direction::Up, 1) == 0
}

/// Rotate with kicks, trying left, right, up and down in that order.
///
/// Returns the resolved piece, or `None` if no direction works within
/// [`ROTATION_KICK_ALLOWANCE`]. The input piece is never modified.
pub fn try_rotate(piece: &ActivePiece, grid: &Grid, clockwise: bool) -> Option<ActivePiece> {
    let rotated = piece.rotated(clockwise);

    Direction::ALL.into_iter().find_map(|direction| {
        let mut candidate = rotated;
        let shifts = kick(&mut candidate, grid, direction, ROTATION_KICK_ATTEMPTS);
        (shifts <= ROTATION_KICK_ALLOWANCE).then_some(candidate)
    })
}

/// Row the piece would land on if dropped straight down.
///
/// Works on a detached copy; the caller's piece is untouched.
pub fn landing_row(piece: &ActivePiece, grid: &Grid) -> i8 {
    let mut ghost = *piece;
    while try_drop(&mut ghost, grid) {}
    ghost.y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PieceKind, Rotation};
    use proptest::prelude::*;

    fn piece_at(kind: PieceKind, x: i8, y: i8) -> ActivePiece {
        let mut p = ActivePiece::spawn(kind, 22);
        p.x = x;
        p.y = y;
        p
    }

    #[test]
    fn test_fits_ignores_spawn_buffer_rows() {
        let grid = Grid::default();
        // I spawn row sits at 21; pushing it up keeps it valid.
        assert!(fits(&piece_at(PieceKind::I, 3, 25), &grid));
        // The filled I row sits two above the anchor, so y=-1 puts blocks on row 1.
        assert!(fits(&piece_at(PieceKind::I, 3, -1), &grid));
        assert!(!fits(&piece_at(PieceKind::I, 3, -3), &grid));
        assert!(!fits(&piece_at(PieceKind::I, 7, 10), &grid));
    }

    #[test]
    fn test_fits_detects_overlap() {
        let mut grid = Grid::default();
        grid.set(4, 10, Some(PieceKind::Z));
        // T row 1 covers (x..x+3, y+1)
        assert!(!fits(&piece_at(PieceKind::T, 3, 9), &grid));
        assert!(fits(&piece_at(PieceKind::T, 5, 9), &grid));
    }

    #[test]
    fn test_shift_into_wall_is_undone() {
        let grid = Grid::default();
        let mut piece = piece_at(PieceKind::T, 0, 10);
        assert!(!try_shift(&mut piece, &grid, Direction::Left));
        assert_eq!((piece.x, piece.y), (0, 10));

        assert!(try_shift(&mut piece, &grid, Direction::Right));
        assert_eq!(piece.x, 1);
    }

    #[test]
    fn test_drop_blocked_by_floor() {
        let grid = Grid::default();
        // O occupies rows y and y+1
        let mut piece = piece_at(PieceKind::O, 4, 1);
        assert!(try_drop(&mut piece, &grid));
        assert_eq!(piece.y, 0);
        assert!(!try_drop(&mut piece, &grid));
        assert_eq!(piece.y, 0);
    }

    #[test]
    fn test_landing_row_on_stack() {
        let mut grid = Grid::default();
        for x in 0..10 {
            grid.set(x, 0, Some(PieceKind::L));
            grid.set(x, 1, Some(PieceKind::L));
        }
        let piece = ActivePiece::spawn(PieceKind::O, 22);
        assert_eq!(landing_row(&piece, &grid), 2);
        assert_eq!(piece.y, 20);
    }

    #[test]
    fn test_rotate_in_open_space_needs_no_kick() {
        let grid = Grid::default();
        let piece = piece_at(PieceKind::T, 4, 10);
        let rotated = try_rotate(&piece, &grid, true).unwrap();
        assert_eq!((rotated.x, rotated.y), (4, 10));
        assert_eq!(rotated.rotation, Rotation::East);
    }

    #[test]
    fn test_vertical_i_against_right_wall_kicks_left() {
        let grid = Grid::default();
        // Vertical I (clockwise from spawn) occupies matrix column 2.
        let vertical = piece_at(PieceKind::I, 7, 10).rotated(true);
        assert!(fits(&vertical, &grid));

        // Rotating back to horizontal at x=7 would cover columns 7..=10.
        let flat = try_rotate(&vertical, &grid, false).unwrap();
        assert_eq!(flat.x, 6);
        assert_eq!(flat.rotation, Rotation::North);
        assert!(fits(&flat, &grid));
    }

    #[test]
    fn test_rotation_rejected_when_boxed_in() {
        let mut grid = Grid::default();
        // A vertical I in a 1-wide well of depth 4 cannot turn.
        for y in 0..6 {
            for x in 0..10 {
                if x != 5 {
                    grid.set(x, y, Some(PieceKind::J));
                }
            }
        }
        let vertical = piece_at(PieceKind::I, 3, 0).rotated(true);
        assert!(fits(&vertical, &grid));
        assert!(try_rotate(&vertical, &grid, true).is_none());
        assert!(try_rotate(&vertical, &grid, false).is_none());
    }

    proptest! {
        #[test]
        fn rotation_kick_moves_at_most_two_cells_per_axis(
            k in 0usize..7,
            x in -1i8..9,
            y in 0i8..18,
            clockwise in any::<bool>(),
            blocks in proptest::collection::vec((0i8..10, 0i8..22), 0..40),
        ) {
            let mut grid = Grid::default();
            for (bx, by) in blocks {
                grid.set(bx, by, Some(PieceKind::O));
            }
            let piece = piece_at(PieceKind::ALL[k], x, y);
            if let Some(resolved) = try_rotate(&piece, &grid, clockwise) {
                prop_assert!((resolved.x - piece.x).abs() <= 2);
                prop_assert!((resolved.y - piece.y).abs() <= 2);
                prop_assert!(resolved.x == piece.x || resolved.y == piece.y);
                prop_assert!(fits(&resolved, &grid));
            }
        }

        #[test]
        fn fits_matches_per_cell_rule(
            k in 0usize..7,
            turns in 0usize..4,
            x in -4i8..12,
            y in -4i8..26,
            blocks in proptest::collection::vec((0i8..10, 0i8..22), 0..80),
        ) {
            let mut grid = Grid::default();
            for (bx, by) in blocks {
                grid.set(bx, by, Some(PieceKind::O));
            }
            let mut piece = piece_at(PieceKind::ALL[k], x, y);
            for _ in 0..turns {
                piece = piece.rotated(true);
            }

            let expected = piece.cells().all(|(cx, cy)| {
                (0..10).contains(&cx) && cy >= 0 && (cy >= 22 || !grid.is_occupied(cx, cy))
            });
            prop_assert_eq!(fits(&piece, &grid), expected);
        }
    }
}
