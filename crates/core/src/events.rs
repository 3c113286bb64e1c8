//! Simulation events.
//!
//! The engine buffers events while a tick runs and hands them out afterwards through
//! [`GameEngine::drain_events`](crate::GameEngine::drain_events). Consumers never get
//! a callback from inside a tick, so they cannot re-enter the engine.

use arrayvec::ArrayVec;

use crate::types::{PieceKind, Rotation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A new active piece entered the grid at its spawn anchor
    PieceSpawned { kind: PieceKind, x: i8, y: i8 },
    /// The active piece moved one cell (sideways or by gravity)
    PieceMoved { x: i8, y: i8 },
    /// The active piece rotated; `x`/`y` include any kick
    PieceRotated { rotation: Rotation, x: i8, y: i8 },
    /// The active piece became part of the grid
    PieceLocked { kind: PieceKind, x: i8, y: i8 },
    /// Rows removed by the last lock, bottom to top
    LinesCleared {
        rows: ArrayVec<u8, 4>,
        lines_remaining: u32,
    },
    /// `held` went into the hold slot
    HoldUsed { held: PieceKind },
    GameOver { won: bool, elapsed_ms: u64 },
}
