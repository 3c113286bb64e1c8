use crate::pieces::ActivePiece;
use crate::types::{Cell, PieceKind, Phase, Rotation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl From<ActivePiece> for ActiveSnapshot {
    fn from(value: ActivePiece) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HoldSnapshot {
    pub piece: Option<PieceKind>,
    /// False once hold was used in the current drop cycle
    pub available: bool,
}

/// Owned copy of everything a presentation layer reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub width: u8,
    pub height: u8,
    /// Row-major, row 0 at the bottom
    pub board: Vec<Cell>,
    pub active: Option<ActiveSnapshot>,
    /// Grid cells of the active piece
    pub active_cells: Vec<(i8, i8)>,
    pub ghost_row: Option<i8>,
    pub hold: HoldSnapshot,
    pub next: Option<PieceKind>,
    pub lines_remaining: u32,
    pub elapsed_ms: u64,
    pub phase: Phase,
    pub won: bool,
}

impl GameSnapshot {
    pub fn cell(&self, x: i8, y: i8) -> Cell {
        if x < 0 || y < 0 || x >= self.width as i8 || y >= self.height as i8 {
            return None;
        }
        self.board[y as usize * self.width as usize + x as usize]
    }

    pub fn playable(&self) -> bool {
        self.phase == Phase::Falling
    }
}

/// Format a sprint time as `mm:ss.ff`, or `hh:mm:ss.ff` from one hour on.
pub fn format_elapsed(elapsed_ms: u64) -> String {
    let hundredths = (elapsed_ms / 10) % 100;
    let total_secs = elapsed_ms / 1000;
    let secs = total_secs % 60;
    let mins = (total_secs / 60) % 60;
    let hours = total_secs / 3600;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}.{:02}", hours, mins, secs, hundredths)
    } else {
        format!("{:02}:{:02}.{:02}", mins, secs, hundredths)
    }
}
