//! Core types module - shared data structures and constants
//!
//! This module defines the vocabulary shared by the simulation, the input layer and any
//! presentation layer. All types are plain data with no external dependencies.
//!
//! # Grid Dimensions
//!
//! Sprint playfield dimensions:
//!
//! - **Width**: 10 columns (indexed 0-9, left to right)
//! - **Height**: 22 rows (indexed 0-21, bottom to top)
//! - **Visible**: the bottom 20 rows; rows 20-21 are the spawn buffer
//!
//! # Timing
//!
//! Gravity intervals are in milliseconds, DAS/ARR are counted in ticks:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Reference fixed timestep (~60 FPS) |
//! | `DROP_TIME_MS` | 1000 | Normal fall interval |
//! | `SPEED_DROP_TIME_MS` | 100 | Fall interval while soft drop is held |
//! | `DEFAULT_DAS_TICKS` | 12 | Ticks a direction is held before auto-repeat |
//! | `DEFAULT_ARR_TICKS` | 4 | Ticks between auto-repeat moves |
//!
//! DAS/ARR are tick counts, so callers must drive the engine at a fixed cadence.
//!
//! # Examples
//!
//! ```
//! use tui_sprint_types::{Command, PieceKind, Rotation, GRID_HEIGHT, GRID_WIDTH};
//!
//! let piece = PieceKind::from_str("t").unwrap();
//! assert_eq!(piece, PieceKind::T);
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(Rotation::West.index(), 3);
//!
//! assert_eq!(Command::from_str("hardDrop"), Some(Command::HardDrop));
//!
//! assert_eq!(GRID_WIDTH, 10);
//! assert_eq!(GRID_HEIGHT, 22);
//! ```

/// Grid width in cells (10 columns)
pub const GRID_WIDTH: u8 = 10;

/// Grid height in cells, including the 2-row spawn buffer (22 rows)
pub const GRID_HEIGHT: u8 = 22;

/// Rows shown to the player (the bottom 20)
pub const VISIBLE_HEIGHT: u8 = 20;

/// Lines to clear in a default sprint
pub const SPRINT_LINES: u32 = 40;

/// Reference fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Normal fall interval (1 row per second)
pub const DROP_TIME_MS: u32 = 1000;

/// Fall interval while soft drop is held
pub const SPEED_DROP_TIME_MS: u32 = 100;

/// Delayed auto shift, in ticks.
pub const DEFAULT_DAS_TICKS: u32 = 12;

/// Auto repeat rate, in ticks.
pub const DEFAULT_ARR_TICKS: u32 = 4;


/// The seven piece kinds
///
/// - **I**: 4-long bar, 4x4 matrix
/// - **J**, **L**: mirrored hooks, 3x3 matrix
/// - **O**: 2x2 square, rotation has no visible effect
/// - **S**, **Z**: mirrored skews, 3x3 matrix
/// - **T**: T-shaped, 3x3 matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    /// All kinds, in declaration order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_sprint_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "o" => Some(PieceKind::O),
            "s" => Some(PieceKind::S),
            "t" => Some(PieceKind::T),
            "z" => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::O => "o",
            PieceKind::S => "s",
            PieceKind::T => "t",
            PieceKind::Z => "z",
        }
    }

    /// Stable index in `0..7`, matching [`PieceKind::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Rotation states, in clockwise order
///
/// - **North**: spawn orientation (state 0)
/// - **East**: rotated 90° clockwise (state 1)
/// - **South**: rotated 180° (state 2)
/// - **West**: rotated 90° counter-clockwise (state 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_sprint_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_sprint_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_ccw(), Rotation::West);
    /// assert_eq!(Rotation::East.rotate_ccw(), Rotation::North);
    /// ```
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Rotation state index (0-3).
    pub fn index(&self) -> u8 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Inverse of [`Rotation::index`]; wraps modulo 4.
    pub fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::North => "north",
            Rotation::East => "east",
            Rotation::South => "south",
            Rotation::West => "west",
        }
    }
}

/// Axis-aligned unit direction. `Up` is towards higher row indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Kick search order for rotations.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Unit (dx, dy) step.
    pub fn delta(&self) -> (i8, i8) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

/// Input edges consumed by the engine.
///
/// Movement keys are reported as separate down/up edges so the engine can run DAS/ARR
/// itself; the caller never has to poll held keys per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Left key pressed
    MoveLeftDown,
    /// Left key released
    MoveLeftUp,
    /// Right key pressed
    MoveRightDown,
    /// Right key released
    MoveRightUp,
    /// Rotate 90° counter-clockwise
    RotateLeft,
    /// Rotate 90° clockwise
    RotateRight,
    /// Soft drop key state (held / released)
    SoftDrop(bool),
    /// Drop to the ghost row and lock immediately
    HardDrop,
    /// Park or swap the active piece (once per drop cycle)
    Hold,
    /// Freeze timers
    Pause,
    /// Unfreeze timers
    Resume,
}

impl Command {
    /// Parse command from its camelCase name (case-insensitive).
    ///
    /// `softDrop` parses as a press, `softDropRelease` as a release.
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_sprint_types::Command;
    ///
    /// assert_eq!(Command::from_str("moveLeftDown"), Some(Command::MoveLeftDown));
    /// assert_eq!(Command::from_str("softdrop"), Some(Command::SoftDrop(true)));
    /// assert_eq!(Command::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleftdown" => Some(Command::MoveLeftDown),
            "moveleftup" => Some(Command::MoveLeftUp),
            "moverightdown" => Some(Command::MoveRightDown),
            "moverightup" => Some(Command::MoveRightUp),
            "rotateleft" => Some(Command::RotateLeft),
            "rotateright" => Some(Command::RotateRight),
            "softdrop" => Some(Command::SoftDrop(true)),
            "softdroprelease" => Some(Command::SoftDrop(false)),
            "harddrop" => Some(Command::HardDrop),
            "hold" => Some(Command::Hold),
            "pause" => Some(Command::Pause),
            "resume" => Some(Command::Resume),
            _ => None,
        }
    }

    /// Convert to camelCase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::MoveLeftDown => "moveLeftDown",
            Command::MoveLeftUp => "moveLeftUp",
            Command::MoveRightDown => "moveRightDown",
            Command::MoveRightUp => "moveRightUp",
            Command::RotateLeft => "rotateLeft",
            Command::RotateRight => "rotateRight",
            Command::SoftDrop(true) => "softDrop",
            Command::SoftDrop(false) => "softDropRelease",
            Command::HardDrop => "hardDrop",
            Command::Hold => "hold",
            Command::Pause => "pause",
            Command::Resume => "resume",
        }
    }
}

/// Engine lifecycle phase
///
/// `Ready` → `Spawning` → `Falling` → {`Falling`, `Paused`, `GameOver`};
/// `Paused` → `Falling`. `GameOver` is terminal until restart.
///
/// `Spawning` only exists inside the engine while a piece is being placed; every public
/// call returns with the engine in one of the other four phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Initialized, waiting for start
    Ready,
    /// Placing a new piece; never visible between engine calls
    Spawning,
    /// A piece is under control
    Falling,
    /// Timers frozen
    Paused,
    /// Sprint finished or topped out
    GameOver,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Ready => "ready",
            Phase::Spawning => "spawning",
            Phase::Falling => "falling",
            Phase::Paused => "paused",
            Phase::GameOver => "gameOver",
        }
    }
}

/// A cell on the grid
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell occupied by a block of the given kind
pub type Cell = Option<PieceKind>;
