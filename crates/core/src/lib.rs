//! Core sprint logic - pure, deterministic, and testable
//!
//! Everything needed to simulate a 40-line sprint without a terminal, a clock or any
//! I/O. The caller owns time: it feeds input edges and advances the engine in fixed
//! ticks, then reads state back through queries, snapshots and drained events.
//!
//! # Module Structure
//!
//! - [`rng`]: 7-bag piece generation over a seeded LCG
//! - [`pieces`]: piece matrices, matrix rotation and the active piece
//! - [`grid`]: the placed-block playfield with row clearing
//! - [`kick`]: fit checks and one-axis kick resolution
//! - [`engine`]: the [`GameEngine`] state machine (hold, DAS/ARR, gravity, locking)
//! - [`config`] / [`error`]: start-time parameters and their validation
//! - [`events`] / [`snapshot`]: what the engine reports back
//!
//! # Rules
//!
//! - **7-Bag Randomizer**: every window of seven pieces after a refill holds each kind once
//! - **Matrix Rotation**: no kick tables; a blocked rotation is nudged up to two cells
//!   left, right, up or down, in that order
//! - **No Lock Delay**: a piece locks on the first gravity step it cannot take
//! - **Hold**: once per drop cycle, reset by the next lock
//! - **Sprint**: the run ends when the line target is met (win) or a spawn is blocked
//!
//! # Example
//!
//! ```
//! use tui_sprint_core::{GameConfig, GameEngine};
//! use tui_sprint_core::types::{Command, Phase};
//!
//! let mut engine = GameEngine::new(GameConfig::default().with_seed(12345)).unwrap();
//! engine.start();
//!
//! engine.apply(Command::RotateRight);
//! engine.apply(Command::HardDrop);
//! assert!(engine.tick(16));
//!
//! assert_eq!(engine.phase(), Phase::Falling);
//! assert_eq!(engine.grid().cells().iter().filter(|c| c.is_some()).count(), 4);
//! ```
//!
//! # Timing
//!
//! Gravity intervals are milliseconds; DAS and ARR are counted in ticks. The sprint
//! clock only advances while a piece is in play.

pub use tui_sprint_types as types;

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod grid;
pub mod kick;
pub mod pieces;
pub mod rng;
pub mod snapshot;

pub use config::GameConfig;
pub use engine::GameEngine;
pub use error::EngineError;
pub use events::GameEvent;
pub use grid::Grid;
pub use pieces::{shape, ActivePiece, Matrix, PieceShape};
pub use rng::{RandomBag, SimpleRng};
pub use snapshot::{format_elapsed, ActiveSnapshot, GameSnapshot, HoldSnapshot};
