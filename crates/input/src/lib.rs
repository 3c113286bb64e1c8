//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events to engine [`Command`](crate::types::Command) edges. The
//! engine runs DAS/ARR itself, so this crate only has to report when movement keys go
//! down and come back up, including on terminals that never send key-release events.

pub mod map;
pub mod tracker;

pub use tui_sprint_types as types;

pub use map::{binding_for, should_quit, HeldKey, KeyBinding};
pub use tracker::KeyTracker;
