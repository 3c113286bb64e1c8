//! TUI Sprint (workspace facade crate).
//!
//! Re-exports the member crates under one name: `tui_sprint::{types, core, input}`. The
//! simulation lives in `core`; `input` turns terminal key events into engine commands.

pub use tui_sprint_core as core;
pub use tui_sprint_input as input;
pub use tui_sprint_types as types;
