//! Error taxonomy for construction and configuration.
//!
//! Rule outcomes (a rejected rotation, a blocked drop, a top-out) are not errors and
//! never appear here; they are reported through return values and events.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidGrid { width: u8, height: u8 },

    #[error("invalid config `{field}`: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
}
