//! Core error types for pulsar-core.
//!
//! The stores themselves never fail; these errors come from the helpers that
//! parse enum values and validate log status transitions.

use thiserror::Error;

use crate::model::LogStatus;

/// Errors produced by the pulsar-core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A log status change that the tailing state machine does not allow.
    #[error("invalid log status transition: {from} -> {to}")]
    InvalidLogTransition { from: LogStatus, to: LogStatus },

    /// A string did not name any variant of the expected enum.
    #[error("unknown {kind}: '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}
