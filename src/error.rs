//! Error types shared across the crate

use thiserror::Error;

/// Errors raised by a tick source when its contract is violated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TickSourceError {
    /// A suspended source has to be resumed before it can be cancelled
    #[error("tick source {0} is suspended and cannot be cancelled")]
    Suspended(u64),
    #[error("tick source {0} has already been cancelled")]
    Cancelled(u64),
}

/// Errors raised when talking to the countdown event loop
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("countdown event loop is not running")]
    Closed,
    #[error("countdown event loop dropped the reply")]
    NoReply,
}
