/*!
 * Pipe Types
 * Common types, constants, and errors for the relay pipe
 */

use thiserror::Error;

// Queue limits - centralized in core::limits
pub use crate::core::limits::{DEFAULT_QUEUE_CAPACITY, MAX_QUEUE_CAPACITY};

/// Substitute reply pushed to the output queue when the completion call
/// fails. User-visible content, not a process error.
pub const FALLBACK_REPLY: &str = "your request can't be processed. Try again later";

/// Pipe operation result
pub type PipeResult<T> = Result<T, PipeError>;

/// Pipe error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipeError {
    /// Queue at capacity. The payload is dropped; the submitter is
    /// expected to notify its client, not retry.
    #[error("queue full: {length}/{capacity}")]
    QueueFull { length: usize, capacity: usize },

    /// Enqueue onto a queue that has been closed.
    #[error("queue closed")]
    Closed,
}
