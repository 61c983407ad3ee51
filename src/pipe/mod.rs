/*!
 * Relay Pipe
 * Bounded queues, the connection manager, and the processing loop
 */

pub mod manager;
pub mod queue;
pub mod types;
pub mod worker;

pub use manager::{InputAttachment, PipeConnectionManager};
pub use queue::BoundedQueue;
pub use types::{PipeError, PipeResult, FALLBACK_REPLY};
pub use worker::ProcessingLoop;
