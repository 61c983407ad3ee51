/*!
 * Resource Limits
 * Centralized queue limits
 */

/// Default capacity for both relay queues. Deliberately small: the
/// backpressure contract depends on the queues staying bounded.
pub const DEFAULT_QUEUE_CAPACITY: usize = 20;

/// Upper bound a configured capacity is clamped to.
pub const MAX_QUEUE_CAPACITY: usize = 10_000;
