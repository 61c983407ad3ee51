/*!
 * Completion Service
 * Outbound adapter for the external text-completion provider
 */

pub mod client;
pub mod types;

pub use client::{CompletionClient, HttpCompletionClient};
pub use types::{CompletionError, CompletionResult};
