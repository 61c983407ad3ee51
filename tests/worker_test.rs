/*!
 * Processing Loop Tests
 * Ordering, fallback substitution, reconnects, and terminal shutdown
 */

use completion_relay::completion::{CompletionClient, CompletionError, CompletionResult};
use completion_relay::pipe::{PipeConnectionManager, ProcessingLoop, FALLBACK_REPLY};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

struct EchoClient;

#[tonic::async_trait]
impl CompletionClient for EchoClient {
    async fn complete(&self, prompt: &str) -> CompletionResult<String> {
        Ok(format!("reply to {}", prompt))
    }
}

/// Fails for any prompt containing "bad".
struct FlakyClient;

#[tonic::async_trait]
impl CompletionClient for FlakyClient {
    async fn complete(&self, prompt: &str) -> CompletionResult<String> {
        if prompt.contains("bad") {
            Err(CompletionError::EmptyChoices)
        } else {
            Ok(format!("ok: {}", prompt))
        }
    }
}

#[tokio::test]
async fn replies_preserve_submission_order() {
    let manager = Arc::new(PipeConnectionManager::new(20));
    tokio::spawn(ProcessingLoop::new(Arc::clone(&manager), Arc::new(EchoClient)).run());

    let attachment = manager.attach().await;
    for i in 1..=5 {
        attachment.submit(format!("prompt {}", i)).unwrap();
    }

    let output = manager.output();
    for i in 1..=5 {
        assert_eq!(output.pop().await, Some(format!("reply to prompt {}", i)));
    }
}

#[tokio::test]
async fn failed_completion_substitutes_fallback_in_position() {
    let manager = Arc::new(PipeConnectionManager::new(20));
    tokio::spawn(ProcessingLoop::new(Arc::clone(&manager), Arc::new(FlakyClient)).run());

    let attachment = manager.attach().await;
    attachment.submit("good one".to_string()).unwrap();
    attachment.submit("bad one".to_string()).unwrap();
    attachment.submit("good two".to_string()).unwrap();

    let output = manager.output();
    assert_eq!(output.pop().await, Some("ok: good one".to_string()));
    assert_eq!(output.pop().await, Some(FALLBACK_REPLY.to_string()));
    assert_eq!(output.pop().await, Some("ok: good two".to_string()));
}

#[tokio::test]
async fn worker_survives_reconnect_and_drains_fresh_queue() {
    let manager = Arc::new(PipeConnectionManager::new(20));
    tokio::spawn(ProcessingLoop::new(Arc::clone(&manager), Arc::new(EchoClient)).run());
    let output = manager.output();

    let first = manager.attach().await;
    first.submit("before".to_string()).unwrap();
    assert_eq!(output.pop().await, Some("reply to before".to_string()));
    drop(first);

    let second = manager.attach().await;
    second.submit("after".to_string()).unwrap();
    assert_eq!(output.pop().await, Some("reply to after".to_string()));
}

#[tokio::test]
async fn closing_output_queue_stops_worker() {
    let manager = Arc::new(PipeConnectionManager::new(20));
    let worker = tokio::spawn(ProcessingLoop::new(Arc::clone(&manager), Arc::new(EchoClient)).run());

    // Prove the worker is live before shutting down
    let attachment = manager.attach().await;
    attachment.submit("warm up".to_string()).unwrap();
    assert_eq!(
        manager.output().pop().await,
        Some("reply to warm up".to_string())
    );

    manager.shutdown();
    tokio::time::timeout(Duration::from_secs(1), worker)
        .await
        .unwrap()
        .unwrap();
}
