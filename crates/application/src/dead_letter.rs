//! Dead-letter routing for events that cannot be processed.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::event::TrainingEvent;

/// Why an event was routed to the dead-letter sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeadLetterReason {
    /// The event can never succeed: bad payload or unknown action.
    NonRetryable(String),
    /// Transient failures persisted through every allowed attempt.
    RetriesExhausted { attempts: u32, last_error: String },
}

impl std::fmt::Display for DeadLetterReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeadLetterReason::NonRetryable(cause) => write!(f, "non-retryable: {cause}"),
            DeadLetterReason::RetriesExhausted {
                attempts,
                last_error,
            } => write!(f, "retries exhausted after {attempts} attempts: {last_error}"),
        }
    }
}

/// A failed event together with the reason it was parked.
#[derive(Debug, Clone)]
pub struct DeadLetter {
    pub event: TrainingEvent,
    pub reason: DeadLetterReason,
}

/// Destination for events the consumer gives up on.
#[async_trait]
pub trait DeadLetterSink: Send + Sync {
    async fn publish(&self, dead_letter: DeadLetter) -> Result<(), AppError>;
}

/// In-memory sink; the default for tests and single-process deployments.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDeadLetterSink {
    letters: Arc<RwLock<Vec<DeadLetter>>>,
}

impl InMemoryDeadLetterSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.letters.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.letters.read().await.is_empty()
    }

    /// Snapshot of everything parked so far, in arrival order.
    pub async fn letters(&self) -> Vec<DeadLetter> {
        self.letters.read().await.clone()
    }
}

#[async_trait]
impl DeadLetterSink for InMemoryDeadLetterSink {
    async fn publish(&self, dead_letter: DeadLetter) -> Result<(), AppError> {
        tracing::error!(
            event_id = %dead_letter.event.event_id,
            transaction_id = %dead_letter.event.transaction_id,
            reason = %dead_letter.reason,
            "event routed to dead letter sink"
        );
        self.letters.write().await.push(dead_letter);
        Ok(())
    }
}
