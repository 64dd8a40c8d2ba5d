//! Duplicate-delivery detection for consumed events.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

/// Records which event ids have already been accepted for processing.
///
/// Ids are marked before the command runs, so a redelivery racing the
/// first delivery is dropped rather than applied twice. Membership lives
/// in process memory only; a restart forgets it, so the broker's own
/// delivery guarantees still matter. A TTL-bounded durable store is the
/// intended replacement once event volume warrants it.
#[derive(Debug, Clone, Default)]
pub struct ProcessedEventStore {
    processed: Arc<Mutex<HashSet<Uuid>>>,
}

impl ProcessedEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically checks whether `event_id` was already marked and marks
    /// it if not. Returns `true` when the id is a duplicate.
    pub async fn check_and_mark(&self, event_id: Uuid) -> bool {
        !self.processed.lock().await.insert(event_id)
    }

    /// Number of distinct event ids marked so far.
    pub async fn len(&self) -> usize {
        self.processed.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.processed.lock().await.is_empty()
    }
}
