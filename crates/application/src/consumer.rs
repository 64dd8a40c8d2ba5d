//! At-least-once event consumer with bounded retry.

use std::time::Duration;

use workload_store::WorkloadStore;

use crate::dead_letter::{DeadLetter, DeadLetterReason, DeadLetterSink};
use crate::dedup::ProcessedEventStore;
use crate::error::AppError;
use crate::event::TrainingEvent;
use crate::handler::WorkloadCommandHandler;

/// Fixed-backoff retry budget for transient store failures.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_secs(1),
        }
    }
}

/// What happened to a delivered event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// The command ran and the store was updated.
    Processed,
    /// The event id was seen before; the delivery was dropped.
    Duplicate,
    /// The event was routed to the dead-letter sink.
    DeadLettered,
}

/// Drives each delivered event through dedup, command processing, retry,
/// and dead-letter routing.
///
/// An event id is marked as processed before its command runs; a crash
/// between marking and persisting loses that event, which at-least-once
/// redelivery cannot recover. The mark is kept first anyway so concurrent
/// redeliveries of the same id cannot both apply the delta.
pub struct TrainingEventConsumer<S, D> {
    handler: WorkloadCommandHandler<S>,
    processed: ProcessedEventStore,
    dead_letters: D,
    retry: RetryPolicy,
}

impl<S, D> TrainingEventConsumer<S, D>
where
    S: WorkloadStore,
    D: DeadLetterSink,
{
    pub fn new(handler: WorkloadCommandHandler<S>, dead_letters: D) -> Self {
        Self {
            handler,
            processed: ProcessedEventStore::new(),
            dead_letters,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[tracing::instrument(
        skip(self, event),
        fields(event_id = %event.event_id, transaction_id = %event.transaction_id)
    )]
    pub async fn consume(&self, event: TrainingEvent) -> Result<ConsumeOutcome, AppError> {
        if self.processed.check_and_mark(event.event_id).await {
            tracing::info!("duplicate event delivery dropped");
            metrics::counter!("workload_events_duplicate").increment(1);
            return Ok(ConsumeOutcome::Duplicate);
        }

        let command = match event.to_command() {
            Ok(command) => command,
            Err(err) => {
                return self
                    .dead_letter(event, DeadLetterReason::NonRetryable(err.to_string()))
                    .await;
            }
        };

        let mut attempt = 1;
        loop {
            match self.handler.handle(&command).await {
                Ok(()) => {
                    metrics::counter!("workload_events_processed").increment(1);
                    return Ok(ConsumeOutcome::Processed);
                }
                Err(err) if !err.is_retryable() => {
                    return self
                        .dead_letter(event, DeadLetterReason::NonRetryable(err.to_string()))
                        .await;
                }
                Err(err) if attempt >= self.retry.max_attempts => {
                    return self
                        .dead_letter(
                            event,
                            DeadLetterReason::RetriesExhausted {
                                attempts: attempt,
                                last_error: err.to_string(),
                            },
                        )
                        .await;
                }
                Err(err) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.retry.max_attempts,
                        error = %err,
                        "transient failure, retrying after backoff"
                    );
                    tokio::time::sleep(self.retry.backoff).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn dead_letter(
        &self,
        event: TrainingEvent,
        reason: DeadLetterReason,
    ) -> Result<ConsumeOutcome, AppError> {
        metrics::counter!("workload_events_dead_lettered").increment(1);
        self.dead_letters
            .publish(DeadLetter { event, reason })
            .await?;
        Ok(ConsumeOutcome::DeadLettered)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{NaiveDate, Utc};
    use domain::{TrainerId, TrainerIdentity, TrainerWorkload, TrainingMonth};
    use uuid::Uuid;
    use workload_store::{
        InMemoryWorkloadStore, LoadWorkload, Result as StoreResult, SaveWorkload, StoreError,
    };

    use crate::dead_letter::InMemoryDeadLetterSink;

    use super::*;

    /// Store double that fails the first `failures` save calls with a
    /// transient error, then delegates to an in-memory store.
    #[derive(Clone)]
    struct FlakyStore {
        inner: InMemoryWorkloadStore,
        remaining_failures: Arc<AtomicU32>,
    }

    impl FlakyStore {
        fn new(failures: u32) -> Self {
            Self {
                inner: InMemoryWorkloadStore::new(),
                remaining_failures: Arc::new(AtomicU32::new(failures)),
            }
        }

        fn trip(&self) -> StoreResult<()> {
            if self
                .remaining_failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl LoadWorkload for FlakyStore {
        async fn load_by_username(
            &self,
            id: &TrainerId,
        ) -> StoreResult<Option<TrainerWorkload>> {
            self.inner.load_by_username(id).await
        }

        async fn load_monthly_minutes(
            &self,
            id: &TrainerId,
            month: TrainingMonth,
        ) -> StoreResult<Option<i64>> {
            self.inner.load_monthly_minutes(id, month).await
        }
    }

    #[async_trait]
    impl SaveWorkload for FlakyStore {
        async fn upsert_month(
            &self,
            id: &TrainerId,
            month: TrainingMonth,
            identity: &TrainerIdentity,
            total_minutes: i64,
        ) -> StoreResult<()> {
            self.trip()?;
            self.inner.upsert_month(id, month, identity, total_minutes).await
        }

        async fn delete_month(&self, id: &TrainerId, month: TrainingMonth) -> StoreResult<()> {
            self.trip()?;
            self.inner.delete_month(id, month).await
        }
    }

    fn event(action: &str, minutes: i64) -> TrainingEvent {
        TrainingEvent {
            event_id: Uuid::new_v4(),
            transaction_id: "tx-1001".to_string(),
            occurred_at: Utc::now(),
            trainer_username: "alex".to_string(),
            trainer_first_name: "Alex".to_string(),
            trainer_last_name: "Smith".to_string(),
            is_active: true,
            action_type: action.to_string(),
            training_date: NaiveDate::from_ymd_opt(2025, 7, 15).unwrap(),
            training_duration_minutes: minutes,
            schema_version: 1,
        }
    }

    fn fast_retry() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            backoff: Duration::ZERO,
        }
    }

    fn consumer<S: WorkloadStore>(
        store: S,
    ) -> TrainingEventConsumer<S, InMemoryDeadLetterSink> {
        TrainingEventConsumer::new(
            WorkloadCommandHandler::new(store),
            InMemoryDeadLetterSink::new(),
        )
        .with_retry_policy(fast_retry())
    }

    async fn minutes(store: &impl LoadWorkload) -> Option<i64> {
        store
            .load_monthly_minutes(
                &TrainerId::new("alex").unwrap(),
                TrainingMonth::new(2025, 7).unwrap(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn processes_a_fresh_event() {
        let store = InMemoryWorkloadStore::new();
        let consumer = consumer(store.clone());

        let outcome = consumer.consume(event("ADD", 45)).await.unwrap();

        assert_eq!(outcome, ConsumeOutcome::Processed);
        assert_eq!(minutes(&store).await, Some(45));
    }

    #[tokio::test]
    async fn redelivery_of_same_event_id_is_dropped() {
        let store = InMemoryWorkloadStore::new();
        let consumer = consumer(store.clone());
        let delivery = event("ADD", 45);

        consumer.consume(delivery.clone()).await.unwrap();
        let outcome = consumer.consume(delivery).await.unwrap();

        assert_eq!(outcome, ConsumeOutcome::Duplicate);
        assert_eq!(minutes(&store).await, Some(45));
    }

    #[tokio::test]
    async fn unknown_action_goes_straight_to_dead_letters() {
        let store = InMemoryWorkloadStore::new();
        let consumer = consumer(store.clone());

        let outcome = consumer.consume(event("UPSERT", 45)).await.unwrap();

        assert_eq!(outcome, ConsumeOutcome::DeadLettered);
        assert_eq!(consumer.dead_letters.len().await, 1);
        let parked = &consumer.dead_letters.letters().await[0];
        assert!(matches!(parked.reason, DeadLetterReason::NonRetryable(_)));
        assert_eq!(minutes(&store).await, None);
    }

    #[tokio::test]
    async fn transient_failures_are_retried_until_success() {
        // Two failures fit inside a three-attempt budget.
        let store = FlakyStore::new(2);
        let consumer = consumer(store.clone());

        let outcome = consumer.consume(event("ADD", 45)).await.unwrap();

        assert_eq!(outcome, ConsumeOutcome::Processed);
        assert_eq!(minutes(&store).await, Some(45));
        assert!(consumer.dead_letters.is_empty().await);
    }

    #[tokio::test]
    async fn exhausted_retries_dead_letter_the_event() {
        let store = FlakyStore::new(5);
        let consumer = consumer(store.clone());

        let outcome = consumer.consume(event("ADD", 45)).await.unwrap();

        assert_eq!(outcome, ConsumeOutcome::DeadLettered);
        let parked = &consumer.dead_letters.letters().await[0];
        assert!(matches!(
            parked.reason,
            DeadLetterReason::RetriesExhausted { attempts: 3, .. }
        ));
        assert_eq!(minutes(&store).await, None);
    }

    #[tokio::test]
    async fn validation_failure_is_not_retried() {
        let store = FlakyStore::new(0);
        let consumer = consumer(store.clone());

        let mut bad = event("ADD", 45);
        bad.trainer_first_name = "  ".to_string();
        let outcome = consumer.consume(bad).await.unwrap();

        assert_eq!(outcome, ConsumeOutcome::DeadLettered);
        assert_eq!(consumer.dead_letters.len().await, 1);
    }
}
