//! Application layer for the trainer workload service.
//!
//! This crate provides:
//! - `RecordTrainingCommand` and the command processor applying deltas
//! - `WorkloadQueryHandler` projecting sorted monthly summaries
//! - `ProcessedEventStore` collapsing duplicate event deliveries
//! - The inbound `TrainingEvent` contract and the at-least-once consumer
//!   with bounded retry and dead-letter routing

pub mod command;
pub mod consumer;
pub mod dead_letter;
pub mod dedup;
pub mod error;
pub mod event;
pub mod handler;
pub mod query;

pub use command::RecordTrainingCommand;
pub use consumer::{ConsumeOutcome, RetryPolicy, TrainingEventConsumer};
pub use dead_letter::{DeadLetter, DeadLetterReason, DeadLetterSink, InMemoryDeadLetterSink};
pub use dedup::ProcessedEventStore;
pub use error::AppError;
pub use event::TrainingEvent;
pub use handler::WorkloadCommandHandler;
pub use query::{MonthlySummary, TrainerWorkloadSummary, WorkloadQueryHandler};
