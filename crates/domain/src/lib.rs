//! Domain layer for the trainer workload service.
//!
//! This crate provides the core domain model:
//! - Identity value objects (`TrainerId`, `TrainingMonth`, `ActionType`)
//! - The `TrainerWorkload` aggregate with its per-month minute totals
//! - Domain errors shared by the application and storage layers

pub mod error;
pub mod value_objects;
pub mod workload;

pub use error::DomainError;
pub use value_objects::{ActionType, TrainerId, TrainingMonth};
pub use workload::{TrainerIdentity, TrainerWorkload};
