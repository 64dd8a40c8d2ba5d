//! The inbound training event contract.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::command::RecordTrainingCommand;
use crate::error::AppError;
use domain::{ActionType, DomainError};

/// Transport header names carried alongside each event.
pub mod headers {
    pub const TX_ID: &str = "x-transaction-id";
    pub const SCHEMA_VERSION: &str = "x-schema-version";
}

/// A training recorded or cancelled elsewhere, delivered at-least-once.
///
/// `event_id` identifies the delivery for dedup; `transaction_id` ties
/// the event back to the business operation that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingEvent {
    pub event_id: Uuid,
    pub transaction_id: String,
    pub occurred_at: DateTime<Utc>,
    pub trainer_username: String,
    pub trainer_first_name: String,
    pub trainer_last_name: String,
    pub is_active: bool,
    pub action_type: String,
    pub training_date: NaiveDate,
    pub training_duration_minutes: i64,
    pub schema_version: i32,
}

impl TrainingEvent {
    /// Validates the envelope and converts the payload into a command.
    ///
    /// The action string is parsed here so that an unknown action fails
    /// before any store access, as a non-retryable error.
    pub fn to_command(&self) -> Result<RecordTrainingCommand, AppError> {
        if self.transaction_id.trim().is_empty() {
            return Err(AppError::Validation(DomainError::BlankField {
                name: "transactionId",
            }));
        }
        let action: ActionType = self.action_type.parse()?;
        Ok(RecordTrainingCommand::new(
            self.trainer_username.as_str(),
            self.trainer_first_name.as_str(),
            self.trainer_last_name.as_str(),
            self.is_active,
            self.training_date,
            self.training_duration_minutes,
            action,
        ))
    }
}
