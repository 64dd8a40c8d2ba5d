//! Command type for recording or cancelling a training.

use chrono::NaiveDate;
use domain::ActionType;

/// A single workload change for one trainer.
///
/// Carries the latest trainer identity alongside the delta; the persisted
/// identity fields always follow the most recent command (last-write-wins),
/// for ADD and DELETE alike.
#[derive(Debug, Clone)]
pub struct RecordTrainingCommand {
    pub trainer_username: String,
    pub trainer_first_name: String,
    pub trainer_last_name: String,
    pub is_active: bool,
    pub training_date: NaiveDate,
    pub training_duration_minutes: i64,
    pub action: ActionType,
}

impl RecordTrainingCommand {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        trainer_username: impl Into<String>,
        trainer_first_name: impl Into<String>,
        trainer_last_name: impl Into<String>,
        is_active: bool,
        training_date: NaiveDate,
        training_duration_minutes: i64,
        action: ActionType,
    ) -> Self {
        Self {
            trainer_username: trainer_username.into(),
            trainer_first_name: trainer_first_name.into(),
            trainer_last_name: trainer_last_name.into(),
            is_active,
            training_date,
            training_duration_minutes,
            action,
        }
    }
}
