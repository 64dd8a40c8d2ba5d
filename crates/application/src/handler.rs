//! Command processor for workload deltas.

use domain::{TrainerId, TrainerIdentity, TrainerWorkload, TrainingMonth};
use workload_store::WorkloadStore;

use crate::command::RecordTrainingCommand;
use crate::error::AppError;

/// Applies a workload change through a transient aggregate.
///
/// Each command runs the same cycle: load the currently persisted total
/// for the target month, rebuild a throwaway aggregate from it, apply the
/// requested delta, then persist the new total (or delete the entry when
/// it drops to zero). The aggregate never outlives the operation.
pub struct WorkloadCommandHandler<S> {
    store: S,
}

impl<S: WorkloadStore> WorkloadCommandHandler<S> {
    /// Creates a new command handler over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    #[tracing::instrument(
        skip(self, command),
        fields(
            username = %command.trainer_username,
            action = %command.action,
            date = %command.training_date,
            minutes = command.training_duration_minutes,
        )
    )]
    pub async fn handle(&self, command: &RecordTrainingCommand) -> Result<(), AppError> {
        let id = TrainerId::new(&command.trainer_username)?;
        let identity = TrainerIdentity::new(
            command.trainer_first_name.as_str(),
            command.trainer_last_name.as_str(),
            command.is_active,
        )?;
        let month = TrainingMonth::from_date(command.training_date);

        let current = self
            .store
            .load_monthly_minutes(&id, month)
            .await?
            .unwrap_or(0);
        tracing::debug!(current_minutes = current, "loaded current monthly total");

        if command.training_duration_minutes <= 0 {
            // Never apply a non-positive magnitude, but never fail the
            // whole event for it either: keep the stored total as-is.
            tracing::warn!(
                minutes = command.training_duration_minutes,
                "non-positive duration clamped to a no-op"
            );
            if current > 0 {
                self.store.upsert_month(&id, month, &identity, current).await?;
            }
            return Ok(());
        }

        let mut workload = TrainerWorkload::new(id.clone(), identity.clone());
        if current > 0 {
            workload.record(month, current)?;
        }

        match command.action {
            domain::ActionType::Add => {
                workload.record(month, command.training_duration_minutes)?;
            }
            domain::ActionType::Delete => {
                workload.delete(month, command.training_duration_minutes)?;
            }
        }

        let new_total = workload.monthly_minutes(month);
        if new_total <= 0 {
            self.store.delete_month(&id, month).await?;
            tracing::info!(month = %month, "removed monthly workload record");
        } else {
            self.store
                .upsert_month(&id, month, &identity, new_total)
                .await?;
            tracing::info!(month = %month, total_minutes = new_total, "upserted monthly workload record");
        }

        Ok(())
    }
}
