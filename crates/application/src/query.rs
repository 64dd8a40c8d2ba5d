//! Read-side queries over persisted workloads.

use domain::{TrainerId, TrainingMonth};
use serde::Serialize;
use workload_store::LoadWorkload;

use crate::error::AppError;

/// One month's total minutes for a trainer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub total_minutes: i64,
}

/// A trainer's full workload: identity plus every month with a positive
/// total, in ascending calendar order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerWorkloadSummary {
    pub trainer_username: String,
    pub trainer_first_name: String,
    pub trainer_last_name: String,
    pub active: bool,
    pub months: Vec<MonthlySummary>,
}

/// Serves workload summaries from the backing store.
pub struct WorkloadQueryHandler<S> {
    store: S,
}

impl<S: LoadWorkload> WorkloadQueryHandler<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the full summary for a trainer, or `NotFound` when no
    /// workload has ever been recorded for the username.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_username(&self, username: &str) -> Result<TrainerWorkloadSummary, AppError> {
        let id = TrainerId::new(username)?;
        let workload = self
            .store
            .load_by_username(&id)
            .await?
            .ok_or_else(|| AppError::NotFound(id.as_str().to_string()))?;

        let months = workload
            .months()
            .map(|(month, total_minutes)| MonthlySummary {
                year: month.year(),
                month: month.month(),
                total_minutes,
            })
            .collect();

        let identity = workload.identity();
        Ok(TrainerWorkloadSummary {
            trainer_username: workload.id().as_str().to_string(),
            trainer_first_name: identity.first_name.clone(),
            trainer_last_name: identity.last_name.clone(),
            active: identity.active,
            months,
        })
    }

    /// Returns the total minutes a trainer worked in one month.
    ///
    /// Unknown trainers and months with no record both answer 0; absence
    /// of workload is not an error for this query.
    #[tracing::instrument(skip(self))]
    pub async fn get_monthly_minutes(
        &self,
        username: &str,
        year: i32,
        month: u32,
    ) -> Result<i64, AppError> {
        let id = TrainerId::new(username)?;
        let month = TrainingMonth::new(year, month)?;
        let minutes = self
            .store
            .load_monthly_minutes(&id, month)
            .await?
            .unwrap_or(0);
        Ok(minutes)
    }
}

#[cfg(test)]
mod tests {
    use domain::TrainerIdentity;
    use workload_store::{InMemoryWorkloadStore, SaveWorkload};

    use super::*;

    fn identity() -> TrainerIdentity {
        TrainerIdentity::new("Alex", "Smith", true).unwrap()
    }

    async fn seeded_store() -> InMemoryWorkloadStore {
        let store = InMemoryWorkloadStore::new();
        let id = TrainerId::new("alex").unwrap();
        store
            .upsert_month(&id, TrainingMonth::new(2025, 7).unwrap(), &identity(), 120)
            .await
            .unwrap();
        store
            .upsert_month(&id, TrainingMonth::new(2024, 12).unwrap(), &identity(), 45)
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn summary_lists_months_in_ascending_order() {
        let handler = WorkloadQueryHandler::new(seeded_store().await);
        let summary = handler.get_by_username("alex").await.unwrap();

        assert_eq!(summary.trainer_username, "alex");
        assert_eq!(summary.trainer_first_name, "Alex");
        assert_eq!(
            summary.months,
            vec![
                MonthlySummary {
                    year: 2024,
                    month: 12,
                    total_minutes: 45,
                },
                MonthlySummary {
                    year: 2025,
                    month: 7,
                    total_minutes: 120,
                },
            ]
        );
    }

    #[tokio::test]
    async fn unknown_trainer_is_not_found() {
        let handler = WorkloadQueryHandler::new(InMemoryWorkloadStore::new());
        let err = handler.get_by_username("ghost").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(username) if username == "ghost"));
    }

    #[tokio::test]
    async fn monthly_minutes_defaults_to_zero() {
        let handler = WorkloadQueryHandler::new(seeded_store().await);

        assert_eq!(handler.get_monthly_minutes("alex", 2025, 7).await.unwrap(), 120);
        assert_eq!(handler.get_monthly_minutes("alex", 2025, 8).await.unwrap(), 0);
        assert_eq!(handler.get_monthly_minutes("ghost", 2025, 7).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn invalid_month_is_a_validation_error() {
        let handler = WorkloadQueryHandler::new(InMemoryWorkloadStore::new());
        let err = handler.get_monthly_minutes("alex", 2025, 13).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn summary_serializes_camel_case() {
        let handler = WorkloadQueryHandler::new(seeded_store().await);
        let summary = handler.get_by_username("alex").await.unwrap();

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["trainerUsername"], "alex");
        assert_eq!(json["months"][0]["totalMinutes"], 45);
    }
}
