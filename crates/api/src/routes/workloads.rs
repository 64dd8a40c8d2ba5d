//! Workload command and query endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::NaiveDate;
use serde::Deserialize;
use workload_store::WorkloadStore;

use application::{
    RecordTrainingCommand, TrainerWorkloadSummary, WorkloadCommandHandler, WorkloadQueryHandler,
};
use domain::ActionType;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S> {
    pub commands: WorkloadCommandHandler<S>,
    pub queries: WorkloadQueryHandler<S>,
}

/// Request body for POST and DELETE /api/v1/workloads.
///
/// The verb fixes the action: POST always adds, DELETE always cancels.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadRequest {
    pub trainer_username: String,
    pub trainer_first_name: String,
    pub trainer_last_name: String,
    pub is_active: bool,
    pub training_date: NaiveDate,
    pub training_duration_minutes: i64,
}

impl WorkloadRequest {
    // The event consumer clamps non-positive durations; a synchronous
    // client gets told instead.
    fn validate(&self) -> Result<(), ApiError> {
        if self.training_duration_minutes <= 0 {
            return Err(ApiError::BadRequest(
                "trainingDurationMinutes must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    fn into_command(self, action: ActionType) -> RecordTrainingCommand {
        RecordTrainingCommand::new(
            self.trainer_username,
            self.trainer_first_name,
            self.trainer_last_name,
            self.is_active,
            self.training_date,
            self.training_duration_minutes,
            action,
        )
    }
}

/// POST /api/v1/workloads — record a training for a trainer.
#[tracing::instrument(skip(state, req), fields(username = %req.trainer_username))]
pub async fn record<S: WorkloadStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<WorkloadRequest>,
) -> Result<StatusCode, ApiError> {
    req.validate()?;
    state
        .commands
        .handle(&req.into_command(ActionType::Add))
        .await?;
    Ok(StatusCode::OK)
}

/// DELETE /api/v1/workloads — cancel a previously recorded training.
#[tracing::instrument(skip(state, req), fields(username = %req.trainer_username))]
pub async fn cancel<S: WorkloadStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<WorkloadRequest>,
) -> Result<StatusCode, ApiError> {
    req.validate()?;
    state
        .commands
        .handle(&req.into_command(ActionType::Delete))
        .await?;
    Ok(StatusCode::OK)
}

/// GET /api/v1/workloads/{username} — full workload summary for a trainer.
#[tracing::instrument(skip(state))]
pub async fn get_workload<S: WorkloadStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(username): Path<String>,
) -> Result<Json<TrainerWorkloadSummary>, ApiError> {
    let summary = state.queries.get_by_username(&username).await?;
    Ok(Json(summary))
}

/// GET /api/v1/workloads/{username}/months/{year}/{month} — one month's
/// total minutes. Unknown trainers and empty months answer 0.
#[tracing::instrument(skip(state))]
pub async fn get_monthly_minutes<S: WorkloadStore>(
    State(state): State<Arc<AppState<S>>>,
    Path((username, year, month)): Path<(String, i32, u32)>,
) -> Result<Json<i64>, ApiError> {
    let minutes = state.queries.get_monthly_minutes(&username, year, month).await?;
    Ok(Json(minutes))
}
