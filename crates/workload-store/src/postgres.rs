use async_trait::async_trait;
use domain::{TrainerId, TrainerIdentity, TrainerWorkload, TrainingMonth};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::{
    Result, StoreError,
    port::{LoadWorkload, SaveWorkload},
};

/// PostgreSQL-backed workload store.
///
/// One row per (username, year, month), unique on that triple. The unique
/// constraint plus `ON CONFLICT` upserts give per-row atomicity for
/// concurrent deliveries racing on the same key.
#[derive(Clone)]
pub struct PostgresWorkloadStore {
    pool: PgPool,
}

impl PostgresWorkloadStore {
    /// Creates a new PostgreSQL workload store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_identity(row: &PgRow) -> Result<TrainerIdentity> {
        let identity = TrainerIdentity::new(
            row.try_get::<String, _>("first_name")?,
            row.try_get::<String, _>("last_name")?,
            row.try_get("active")?,
        )?;
        Ok(identity)
    }
}

#[async_trait]
impl LoadWorkload for PostgresWorkloadStore {
    async fn load_by_username(&self, id: &TrainerId) -> Result<Option<TrainerWorkload>> {
        let rows = sqlx::query(
            r#"
            SELECT work_year, work_month, first_name, last_name, active, total_minutes
            FROM trainer_monthly_workload
            WHERE username = $1
            ORDER BY work_year ASC, work_month ASC
            "#,
        )
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await?;

        let Some(first) = rows.first() else {
            return Ok(None);
        };

        let mut workload = TrainerWorkload::new(id.clone(), Self::row_identity(first)?);
        for row in &rows {
            let year: i32 = row.try_get("work_year")?;
            let month: i32 = row.try_get("work_month")?;
            let minutes: i64 = row.try_get("total_minutes")?;
            // Rows with a non-positive total violate the storage invariant;
            // treat them as absent rather than poisoning the aggregate.
            if minutes <= 0 {
                continue;
            }
            let month = TrainingMonth::new(year, month as u32).map_err(StoreError::Corrupt)?;
            workload.record(month, minutes).map_err(StoreError::Corrupt)?;
        }

        Ok(Some(workload))
    }

    async fn load_monthly_minutes(
        &self,
        id: &TrainerId,
        month: TrainingMonth,
    ) -> Result<Option<i64>> {
        let minutes: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT total_minutes
            FROM trainer_monthly_workload
            WHERE username = $1 AND work_year = $2 AND work_month = $3
            "#,
        )
        .bind(id.as_str())
        .bind(month.year())
        .bind(month.month() as i32)
        .fetch_optional(&self.pool)
        .await?;

        Ok(minutes)
    }
}

#[async_trait]
impl SaveWorkload for PostgresWorkloadStore {
    async fn upsert_month(
        &self,
        id: &TrainerId,
        month: TrainingMonth,
        identity: &TrainerIdentity,
        total_minutes: i64,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO trainer_monthly_workload
                (username, work_year, work_month, first_name, last_name, active, total_minutes, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, now())
            ON CONFLICT ON CONSTRAINT uk_user_year_month DO UPDATE SET
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                active = EXCLUDED.active,
                total_minutes = EXCLUDED.total_minutes,
                updated_at = now()
            "#,
        )
        .bind(id.as_str())
        .bind(month.year())
        .bind(month.month() as i32)
        .bind(&identity.first_name)
        .bind(&identity.last_name)
        .bind(identity.active)
        .bind(total_minutes)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_month(&self, id: &TrainerId, month: TrainingMonth) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM trainer_monthly_workload
            WHERE username = $1 AND work_year = $2 AND work_month = $3
            "#,
        )
        .bind(id.as_str())
        .bind(month.year())
        .bind(month.month() as i32)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
