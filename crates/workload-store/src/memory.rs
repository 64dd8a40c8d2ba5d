use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use domain::{TrainerId, TrainerIdentity, TrainerWorkload, TrainingMonth};
use tokio::sync::RwLock;

use crate::{
    Result, StoreError,
    port::{LoadWorkload, SaveWorkload},
};

#[derive(Debug, Clone)]
struct TrainerRecord {
    identity: TrainerIdentity,
    minutes_by_month: BTreeMap<(i32, u32), i64>,
}

/// In-memory workload store for testing and local development.
///
/// Behaves like the relational adapter: identity fields are overwritten on
/// every upsert, and a trainer with no remaining months is absent entirely.
#[derive(Clone, Default)]
pub struct InMemoryWorkloadStore {
    records: Arc<RwLock<HashMap<String, TrainerRecord>>>,
}

impl InMemoryWorkloadStore {
    /// Creates a new empty in-memory workload store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of trainers with at least one stored month.
    pub async fn trainer_count(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns whether an entry exists for the given (trainer, month).
    pub async fn month_exists(&self, id: &TrainerId, month: TrainingMonth) -> bool {
        self.records
            .read()
            .await
            .get(id.as_str())
            .is_some_and(|r| {
                r.minutes_by_month
                    .contains_key(&(month.year(), month.month()))
            })
    }

    /// Clears all stored records.
    pub async fn clear(&self) {
        self.records.write().await.clear();
    }
}

#[async_trait]
impl LoadWorkload for InMemoryWorkloadStore {
    async fn load_by_username(&self, id: &TrainerId) -> Result<Option<TrainerWorkload>> {
        let records = self.records.read().await;
        let Some(record) = records.get(id.as_str()) else {
            return Ok(None);
        };

        let mut workload = TrainerWorkload::new(id.clone(), record.identity.clone());
        for (&(year, month), &minutes) in &record.minutes_by_month {
            if minutes <= 0 {
                continue;
            }
            let month = TrainingMonth::new(year, month).map_err(StoreError::Corrupt)?;
            workload.record(month, minutes).map_err(StoreError::Corrupt)?;
        }

        Ok(Some(workload))
    }

    async fn load_monthly_minutes(
        &self,
        id: &TrainerId,
        month: TrainingMonth,
    ) -> Result<Option<i64>> {
        let records = self.records.read().await;
        Ok(records
            .get(id.as_str())
            .and_then(|r| r.minutes_by_month.get(&(month.year(), month.month())))
            .copied())
    }
}

#[async_trait]
impl SaveWorkload for InMemoryWorkloadStore {
    async fn upsert_month(
        &self,
        id: &TrainerId,
        month: TrainingMonth,
        identity: &TrainerIdentity,
        total_minutes: i64,
    ) -> Result<()> {
        let mut records = self.records.write().await;
        let record = records
            .entry(id.as_str().to_string())
            .or_insert_with(|| TrainerRecord {
                identity: identity.clone(),
                minutes_by_month: BTreeMap::new(),
            });

        record.identity = identity.clone();
        record
            .minutes_by_month
            .insert((month.year(), month.month()), total_minutes);

        Ok(())
    }

    async fn delete_month(&self, id: &TrainerId, month: TrainingMonth) -> Result<()> {
        let mut records = self.records.write().await;
        if let Some(record) = records.get_mut(id.as_str()) {
            record
                .minutes_by_month
                .remove(&(month.year(), month.month()));
            if record.minutes_by_month.is_empty() {
                records.remove(id.as_str());
            }
        }

        Ok(())
    }
}
