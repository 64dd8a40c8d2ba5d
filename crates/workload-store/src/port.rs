use async_trait::async_trait;
use domain::{TrainerId, TrainerIdentity, TrainerWorkload, TrainingMonth};

use crate::Result;

/// Read side of the persistence boundary.
///
/// Implementations must all expose the same externally observable
/// (username, year, month) → minutes mapping, regardless of how the data
/// is physically laid out.
#[async_trait]
pub trait LoadWorkload: Send + Sync {
    /// Loads a trainer's full workload aggregate.
    ///
    /// Returns `None` if no record exists for the username. Duplicate
    /// entries for the same month are merged by summing, defensively.
    async fn load_by_username(&self, id: &TrainerId) -> Result<Option<TrainerWorkload>>;

    /// Loads the stored total minutes for one month.
    ///
    /// Returns `None` if no entry exists for that (username, year, month).
    async fn load_monthly_minutes(
        &self,
        id: &TrainerId,
        month: TrainingMonth,
    ) -> Result<Option<i64>>;
}

/// Write side of the persistence boundary.
#[async_trait]
pub trait SaveWorkload: Send + Sync {
    /// Inserts or overwrites the persisted total for one month.
    ///
    /// `total_minutes` is the new absolute total, not a delta. Identity
    /// fields carry the latest event's payload (last-write-wins).
    async fn upsert_month(
        &self,
        id: &TrainerId,
        month: TrainingMonth,
        identity: &TrainerIdentity,
        total_minutes: i64,
    ) -> Result<()>;

    /// Removes the persisted entry for one month.
    ///
    /// Deleting an absent entry is a no-op, not an error.
    async fn delete_month(&self, id: &TrainerId, month: TrainingMonth) -> Result<()>;
}

/// Combined persistence capability set the processing layer depends on.
pub trait WorkloadStore: LoadWorkload + SaveWorkload {}

impl<T: LoadWorkload + SaveWorkload> WorkloadStore for T {}
