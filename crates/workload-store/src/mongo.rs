//! MongoDB workload store with a nested document layout.
//!
//! One document per trainer (`_id` = username) holding an array of
//! year-entries, each holding an array of month-entries. The store offers
//! no single atomic multi-level array update, so writes run as a short
//! ordered pipeline of independently atomic, individually idempotent
//! steps (see `upsert_month` / `delete_month`).

use async_trait::async_trait;
use domain::{TrainerId, TrainerIdentity, TrainerWorkload, TrainingMonth};
use mongodb::bson::{DateTime, doc};
use mongodb::{Client, Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};

use crate::{
    Result, StoreError,
    port::{LoadWorkload, SaveWorkload},
};

const WORKLOADS_COLLECTION: &str = "trainer_workloads";

/// Persisted document shape: one document per trainer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TrainerWorkloadDoc {
    #[serde(rename = "_id")]
    pub username: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub active: bool,
    #[serde(default)]
    pub years: Vec<YearWorkDoc>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct YearWorkDoc {
    pub year: i32,
    #[serde(default)]
    pub months: Vec<MonthWorkDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct MonthWorkDoc {
    pub month: i32,
    #[serde(rename = "totalMinutes")]
    pub total_minutes: i64,
}

impl TrainerWorkloadDoc {
    fn into_workload(self, id: &TrainerId) -> Result<TrainerWorkload> {
        let identity = TrainerIdentity::new(self.first_name, self.last_name, self.active)
            .map_err(StoreError::Corrupt)?;
        let mut workload = TrainerWorkload::new(id.clone(), identity);

        for year in &self.years {
            for month in &year.months {
                // A crash between the upsert steps can leave a zero-seeded
                // month-entry behind; such entries are semantically absent.
                if month.total_minutes <= 0 {
                    continue;
                }
                let training_month = TrainingMonth::new(year.year, month.month as u32)
                    .map_err(StoreError::Corrupt)?;
                workload
                    .record(training_month, month.total_minutes)
                    .map_err(StoreError::Corrupt)?;
            }
        }

        Ok(workload)
    }
}

/// MongoDB implementation of the workload ports.
#[derive(Clone)]
pub struct MongoWorkloadStore {
    database: Database,
    workloads: Collection<TrainerWorkloadDoc>,
}

impl MongoWorkloadStore {
    /// Creates a new MongoDB workload store and ensures its indexes.
    pub async fn new(client: &Client, database_name: &str) -> Result<Self> {
        let database = client.database(database_name);
        let workloads = database.collection(WORKLOADS_COLLECTION);

        let store = Self {
            database,
            workloads,
        };
        store.init().await?;

        Ok(store)
    }

    async fn init(&self) -> Result<()> {
        let fullname_index = IndexModel::builder()
            .keys(doc! { "firstName": 1, "lastName": 1 })
            .build();
        self.workloads.create_index(fullname_index).await?;

        Ok(())
    }

    /// Gets the database reference.
    pub fn database(&self) -> &Database {
        &self.database
    }

    async fn find_doc(&self, id: &TrainerId) -> Result<Option<TrainerWorkloadDoc>> {
        let found = self.workloads.find_one(doc! { "_id": id.as_str() }).await?;
        Ok(found)
    }
}

#[async_trait]
impl LoadWorkload for MongoWorkloadStore {
    async fn load_by_username(&self, id: &TrainerId) -> Result<Option<TrainerWorkload>> {
        match self.find_doc(id).await? {
            Some(doc) => Ok(Some(doc.into_workload(id)?)),
            None => Ok(None),
        }
    }

    async fn load_monthly_minutes(
        &self,
        id: &TrainerId,
        month: TrainingMonth,
    ) -> Result<Option<i64>> {
        let Some(doc) = self.find_doc(id).await? else {
            return Ok(None);
        };

        let minutes = doc
            .years
            .iter()
            .filter(|y| y.year == month.year())
            .flat_map(|y| y.months.iter())
            .find(|m| m.month == month.month() as i32)
            .map(|m| m.total_minutes);

        Ok(minutes)
    }
}

#[async_trait]
impl SaveWorkload for MongoWorkloadStore {
    /// Four ordered, independently atomic steps. Each step is safe to
    /// retry; the sequence as a whole is not transactional, and a crash
    /// between steps 3 and 4 can leave a zero-valued month-entry in place.
    /// That artifact is filtered out on load.
    async fn upsert_month(
        &self,
        id: &TrainerId,
        month: TrainingMonth,
        identity: &TrainerIdentity,
        total_minutes: i64,
    ) -> Result<()> {
        let username = id.as_str();
        let year = month.year();
        let month_of_year = month.month() as i32;

        // 1. Ensure the document exists. Identity fields are written on
        //    insert only; an existing document keeps what it has.
        self.workloads
            .update_one(
                doc! { "_id": username },
                doc! { "$setOnInsert": {
                    "firstName": &identity.first_name,
                    "lastName": &identity.last_name,
                    "active": identity.active,
                    "years": [],
                } },
            )
            .upsert(true)
            .await?;

        // 2. Add the year-entry only if no entry for that year exists yet.
        self.workloads
            .update_one(
                doc! { "_id": username, "years.year": { "$ne": year } },
                doc! { "$push": { "years": { "year": year, "months": [] } } },
            )
            .await?;

        // 3. Add the month-entry within that year, seeded at zero, only if
        //    absent. The $elemMatch pins the positional operator to the
        //    target year.
        self.workloads
            .update_one(
                doc! {
                    "_id": username,
                    "years": { "$elemMatch": {
                        "year": year,
                        "months.month": { "$ne": month_of_year },
                    } },
                },
                doc! { "$push": {
                    "years.$.months": { "month": month_of_year, "totalMinutes": 0_i64 },
                } },
            )
            .await?;

        // 4. Set the month's total and refresh the update timestamp,
        //    addressing the entry by year and month simultaneously.
        self.workloads
            .update_one(
                doc! { "_id": username },
                doc! { "$set": {
                    "years.$[y].months.$[m].totalMinutes": total_minutes,
                    "updatedAt": DateTime::now(),
                } },
            )
            .array_filters(vec![
                doc! { "y.year": year },
                doc! { "m.month": month_of_year },
            ])
            .await?;

        Ok(())
    }

    /// Two ordered, independently atomic steps. A crash in between can
    /// leave an empty year-entry behind, which is semantically equivalent
    /// to an absent year for querying purposes.
    async fn delete_month(&self, id: &TrainerId, month: TrainingMonth) -> Result<()> {
        let username = id.as_str();
        let year = month.year();
        let month_of_year = month.month() as i32;

        // 1. Remove the month-entry from the target year.
        self.workloads
            .update_one(
                doc! { "_id": username },
                doc! { "$pull": { "years.$[y].months": { "month": month_of_year } } },
            )
            .array_filters(vec![doc! { "y.year": year }])
            .await?;

        // 2. Remove the year-entry itself if its month list is now empty.
        self.workloads
            .update_one(
                doc! { "_id": username },
                doc! { "$pull": { "years": { "year": year, "months": { "$size": 0 } } } },
            )
            .await?;

        Ok(())
    }
}
