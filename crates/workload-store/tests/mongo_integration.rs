//! MongoDB integration tests
//!
//! These tests use a shared MongoDB container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p workload-store --test mongo_integration -- --test-threads=1
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use domain::{TrainerId, TrainerIdentity, TrainingMonth};
use mongodb::Client;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::mongo::Mongo;
use tokio::sync::OnceCell;
use workload_store::{LoadWorkload, MongoWorkloadStore, SaveWorkload};

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Mongo>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

static DATABASE_SEQ: AtomicUsize = AtomicUsize::new(0);

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Mongo::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(27017).await.unwrap();

            let connection_string = format!("mongodb://{}:{}", host, port);

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a store backed by a fresh database for test isolation
async fn get_test_store() -> MongoWorkloadStore {
    let info = get_container_info().await;
    let client = Client::with_uri_str(&info.connection_string).await.unwrap();

    let database_name = format!(
        "workload_test_{}",
        DATABASE_SEQ.fetch_add(1, Ordering::SeqCst)
    );
    MongoWorkloadStore::new(&client, &database_name)
        .await
        .unwrap()
}

fn trainer(username: &str) -> TrainerId {
    TrainerId::new(username).unwrap()
}

fn identity() -> TrainerIdentity {
    TrainerIdentity::new("Alex", "Smith", true).unwrap()
}

fn month(year: i32, m: u32) -> TrainingMonth {
    TrainingMonth::new(year, m).unwrap()
}

#[tokio::test]
async fn upsert_creates_nested_entries() {
    let store = get_test_store().await;
    let id = trainer("alex");
    let m = month(2025, 7);

    store.upsert_month(&id, m, &identity(), 60).await.unwrap();

    let minutes = store.load_monthly_minutes(&id, m).await.unwrap();
    assert_eq!(minutes, Some(60));

    let workload = store.load_by_username(&id).await.unwrap().unwrap();
    assert_eq!(workload.monthly_minutes(m), 60);
    assert_eq!(workload.identity().first_name, "Alex");
}

#[tokio::test]
async fn upsert_is_idempotent_per_step() {
    let store = get_test_store().await;
    let id = trainer("alex");
    let m = month(2025, 7);

    // Re-running the whole pipeline must not duplicate year or month
    // entries; the final total is simply set again.
    store.upsert_month(&id, m, &identity(), 60).await.unwrap();
    store.upsert_month(&id, m, &identity(), 60).await.unwrap();

    let workload = store.load_by_username(&id).await.unwrap().unwrap();
    assert_eq!(workload.month_count(), 1);
    assert_eq!(workload.monthly_minutes(m), 60);
}

#[tokio::test]
async fn upsert_overwrites_total() {
    let store = get_test_store().await;
    let id = trainer("alex");
    let m = month(2025, 7);

    store.upsert_month(&id, m, &identity(), 60).await.unwrap();
    store.upsert_month(&id, m, &identity(), 120).await.unwrap();

    let minutes = store.load_monthly_minutes(&id, m).await.unwrap();
    assert_eq!(minutes, Some(120));
}

#[tokio::test]
async fn months_across_years_load_sorted() {
    let store = get_test_store().await;
    let id = trainer("alex");

    store
        .upsert_month(&id, month(2025, 7), &identity(), 60)
        .await
        .unwrap();
    store
        .upsert_month(&id, month(2024, 12), &identity(), 45)
        .await
        .unwrap();
    store
        .upsert_month(&id, month(2025, 1), &identity(), 30)
        .await
        .unwrap();

    let workload = store.load_by_username(&id).await.unwrap().unwrap();
    let months: Vec<_> = workload.months().collect();
    assert_eq!(
        months,
        vec![
            (month(2024, 12), 45),
            (month(2025, 1), 30),
            (month(2025, 7), 60),
        ]
    );
}

#[tokio::test]
async fn delete_removes_month_and_empty_year() {
    let store = get_test_store().await;
    let id = trainer("alex");

    store
        .upsert_month(&id, month(2025, 6), &identity(), 30)
        .await
        .unwrap();
    store
        .upsert_month(&id, month(2025, 7), &identity(), 60)
        .await
        .unwrap();

    store.delete_month(&id, month(2025, 6)).await.unwrap();
    let workload = store.load_by_username(&id).await.unwrap().unwrap();
    assert_eq!(workload.monthly_minutes(month(2025, 6)), 0);
    assert_eq!(workload.monthly_minutes(month(2025, 7)), 60);

    store.delete_month(&id, month(2025, 7)).await.unwrap();
    let workload = store.load_by_username(&id).await.unwrap().unwrap();
    assert_eq!(workload.month_count(), 0);

    // Deleting an absent entry is a no-op, not an error.
    store.delete_month(&id, month(2025, 7)).await.unwrap();
}

#[tokio::test]
async fn load_unknown_trainer_returns_none() {
    let store = get_test_store().await;
    let result = store.load_by_username(&trainer("nobody")).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn identity_fields_are_create_on_insert_only() {
    let store = get_test_store().await;
    let id = trainer("alex");

    store
        .upsert_month(&id, month(2025, 7), &identity(), 60)
        .await
        .unwrap();

    // The document upsert never rewrites identity fields on an existing
    // document; only the month total changes.
    let renamed = TrainerIdentity::new("Alexandra", "Smith", false).unwrap();
    store
        .upsert_month(&id, month(2025, 7), &renamed, 90)
        .await
        .unwrap();

    let workload = store.load_by_username(&id).await.unwrap().unwrap();
    assert_eq!(workload.monthly_minutes(month(2025, 7)), 90);
    assert_eq!(workload.identity().first_name, "Alex");
}
