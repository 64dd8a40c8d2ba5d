pub mod error;
pub mod memory;
pub mod mongo;
pub mod port;
pub mod postgres;

pub use error::{Result, StoreError};
pub use memory::InMemoryWorkloadStore;
pub use mongo::MongoWorkloadStore;
pub use port::{LoadWorkload, SaveWorkload, WorkloadStore};
pub use postgres::PostgresWorkloadStore;
