mod access;
pub use access::{HasOwner, check_access};

pub mod store;
pub use store::{Collection, EntityStore, MemoryStore, SqliteStore};

pub mod entity;

mod error;
pub use error::{StoreError, StoreResult};

mod repo;
pub use repo::{CrudRepository, Page, PaginatableRepository, Record, ResourceType, ResourceTyped};

use std::sync::Arc;

use tokio::sync::Mutex;

/// Entry point to persisted records.
///
/// Reads go straight to the store. Every read-modify-write cycle runs under
/// `write_lock`, so an upsert by natural key is atomic even when requests are
/// served concurrently (last write wins).
#[derive(Debug, Clone)]
pub struct ModelManager {
    store: Arc<dyn EntityStore>,
    write_lock: Arc<Mutex<()>>,
}

impl ModelManager {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Loads the whole collection of `T`. A missing key is an empty collection.
    pub async fn load<T: Record>(&self) -> StoreResult<Vec<T>> {
        match self.store.load(T::collection()).await? {
            Some(payload) => Ok(serde_json::from_str(&payload)?),
            None => Ok(Vec::new()),
        }
    }

    async fn save<T: Record>(&self, records: &[T]) -> StoreResult<()> {
        let payload = serde_json::to_string(records)?;
        self.store.save(T::collection(), payload).await
    }

    /// Runs `f` against the collection of `T` and persists the result.
    ///
    /// Nothing is written when `f` fails.
    pub async fn write<T, R, F>(&self, f: F) -> StoreResult<R>
    where
        T: Record,
        F: FnOnce(&mut Vec<T>) -> StoreResult<R> + Send,
        R: Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load::<T>().await?;
        let out = f(&mut records)?;
        self.save(&records).await?;
        Ok(out)
    }

    /// Replaces the record sharing `record`'s id, or appends it.
    pub async fn upsert<T: Record>(&self, record: T) -> StoreResult<T> {
        self.write(move |records: &mut Vec<T>| {
            let id = record.record_id();
            match records.iter().position(|r| r.record_id() == id) {
                Some(idx) => records[idx] = record.clone(),
                None => records.push(record.clone()),
            }
            Ok(record)
        })
        .await
    }
}
