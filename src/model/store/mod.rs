//! Key-value namespace holding one JSON array per record collection.
//!

mod memory;
pub use memory::MemoryStore;

mod sqlite;
pub use sqlite::SqliteStore;

use std::sync::Arc;

use crate::model::error::StoreResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Courses,
    Lectures,
    Enrollments,
    Progress,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Self::Users,
        Self::Courses,
        Self::Lectures,
        Self::Enrollments,
        Self::Progress,
    ];

    /// Storage key the collection lives under.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Users => "learning_platform_users",
            Self::Courses => "learning_platform_courses",
            Self::Lectures => "learning_platform_lectures",
            Self::Enrollments => "learning_platform_enrollments",
            Self::Progress => "learning_platform_progress",
        }
    }
}

#[async_trait::async_trait]
pub trait EntityStore: Send + Sync + std::fmt::Debug {
    /// Returns the serialized collection, `None` if it was never saved.
    async fn load(&self, collection: Collection) -> StoreResult<Option<String>>;
    async fn save(&self, collection: Collection, payload: String) -> StoreResult<()>;
}

/// Opens the store named by `uri`: `memory` or any sqlite connection string.
#[tracing::instrument]
pub async fn open_store(uri: &str) -> StoreResult<Arc<dyn EntityStore>> {
    if uri == "memory" {
        tracing::debug!("using in-memory store");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let store = SqliteStore::connect(uri)?;
    tracing::debug!("applying migrations...");
    store.migrate().await?;
    Ok(Arc::new(store))
}
