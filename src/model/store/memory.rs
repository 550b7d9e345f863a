use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::model::error::StoreResult;
use crate::model::store::{Collection, EntityStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<Collection, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl EntityStore for MemoryStore {
    async fn load(&self, collection: Collection) -> StoreResult<Option<String>> {
        Ok(self.entries.read().await.get(&collection).cloned())
    }

    async fn save(&self, collection: Collection, payload: String) -> StoreResult<()> {
        self.entries.write().await.insert(collection, payload);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn save_then_load() {
        let store = MemoryStore::new();
        store
            .save(Collection::Lectures, String::from("[]"))
            .await
            .unwrap();

        assert_eq!(
            store.load(Collection::Lectures).await.unwrap().as_deref(),
            Some("[]")
        );
        assert!(store.load(Collection::Progress).await.unwrap().is_none());
    }
}
