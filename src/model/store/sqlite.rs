use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::model::error::StoreResult;
use crate::model::store::{Collection, EntityStore};

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool, // cloning is cheap, pool is just a wrapper around Arc<>
}

impl SqliteStore {
    /// Single connection, kept alive forever, so `sqlite::memory:` keeps its data.
    pub fn connect(connection_str: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(connection_str)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_lazy_with(options);
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!().run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl EntityStore for SqliteStore {
    async fn load(&self, collection: Collection) -> StoreResult<Option<String>> {
        let payload = sqlx::query_scalar::<_, String>("SELECT payload FROM collections WHERE key = ?1")
            .bind(collection.key())
            .fetch_optional(&self.pool)
            .await?;
        Ok(payload)
    }

    async fn save(&self, collection: Collection, payload: String) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO collections (key, payload) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET payload = excluded.payload
            "#,
        )
        .bind(collection.key())
        .bind(payload)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    async fn memory_store() -> SqliteStore {
        let store = SqliteStore::connect("sqlite::memory:").unwrap();
        store.migrate().await.unwrap();
        store
    }

    #[tokio::test]
    async fn missing_collection_is_none() {
        let store = memory_store().await;
        assert!(store.load(Collection::Users).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_overwrites_payload() {
        let store = memory_store().await;
        store.save(Collection::Courses, String::from("[1]")).await.unwrap();
        store.save(Collection::Courses, String::from("[1,2]")).await.unwrap();

        let payload = store.load(Collection::Courses).await.unwrap();
        assert_eq!(payload.as_deref(), Some("[1,2]"));
    }

    #[tokio::test]
    async fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let uri = format!("sqlite://{}", dir.path().join("lectern.db").display());

        let store = SqliteStore::connect(&uri).unwrap();
        store.migrate().await.unwrap();
        store.save(Collection::Progress, String::from("[]")).await.unwrap();
        store.pool().close().await;

        let reopened = SqliteStore::connect(&uri).unwrap();
        reopened.migrate().await.unwrap();
        assert_eq!(
            reopened.load(Collection::Progress).await.unwrap().as_deref(),
            Some("[]")
        );
    }
}
