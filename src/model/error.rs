use thiserror::Error;

use crate::model::ResourceType;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlx migrate error: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),
    #[error("sqlx error: {0}")]
    SqlxError(#[from] sqlx::Error),
    #[error("json error: {0}")]
    SerdeError(#[from] serde_json::Error),
    #[error("{resource_type:?} already exists")]
    Duplicate { resource_type: ResourceType },
    #[error("access to this resource is forbidden")]
    Forbidden,
}
