use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::model::{ModelManager, error::StoreResult, store::Collection};

#[derive(Debug, Clone)]
pub enum ResourceType {
    User,
    Course,
    Lecture,
    Enrollment,
    StudentProgress,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, limit: i64, offset: i64) -> Self {
        Self {
            items,
            total,
            limit,
            offset,
        }
    }
}

pub trait ResourceTyped {
    fn get_resource_type() -> ResourceType;
}

/// A value record persisted as one element of a collection.
pub trait Record:
    ResourceTyped + Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
    type Id: PartialEq + Clone + std::fmt::Debug + Send + Sync + 'static;

    fn collection() -> Collection;
    fn record_id(&self) -> Self::Id;
}

#[async_trait::async_trait]
pub trait CrudRepository<Create>: Record
where
    Create: Send + 'static,
{
    async fn create(mm: &ModelManager, data: Create) -> StoreResult<Self>;

    async fn find_by_id(mm: &ModelManager, id: Self::Id) -> StoreResult<Option<Self>> {
        let records = mm.load::<Self>().await?;
        Ok(records.into_iter().find(|r| r.record_id() == id))
    }

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> StoreResult<Vec<Self>> {
        let records = mm.load::<Self>().await?;
        Ok(records
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count(mm: &ModelManager) -> StoreResult<i64> {
        Ok(mm.load::<Self>().await?.len() as i64)
    }
}

#[async_trait::async_trait]
pub trait PaginatableRepository<Create>: CrudRepository<Create>
where
    Create: Send + 'static,
{
    async fn page(mm: &ModelManager, limit: i64, offset: i64) -> StoreResult<Page<Self>>;
}

#[macro_export]
macro_rules! impl_paginatable_for {
    ($ent:ident, $ent_create:ident) => {
        #[async_trait::async_trait]
        impl $crate::model::PaginatableRepository<$ent_create> for $ent {
            async fn page(
                mm: &$crate::model::ModelManager,
                limit: i64,
                offset: i64,
            ) -> $crate::model::StoreResult<$crate::model::Page<$ent>> {
                let items = <$ent as $crate::model::CrudRepository<$ent_create>>::list(mm, limit, offset).await?;
                let count = <$ent as $crate::model::CrudRepository<$ent_create>>::count(mm).await?;
                Ok($crate::model::Page::new(items, count, limit, offset))
            }
        }
    };
}
