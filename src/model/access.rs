use crate::model::{
    ModelManager,
    error::{StoreError, StoreResult},
};

#[async_trait::async_trait]
pub trait HasOwner {
    type OwnerId: PartialEq + Send + Sync;
    async fn get_owner_id(&self, mm: &ModelManager) -> StoreResult<Self::OwnerId>;
}

/// Fails with [`StoreError::Forbidden`] unless `resource` belongs to `expected`.
pub async fn check_access<T, O>(mm: &ModelManager, resource: &T, expected: O) -> StoreResult<()>
where
    T: HasOwner<OwnerId = O> + Sync,
    O: PartialEq + Send + Sync,
{
    let actual_owner = resource.get_owner_id(mm).await?;

    if actual_owner == expected {
        Ok(())
    } else {
        Err(StoreError::Forbidden)
    }
}
