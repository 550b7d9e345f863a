use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::repo::{Record, ResourceTyped};
use crate::model::store::Collection;
use crate::model::{ModelManager, StoreError, error::StoreResult, repo::CrudRepository};
use crate::web::UserRole;

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserEntity {
    id: Uuid,
    email: String,
    name: String,
    role: UserRole,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UserEntityCreate {
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

impl ResourceTyped for UserEntity {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::User
    }
}

impl Record for UserEntity {
    type Id = Uuid;

    fn collection() -> Collection {
        Collection::Users
    }

    fn record_id(&self) -> Uuid {
        self.id
    }
}

impl UserEntity {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> UserRole {
        self.role.clone()
    }
}

#[async_trait::async_trait]
impl CrudRepository<UserEntityCreate> for UserEntity {
    /// Registers a new user. An email that is already taken is a
    /// [`StoreError::Duplicate`].
    async fn create(mm: &ModelManager, data: UserEntityCreate) -> StoreResult<Self> {
        mm.write(|users: &mut Vec<UserEntity>| {
            if users.iter().any(|u| u.email == data.email) {
                return Err(StoreError::Duplicate {
                    resource_type: Self::get_resource_type(),
                });
            }

            let user = UserEntity {
                id: Uuid::new_v4(),
                email: data.email,
                name: data.name,
                role: data.role,
                created_at: Utc::now(),
            };
            users.push(user.clone());
            Ok(user)
        })
        .await
    }
}

impl UserEntity {
    pub async fn find_by_email(mm: &ModelManager, email: &str) -> StoreResult<Option<Self>> {
        let users = mm.load::<Self>().await?;
        Ok(users.into_iter().find(|u| u.email == email))
    }
}
