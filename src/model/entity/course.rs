use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::impl_paginatable_for;
use crate::model::access::HasOwner;
use crate::model::repo::{Record, ResourceTyped};
use crate::model::store::Collection;
use crate::model::{ModelManager, error::StoreResult, repo::CrudRepository};

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    id: Uuid,
    title: String,
    description: String,
    instructor_id: Uuid,
    instructor_name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CourseCreate {
    pub title: String,
    pub description: String,
    pub instructor_id: Uuid,
    pub instructor_name: String,
}

impl ResourceTyped for Course {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Course
    }
}

impl Record for Course {
    type Id = Uuid;

    fn collection() -> Collection {
        Collection::Courses
    }

    fn record_id(&self) -> Uuid {
        self.id
    }
}

impl Course {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn instructor_id(&self) -> Uuid {
        self.instructor_id
    }

    pub fn instructor_name(&self) -> &str {
        &self.instructor_name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Case-insensitive substring match on title, description and instructor name.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }

        self.title.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
            || self.instructor_name.to_lowercase().contains(&query)
    }
}

#[async_trait::async_trait]
impl CrudRepository<CourseCreate> for Course {
    async fn create(mm: &ModelManager, data: CourseCreate) -> StoreResult<Self> {
        let now = Utc::now();
        let course = Course {
            id: Uuid::new_v4(),
            title: data.title,
            description: data.description,
            instructor_id: data.instructor_id,
            instructor_name: data.instructor_name,
            created_at: now,
            updated_at: now,
        };

        mm.write(|courses: &mut Vec<Course>| {
            courses.push(course.clone());
            Ok(course)
        })
        .await
    }
}

impl Course {
    pub async fn all_by_instructor(mm: &ModelManager, instructor_id: Uuid) -> StoreResult<Vec<Self>> {
        let courses = mm.load::<Self>().await?;
        Ok(courses
            .into_iter()
            .filter(|c| c.instructor_id == instructor_id)
            .collect())
    }

    pub async fn search(mm: &ModelManager, query: &str) -> StoreResult<Vec<Self>> {
        let courses = mm.load::<Self>().await?;
        Ok(courses.into_iter().filter(|c| c.matches(query)).collect())
    }
}

impl_paginatable_for!(Course, CourseCreate);

#[async_trait::async_trait]
impl HasOwner for Course {
    type OwnerId = Uuid;

    async fn get_owner_id(&self, _mm: &ModelManager) -> StoreResult<Self::OwnerId> {
        Ok(self.instructor_id)
    }
}
