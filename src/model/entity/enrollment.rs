use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::repo::{Record, ResourceTyped};
use crate::model::store::Collection;
use crate::model::{ModelManager, error::StoreResult, repo::CrudRepository};

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    id: String,
    student_id: Uuid,
    course_id: Uuid,
    enrolled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
pub struct EnrollmentCreate {
    pub student_id: Uuid,
    pub course_id: Uuid,
}

impl ResourceTyped for Enrollment {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Enrollment
    }
}

impl Record for Enrollment {
    type Id = String;

    fn collection() -> Collection {
        Collection::Enrollments
    }

    fn record_id(&self) -> String {
        self.id.clone()
    }
}

impl Enrollment {
    /// Natural key of an enrollment: one per (student, course).
    pub fn composite_id(student_id: Uuid, course_id: Uuid) -> String {
        format!("{student_id}-{course_id}")
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn student_id(&self) -> Uuid {
        self.student_id
    }

    pub fn course_id(&self) -> Uuid {
        self.course_id
    }
}

#[async_trait::async_trait]
impl CrudRepository<EnrollmentCreate> for Enrollment {
    /// Upserts by composite id, enrolling twice keeps a single record.
    async fn create(mm: &ModelManager, data: EnrollmentCreate) -> StoreResult<Self> {
        let enrollment = Enrollment {
            id: Self::composite_id(data.student_id, data.course_id),
            student_id: data.student_id,
            course_id: data.course_id,
            enrolled_at: Utc::now(),
        };
        mm.upsert(enrollment).await
    }
}

impl Enrollment {
    pub async fn all_by_student(mm: &ModelManager, student_id: Uuid) -> StoreResult<Vec<Self>> {
        let enrollments = mm.load::<Self>().await?;
        Ok(enrollments
            .into_iter()
            .filter(|e| e.student_id == student_id)
            .collect())
    }

    pub async fn all_by_course(mm: &ModelManager, course_id: Uuid) -> StoreResult<Vec<Self>> {
        let enrollments = mm.load::<Self>().await?;
        Ok(enrollments
            .into_iter()
            .filter(|e| e.course_id == course_id)
            .collect())
    }

    pub async fn is_enrolled(mm: &ModelManager, student_id: Uuid, course_id: Uuid) -> StoreResult<bool> {
        let enrollments = mm.load::<Self>().await?;
        Ok(enrollments
            .iter()
            .any(|e| e.student_id == student_id && e.course_id == course_id))
    }
}
