use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::repo::{Record, ResourceTyped};
use crate::model::store::Collection;
use crate::model::{ModelManager, error::StoreResult, repo::CrudRepository};

/// Marker that a student finished a lecture. Only ever written as completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentProgress {
    id: String,
    student_id: Uuid,
    course_id: Uuid,
    lecture_id: Uuid,
    completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    score: Option<u8>,
    completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
pub struct StudentProgressCreate {
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub lecture_id: Uuid,
    pub score: Option<u8>,
}

impl ResourceTyped for StudentProgress {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::StudentProgress
    }
}

impl Record for StudentProgress {
    type Id = String;

    fn collection() -> Collection {
        Collection::Progress
    }

    fn record_id(&self) -> String {
        self.id.clone()
    }
}

impl StudentProgress {
    pub fn composite_id(student_id: Uuid, lecture_id: Uuid) -> String {
        format!("{student_id}-{lecture_id}")
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

    pub fn lecture_id(&self) -> Uuid {
        self.lecture_id
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn score(&self) -> Option<u8> {
        self.score
    }
}

#[async_trait::async_trait]
impl CrudRepository<StudentProgressCreate> for StudentProgress {
    /// Marks the lecture complete, overwriting any earlier record of the
    /// same (student, lecture).
    async fn create(mm: &ModelManager, data: StudentProgressCreate) -> StoreResult<Self> {
        let progress = StudentProgress {
            id: Self::composite_id(data.student_id, data.lecture_id),
            student_id: data.student_id,
            course_id: data.course_id,
            lecture_id: data.lecture_id,
            completed: true,
            score: data.score,
            completed_at: Utc::now(),
        };
        mm.upsert(progress).await
    }
}

impl StudentProgress {
    pub async fn all_by_student(mm: &ModelManager, student_id: Uuid) -> StoreResult<Vec<Self>> {
        let progress = mm.load::<Self>().await?;
        Ok(progress
            .into_iter()
            .filter(|p| p.student_id == student_id)
            .collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn later_write_overwrites() {
        let mm = ModelManager::in_memory();
        let data = StudentProgressCreate {
            student_id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            lecture_id: Uuid::new_v4(),
            score: Some(70),
        };

        StudentProgress::create(&mm, data).await.unwrap();
        let second = StudentProgress::create(&mm, StudentProgressCreate { score: Some(100), ..data })
            .await
            .unwrap();

        let all = StudentProgress::all_by_student(&mm, data.student_id).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], second);
        assert_eq!(all[0].score(), Some(100));
        assert!(all[0].completed());
    }

    #[test]
    fn reading_record_omits_score() {
        let progress = StudentProgress {
            id: String::from("a-b"),
            student_id: Uuid::new_v4(),
            course_id: Uuid::new_v4(),
            lecture_id: Uuid::new_v4(),
            completed: true,
            score: None,
            completed_at: Utc::now(),
        };

        let value = serde_json::to_value(&progress).unwrap();
        assert!(value.get("score").is_none());
        assert_eq!(value["completed"], true);
    }
}
