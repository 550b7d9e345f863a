use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::access::HasOwner;
use crate::model::entity::Course;
use crate::model::repo::{Record, ResourceTyped};
use crate::model::store::Collection;
use crate::model::{ModelManager, StoreError, error::StoreResult, repo::CrudRepository};

pub const QUIZ_OPTION_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LectureKind {
    Reading,
    Quiz,
}

impl std::fmt::Display for LectureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reading => write!(f, "reading"),
            Self::Quiz => write!(f, "quiz"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: Uuid,
    pub question: String,
    #[schema(value_type = Vec<String>)]
    pub options: [String; QUIZ_OPTION_COUNT],
    pub correct_answer: usize,
}

/// Payload of a lecture, tagged by its `type` in storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LectureBody {
    Reading { content: String },
    Quiz { questions: Vec<QuizQuestion> },
}

impl LectureBody {
    pub fn kind(&self) -> LectureKind {
        match self {
            Self::Reading { .. } => LectureKind::Reading,
            Self::Quiz { .. } => LectureKind::Quiz,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lecture {
    id: Uuid,
    course_id: Uuid,
    title: String,
    order: u32,
    #[serde(flatten)]
    body: LectureBody,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LectureCreate {
    pub course_id: Uuid,
    pub title: String,
    pub body: LectureBody,
}

impl LectureCreate {
    /// Builds the payload from loose form input. Only the field matching
    /// `kind` is kept; the other one is dropped.
    pub fn new(
        course_id: Uuid,
        title: String,
        kind: LectureKind,
        content: Option<String>,
        questions: Option<Vec<QuizQuestion>>,
    ) -> Self {
        let body = match kind {
            LectureKind::Reading => LectureBody::Reading {
                content: content.unwrap_or_default(),
            },
            LectureKind::Quiz => LectureBody::Quiz {
                questions: questions.unwrap_or_default(),
            },
        };

        Self {
            course_id,
            title,
            body,
        }
    }
}

impl ResourceTyped for Lecture {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Lecture
    }
}

impl Record for Lecture {
    type Id = Uuid;

    fn collection() -> Collection {
        Collection::Lectures
    }

    fn record_id(&self) -> Uuid {
        self.id
    }
}

impl Lecture {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn course_id(&self) -> Uuid {
        self.course_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// 1-based position inside the course.
    pub fn order(&self) -> u32 {
        self.order
    }

    pub fn body(&self) -> &LectureBody {
        &self.body
    }

    pub fn kind(&self) -> LectureKind {
        self.body.kind()
    }

    pub fn content(&self) -> Option<&str> {
        match &self.body {
            LectureBody::Reading { content } => Some(content),
            LectureBody::Quiz { .. } => None,
        }
    }

    pub fn questions(&self) -> Option<&[QuizQuestion]> {
        match &self.body {
            LectureBody::Quiz { questions } => Some(questions),
            LectureBody::Reading { .. } => None,
        }
    }
}

#[async_trait::async_trait]
impl CrudRepository<LectureCreate> for Lecture {
    /// Appends a lecture at the end of its course. Input is stored as given.
    async fn create(mm: &ModelManager, data: LectureCreate) -> StoreResult<Self> {
        mm.write(|lectures: &mut Vec<Lecture>| {
            let existing = lectures
                .iter()
                .filter(|l| l.course_id == data.course_id)
                .count();

            let lecture = Lecture {
                id: Uuid::new_v4(),
                course_id: data.course_id,
                title: data.title,
                order: existing as u32 + 1,
                body: data.body,
                created_at: Utc::now(),
            };
            lectures.push(lecture.clone());
            Ok(lecture)
        })
        .await
    }
}

impl Lecture {
    /// Lectures of `course_id` in ascending `order`.
    pub fn ordered_for_course(lectures: &[Lecture], course_id: Uuid) -> Vec<Lecture> {
        let mut lectures: Vec<Lecture> = lectures
            .iter()
            .filter(|l| l.course_id == course_id)
            .cloned()
            .collect();
        lectures.sort_by_key(|l| l.order);
        lectures
    }

    pub async fn all_by_course(mm: &ModelManager, course_id: Uuid) -> StoreResult<Vec<Self>> {
        let lectures = mm.load::<Self>().await?;
        Ok(Self::ordered_for_course(&lectures, course_id))
    }
}

#[async_trait::async_trait]
impl HasOwner for Lecture {
    type OwnerId = Uuid;

    /// Lectures belong to whoever owns their course.
    async fn get_owner_id(&self, mm: &ModelManager) -> StoreResult<Self::OwnerId> {
        let course = Course::find_by_id(mm, self.course_id)
            .await?
            .ok_or(StoreError::Forbidden)?;
        course.get_owner_id(mm).await
    }
}
