use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::entity::{
    Lecture, LectureBody, LectureCreate, LectureKind, QUIZ_OPTION_COUNT, QuizQuestion,
};
use crate::progress::QuizAnswers;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionBody {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LectureCreateBody {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: LectureKind,
    pub content: Option<String>,
    pub questions: Option<Vec<QuestionBody>>,
}

impl LectureCreateBody {
    /// Checks form input and turns it into a trusted [`LectureCreate`].
    pub fn into_create(self, course_id: Uuid) -> Result<LectureCreate, String> {
        if self.title.trim().is_empty() {
            return Err(String::from("lecture title is required"));
        }

        let questions = match self.kind {
            LectureKind::Reading => {
                if self.content.as_deref().is_none_or(|c| c.trim().is_empty()) {
                    return Err(String::from("reading content is required"));
                }
                None
            }
            LectureKind::Quiz => {
                let questions = self.questions.unwrap_or_default();
                if questions.is_empty() {
                    return Err(String::from("quiz lectures must have at least one question"));
                }
                Some(
                    questions
                        .into_iter()
                        .map(QuestionBody::into_question)
                        .collect::<Result<Vec<_>, _>>()?,
                )
            }
        };

        Ok(LectureCreate::new(
            course_id,
            self.title,
            self.kind,
            self.content,
            questions,
        ))
    }
}

impl QuestionBody {
    fn into_question(self) -> Result<QuizQuestion, String> {
        if self.question.trim().is_empty() {
            return Err(String::from("all questions must have question text"));
        }
        if self.options.iter().any(|o| o.trim().is_empty()) {
            return Err(String::from("all answer options must be filled"));
        }

        let options: [String; QUIZ_OPTION_COUNT] = self
            .options
            .try_into()
            .map_err(|_| format!("questions need exactly {QUIZ_OPTION_COUNT} options"))?;
        if self.correct_answer >= QUIZ_OPTION_COUNT {
            return Err(String::from("correct answer must point to an option"));
        }

        Ok(QuizQuestion {
            id: Uuid::new_v4(),
            question: self.question,
            options,
            correct_answer: self.correct_answer,
        })
    }
}

/// Quiz question as shown to students, the correct answer stripped.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: Uuid,
    pub question: String,
    pub options: Vec<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LectureView {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub order: u32,
    #[serde(rename = "type")]
    pub kind: LectureKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<QuestionView>>,
    pub completed: bool,
    pub accessible: bool,
}

impl LectureView {
    /// A locked lecture keeps only its outline, the body is left out.
    pub fn new(lecture: &Lecture, completed: bool, accessible: bool) -> Self {
        let (content, questions) = match lecture.body() {
            _ if !accessible => (None, None),
            LectureBody::Reading { content } => (Some(content.clone()), None),
            LectureBody::Quiz { questions } => (
                None,
                Some(
                    questions
                        .iter()
                        .map(|q| QuestionView {
                            id: q.id,
                            question: q.question.clone(),
                            options: q.options.to_vec(),
                        })
                        .collect(),
                ),
            ),
        };

        Self {
            id: lecture.id(),
            course_id: lecture.course_id(),
            title: lecture.title().to_string(),
            order: lecture.order(),
            kind: lecture.kind(),
            content,
            questions,
            completed,
            accessible,
        }
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerBody {
    pub question_id: Uuid,
    pub option: usize,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct QuizSubmitBody {
    pub answers: Vec<AnswerBody>,
}

impl QuizSubmitBody {
    /// Later answers to the same question win.
    pub fn into_answers(self) -> QuizAnswers {
        self.answers
            .into_iter()
            .map(|a| (a.question_id, a.option))
            .collect::<HashMap<_, _>>()
    }
}
