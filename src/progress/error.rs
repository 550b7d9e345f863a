use thiserror::Error;

use crate::model::{StoreError, entity::LectureKind};

pub type ProgressResult<T> = std::result::Result<T, ProgressError>;

#[derive(Debug, Error)]
pub enum ProgressError {
    /// Submission rejected before scoring, nothing was written.
    #[error("{unanswered} question(s) left unanswered")]
    IncompleteAnswers { unanswered: usize },
    #[error("expected a {expected} lecture, got {actual}")]
    WrongLectureKind {
        expected: LectureKind,
        actual: LectureKind,
    },
    #[error("store error: {0}")]
    StoreError(#[from] StoreError),
}
