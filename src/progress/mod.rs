//! Progress & unlock engine.
//!
//! Everything here is derived on demand from the ordered lecture list of a
//! course and the student's progress records. Nothing is cached between calls,
//! so a fresh completion is visible to the very next query.
//!
//! - `quiz`: scoring and pass/fail
//! - `unlock`: per-lecture accessibility and course aggregation
//! - `index`: progress records grouped by (student, course)
//! - `service`: store-backed operations (completion, submission, overviews)

mod error;
pub use error::{ProgressError, ProgressResult};

mod index;
pub use index::ProgressIndex;

mod quiz;
pub use quiz::{PASS_THRESHOLD, QuizAnswers, QuizOutcome, round_percent, score_quiz};

mod unlock;
pub use unlock::{CourseProgress, LectureState, is_accessible};

mod service;
pub use service::{
    CourseSummary, InstructorOverview, QuizSubmission, StudentOverview, complete_reading,
    course_progress, instructor_overview, student_overview, submit_quiz,
};
