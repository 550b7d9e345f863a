use std::collections::{HashMap, HashSet};

use serde::Serialize;
use uuid::Uuid;

use crate::model::entity::{
    Course, Enrollment, Lecture, LectureBody, LectureKind, StudentProgress, StudentProgressCreate,
};
use crate::model::{CrudRepository, ModelManager};
use crate::progress::{
    CourseProgress, ProgressError, ProgressIndex, ProgressResult, QuizAnswers, QuizOutcome,
    round_percent, score_quiz,
};

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizSubmission {
    pub outcome: QuizOutcome,
    /// Present only when the quiz was passed.
    pub progress: Option<StudentProgress>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub course: Course,
    pub completed_lectures: usize,
    pub total_lectures: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentOverview {
    pub courses: Vec<CourseSummary>,
    pub completed_lectures: usize,
    pub total_lectures: usize,
    pub overall_percentage: u8,
    pub completed_courses: usize,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstructorOverview {
    pub course_count: usize,
    pub lecture_count: usize,
    pub enrollment_count: usize,
}

/// Marks a reading lecture complete. Repeating it just refreshes the record.
#[tracing::instrument(skip(mm, lecture), fields(lecture_id = %lecture.id()))]
pub async fn complete_reading(
    mm: &ModelManager,
    student_id: Uuid,
    lecture: &Lecture,
) -> ProgressResult<StudentProgress> {
    if lecture.kind() != LectureKind::Reading {
        return Err(ProgressError::WrongLectureKind {
            expected: LectureKind::Reading,
            actual: lecture.kind(),
        });
    }

    let progress = StudentProgress::create(
        mm,
        StudentProgressCreate {
            student_id,
            course_id: lecture.course_id(),
            lecture_id: lecture.id(),
            score: None,
        },
    )
    .await?;

    tracing::debug!("reading completed");
    Ok(progress)
}

/// Scores a quiz submission and records it only when passed. A failed or
/// rejected submission leaves the store untouched.
#[tracing::instrument(skip(mm, lecture, answers), fields(lecture_id = %lecture.id()))]
pub async fn submit_quiz(
    mm: &ModelManager,
    student_id: Uuid,
    lecture: &Lecture,
    answers: &QuizAnswers,
) -> ProgressResult<QuizSubmission> {
    let LectureBody::Quiz { questions } = lecture.body() else {
        return Err(ProgressError::WrongLectureKind {
            expected: LectureKind::Quiz,
            actual: lecture.kind(),
        });
    };

    let outcome = score_quiz(questions, answers)?;
    tracing::debug!(score = outcome.score, passed = outcome.passed, "quiz scored");

    if !outcome.passed {
        return Ok(QuizSubmission {
            outcome,
            progress: None,
        });
    }

    let progress = StudentProgress::create(
        mm,
        StudentProgressCreate {
            student_id,
            course_id: lecture.course_id(),
            lecture_id: lecture.id(),
            score: Some(outcome.score),
        },
    )
    .await?;

    Ok(QuizSubmission {
        outcome,
        progress: Some(progress),
    })
}

#[tracing::instrument(skip(mm))]
pub async fn course_progress(
    mm: &ModelManager,
    student_id: Uuid,
    course_id: Uuid,
) -> ProgressResult<CourseProgress> {
    let lectures = Lecture::all_by_course(mm, course_id).await?;
    let index = ProgressIndex::load(mm).await?;
    Ok(CourseProgress::compute(
        course_id,
        &lectures,
        index.get(student_id, course_id),
    ))
}

/// Progress across every course the student is enrolled in. Enrollments
/// pointing to a missing course are skipped.
#[tracing::instrument(skip(mm))]
pub async fn student_overview(mm: &ModelManager, student_id: Uuid) -> ProgressResult<StudentOverview> {
    let enrollments = Enrollment::all_by_student(mm, student_id).await?;
    let courses: HashMap<Uuid, Course> = mm
        .load::<Course>()
        .await?
        .into_iter()
        .map(|c| (c.id(), c))
        .collect();
    let lectures = mm.load::<Lecture>().await?;
    let index = ProgressIndex::load(mm).await?;

    let summaries: Vec<CourseSummary> = enrollments
        .iter()
        .filter_map(|e| courses.get(&e.course_id()))
        .map(|course| {
            let ordered = Lecture::ordered_for_course(&lectures, course.id());
            let progress =
                CourseProgress::compute(course.id(), &ordered, index.get(student_id, course.id()));
            CourseSummary {
                course: course.clone(),
                completed_lectures: progress.completed(),
                total_lectures: progress.total(),
                percentage: progress.percentage(),
            }
        })
        .collect();

    let completed_lectures = summaries.iter().map(|s| s.completed_lectures).sum();
    let total_lectures = summaries.iter().map(|s| s.total_lectures).sum();
    let completed_courses = summaries
        .iter()
        .filter(|s| s.total_lectures > 0 && s.completed_lectures == s.total_lectures)
        .count();

    Ok(StudentOverview {
        courses: summaries,
        completed_lectures,
        total_lectures,
        overall_percentage: round_percent(completed_lectures, total_lectures),
        completed_courses,
    })
}

#[tracing::instrument(skip(mm))]
pub async fn instructor_overview(
    mm: &ModelManager,
    instructor_id: Uuid,
) -> ProgressResult<InstructorOverview> {
    let owned: HashSet<Uuid> = Course::all_by_instructor(mm, instructor_id)
        .await?
        .iter()
        .map(Course::id)
        .collect();

    let lecture_count = mm
        .load::<Lecture>()
        .await?
        .iter()
        .filter(|l| owned.contains(&l.course_id()))
        .count();
    let enrollment_count = mm
        .load::<Enrollment>()
        .await?
        .iter()
        .filter(|e| owned.contains(&e.course_id()))
        .count();

    Ok(InstructorOverview {
        course_count: owned.len(),
        lecture_count,
        enrollment_count,
    })
}
