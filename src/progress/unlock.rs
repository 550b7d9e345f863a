use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::model::entity::{Lecture, LectureKind, StudentProgress};

/// Whether the lecture at `index` of an ordered course may be opened.
///
/// The first lecture is always open, every other one needs its immediate
/// predecessor completed.
pub fn is_accessible<F>(ordered: &[Lecture], index: usize, is_completed: F) -> bool
where
    F: Fn(Uuid) -> bool,
{
    if index >= ordered.len() {
        return false;
    }
    index == 0 || is_completed(ordered[index - 1].id())
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LectureState {
    pub lecture_id: Uuid,
    pub title: String,
    pub order: u32,
    pub kind: LectureKind,
    pub completed: bool,
    pub accessible: bool,
    pub score: Option<u8>,
}

/// Snapshot of one student's standing in one course.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseProgress {
    course_id: Uuid,
    lectures: Vec<LectureState>,
    completed: usize,
    total: usize,
    percentage: f64,
    next_lecture_id: Option<Uuid>,
}

impl CourseProgress {
    /// `ordered` must be the course's lectures sorted by order and `records`
    /// the progress of a single student in that course.
    pub fn compute(course_id: Uuid, ordered: &[Lecture], records: &[StudentProgress]) -> Self {
        let done: HashMap<Uuid, &StudentProgress> = records
            .iter()
            .filter(|p| p.completed())
            .map(|p| (p.lecture_id(), p))
            .collect();

        let lectures: Vec<LectureState> = ordered
            .iter()
            .enumerate()
            .map(|(idx, lecture)| {
                let record = done.get(&lecture.id());
                LectureState {
                    lecture_id: lecture.id(),
                    title: lecture.title().to_string(),
                    order: lecture.order(),
                    kind: lecture.kind(),
                    completed: record.is_some(),
                    accessible: is_accessible(ordered, idx, |id| done.contains_key(&id)),
                    score: record.and_then(|p| p.score()),
                }
            })
            .collect();

        let completed = lectures.iter().filter(|l| l.completed).count();
        let total = lectures.len();
        let percentage = if total > 0 {
            completed as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        let next_lecture_id = lectures
            .iter()
            .find(|l| l.accessible && !l.completed)
            .map(|l| l.lecture_id);

        Self {
            course_id,
            lectures,
            completed,
            total,
            percentage,
            next_lecture_id,
        }
    }

    pub fn lectures(&self) -> &[LectureState] {
        &self.lectures
    }

    pub fn lecture(&self, lecture_id: Uuid) -> Option<&LectureState> {
        self.lectures.iter().find(|l| l.lecture_id == lecture_id)
    }

    /// Unknown lectures are never accessible.
    pub fn can_access(&self, lecture_id: Uuid) -> bool {
        self.lecture(lecture_id).is_some_and(|l| l.accessible)
    }

    pub fn is_completed(&self, lecture_id: Uuid) -> bool {
        self.lecture(lecture_id).is_some_and(|l| l.completed)
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    pub fn is_finished(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }

    pub fn next_lecture_id(&self) -> Option<Uuid> {
        self.next_lecture_id
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::entity::{LectureCreate, StudentProgressCreate};
    use crate::model::{CrudRepository, ModelManager};

    async fn course_with_readings(mm: &ModelManager, n: usize) -> (Uuid, Vec<Lecture>) {
        let course_id = Uuid::new_v4();
        for i in 0..n {
            let data = LectureCreate::new(
                course_id,
                format!("Lecture {}", i + 1),
                LectureKind::Reading,
                Some(String::from("text")),
                None,
            );
            Lecture::create(mm, data).await.unwrap();
        }
        (course_id, Lecture::all_by_course(mm, course_id).await.unwrap())
    }

    async fn complete(mm: &ModelManager, student_id: Uuid, lecture: &Lecture) -> StudentProgress {
        StudentProgress::create(
            mm,
            StudentProgressCreate {
                student_id,
                course_id: lecture.course_id(),
                lecture_id: lecture.id(),
                score: None,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn first_lecture_open_without_progress() {
        let mm = ModelManager::in_memory();
        let (course_id, lectures) = course_with_readings(&mm, 3).await;

        let progress = CourseProgress::compute(course_id, &lectures, &[]);
        assert!(progress.can_access(lectures[0].id()));
        assert!(!progress.can_access(lectures[1].id()));
        assert!(!progress.can_access(lectures[2].id()));
        assert_eq!(progress.next_lecture_id(), Some(lectures[0].id()));
        assert_eq!(progress.percentage(), 0.0);
    }

    #[tokio::test]
    async fn completing_first_unlocks_only_second() {
        let mm = ModelManager::in_memory();
        let student = Uuid::new_v4();
        let (course_id, lectures) = course_with_readings(&mm, 3).await;
        let records = vec![complete(&mm, student, &lectures[0]).await];

        let progress = CourseProgress::compute(course_id, &lectures, &records);
        assert!(progress.can_access(lectures[1].id()));
        assert!(!progress.can_access(lectures[2].id()));
        assert!(progress.is_completed(lectures[0].id()));
        assert_eq!(progress.next_lecture_id(), Some(lectures[1].id()));
        assert_eq!(progress.completed(), 1);
    }

    #[tokio::test]
    async fn unlock_needs_the_immediate_predecessor() {
        let mm = ModelManager::in_memory();
        let student = Uuid::new_v4();
        let (course_id, lectures) = course_with_readings(&mm, 3).await;
        // only the second lecture done: third opens, second itself stays locked
        let records = vec![complete(&mm, student, &lectures[1]).await];

        let progress = CourseProgress::compute(course_id, &lectures, &records);
        assert!(!progress.can_access(lectures[1].id()));
        assert!(progress.can_access(lectures[2].id()));
        assert_eq!(progress.next_lecture_id(), Some(lectures[0].id()));
    }

    #[tokio::test]
    async fn percentage_grows_with_completions() {
        let mm = ModelManager::in_memory();
        let student = Uuid::new_v4();
        let (course_id, lectures) = course_with_readings(&mm, 4).await;

        let mut records = Vec::new();
        let mut last = CourseProgress::compute(course_id, &lectures, &records).percentage();
        for lecture in &lectures {
            records.push(complete(&mm, student, lecture).await);
            let now = CourseProgress::compute(course_id, &lectures, &records);
            assert!(now.percentage() > last);
            last = now.percentage();
        }

        assert_eq!(last, 100.0);
        let done = CourseProgress::compute(course_id, &lectures, &records);
        assert!(done.is_finished());
        assert_eq!(done.next_lecture_id(), None);
    }

    #[test]
    fn empty_course_is_zero_percent() {
        let progress = CourseProgress::compute(Uuid::new_v4(), &[], &[]);
        assert_eq!(progress.percentage(), 0.0);
        assert!(!progress.is_finished());
        assert!(!progress.can_access(Uuid::new_v4()));
    }

    #[test]
    fn out_of_range_index_is_locked() {
        assert!(!is_accessible(&[], 0, |_| true));
    }
}
