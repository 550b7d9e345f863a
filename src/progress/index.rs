use std::collections::HashMap;

use uuid::Uuid;

use crate::model::{ModelManager, StoreResult, entity::StudentProgress};

/// Progress records grouped by (student, course).
#[derive(Debug, Default)]
pub struct ProgressIndex {
    by_pair: HashMap<(Uuid, Uuid), Vec<StudentProgress>>,
}

impl ProgressIndex {
    pub fn build(records: impl IntoIterator<Item = StudentProgress>) -> Self {
        let mut by_pair: HashMap<(Uuid, Uuid), Vec<StudentProgress>> = HashMap::new();
        for record in records {
            by_pair
                .entry((record.student_id(), record.course_id()))
                .or_default()
                .push(record);
        }
        Self { by_pair }
    }

    pub async fn load(mm: &ModelManager) -> StoreResult<Self> {
        Ok(Self::build(mm.load::<StudentProgress>().await?))
    }

    pub fn get(&self, student_id: Uuid, course_id: Uuid) -> &[StudentProgress] {
        self.by_pair
            .get(&(student_id, course_id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
