use serde::Serialize;

use crate::progress::{InstructorOverview, StudentOverview};

/// Dashboard payload, shaped by the caller's role.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum OverviewResponse {
    Student(StudentOverview),
    Instructor(InstructorOverview),
}
