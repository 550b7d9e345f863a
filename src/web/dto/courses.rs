use serde::Deserialize;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CourseCreateBody {
    pub title: String,
    pub description: String,
}

impl CourseCreateBody {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("course title is required");
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CourseSearchQuery {
    /// Matched against title, description and instructor name
    pub q: Option<String>,
}
