use serde::Serialize;

use crate::analytics::universities::UniversityOption;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UniversityOptionResponse {
    pub name: String,
    pub min_atar: f64,
    pub disciplines: Vec<String>,
}

impl From<&UniversityOption> for UniversityOptionResponse {
    fn from(value: &UniversityOption) -> Self {
        Self {
            name: value.name.to_string(),
            min_atar: value.min_atar,
            disciplines: value.disciplines.iter().map(|d| d.to_string()).collect(),
        }
    }
}
