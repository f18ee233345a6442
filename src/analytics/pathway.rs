//! University pathway matching: a student's goal subjects against their enrollments.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analytics::curriculum::SubjectCode;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct RequiredSubject {
    pub subject_code: String,
    pub subject_name: String,
    pub is_prerequisite: bool,
    pub recommended_mark: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct GoalSnapshot {
    pub id: Uuid,
    pub university: String,
    pub degree: String,
    pub discipline: String,
    pub required_atar: f64,
    /// In goal order
    pub subjects: Vec<RequiredSubject>,
}

/// The subject of one enrolled course.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EnrolledSubject {
    pub course_id: Uuid,
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SubjectFit {
    pub subject_code: String,
    pub subject_name: String,
    pub is_prerequisite: bool,
    pub recommended_mark: f64,
    pub enrolled: bool,
    pub course_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PathwayReport {
    pub goal_id: Uuid,
    pub university: String,
    pub degree: String,
    pub discipline: String,
    pub required_atar: f64,
    pub subject_progress: Vec<SubjectFit>,
    /// True when every prerequisite subject is enrolled
    pub prerequisites_met: bool,
    pub current_atar: Option<f64>,
}

/// Builds one [`SubjectFit`] per goal subject.
///
/// A subject counts as enrolled when an enrolled course has exactly the same
/// subject code (case-sensitive). The first matching enrollment supplies the
/// course id.
pub fn match_pathway(
    goal: &GoalSnapshot,
    enrolled: &[EnrolledSubject],
    current_atar: Option<f64>,
) -> PathwayReport {
    let subject_progress: Vec<SubjectFit> = goal
        .subjects
        .iter()
        .map(|required| {
            if SubjectCode::from_str(&required.subject_code).is_err() {
                tracing::warn!(
                    goal_id = %goal.id,
                    subject_code = %required.subject_code,
                    "goal subject code is not a known subject, matching by raw code"
                );
            }

            let course_id = enrolled
                .iter()
                .find(|e| e.subject == required.subject_code)
                .map(|e| e.course_id);

            SubjectFit {
                subject_code: required.subject_code.clone(),
                subject_name: required.subject_name.clone(),
                is_prerequisite: required.is_prerequisite,
                recommended_mark: required.recommended_mark,
                enrolled: course_id.is_some(),
                course_id,
            }
        })
        .collect();

    let prerequisites_met = subject_progress
        .iter()
        .filter(|s| s.is_prerequisite)
        .all(|s| s.enrolled);

    PathwayReport {
        goal_id: goal.id,
        university: goal.university.clone(),
        degree: goal.degree.clone(),
        discipline: goal.discipline.clone(),
        required_atar: goal.required_atar,
        subject_progress,
        prerequisites_met,
        current_atar,
    }
}
