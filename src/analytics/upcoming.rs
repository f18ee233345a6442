use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const UPCOMING_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct AssessmentSnapshot {
    pub id: Uuid,
    pub course_id: Uuid,
    pub course_name: String,
    pub title: String,
    pub description: String,
    pub kind: String,
    pub total_marks: i32,
    pub weight: f64,
    pub due_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SubmissionRecord {
    pub assessment_id: Uuid,
    pub student_id: Uuid,
}

/// Assessments due strictly after `now` that `student_id` has not submitted,
/// soonest first, at most [`UPCOMING_LIMIT`].
pub fn select_upcoming(
    assessments: Vec<AssessmentSnapshot>,
    submissions: &[SubmissionRecord],
    student_id: Uuid,
    now: DateTime<Utc>,
) -> Vec<AssessmentSnapshot> {
    let submitted: HashSet<Uuid> = submissions
        .iter()
        .filter(|s| s.student_id == student_id)
        .map(|s| s.assessment_id)
        .collect();

    let mut upcoming: Vec<AssessmentSnapshot> = assessments
        .into_iter()
        .filter(|a| a.due_date > now && !submitted.contains(&a.id))
        .collect();

    upcoming.sort_by_key(|a| a.due_date);
    upcoming.truncate(UPCOMING_LIMIT);
    upcoming
}
