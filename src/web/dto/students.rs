use serde::{Deserialize, Serialize};

use crate::{
    analytics::{pathway::GoalSnapshot, progress::EnrollmentSummary, upcoming::AssessmentSnapshot},
    model::entity::{StudentEntity, StudyPlan, StudySession, UserEntity},
};

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct StudentDashboard {
    pub user: UserEntity,
    pub student: StudentEntity,
    pub enrollments: Vec<EnrollmentSummary>,
    pub upcoming_assessments: Vec<AssessmentSnapshot>,
    pub upcoming_sessions: Vec<StudySession>,
    /// Goal with its subjects in goal order, `null` before one is set.
    pub university_goal: Option<GoalSnapshot>,
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct CompleteLessonBody {
    /// Minutes, 0 when omitted.
    pub time_spent: Option<i32>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct StudyPlanResponse {
    pub plan: StudyPlan,
    pub sessions: Vec<StudySession>,
}
