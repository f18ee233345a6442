use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::model::entity::{Assessment, Submission};

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AssessmentWithSubmissions {
    #[serde(flatten)]
    pub assessment: Assessment,
    pub submissions: Vec<Submission>,
}

impl AssessmentWithSubmissions {
    /// Attaches each submission to its assessment, keeping assessment order.
    pub fn group(assessments: Vec<Assessment>, submissions: Vec<Submission>) -> Vec<Self> {
        let mut by_assessment: HashMap<Uuid, Vec<Submission>> = HashMap::new();
        for submission in submissions {
            by_assessment
                .entry(submission.assessment_id())
                .or_default()
                .push(submission);
        }

        assessments
            .into_iter()
            .map(|assessment| Self {
                submissions: by_assessment.remove(&assessment.id()).unwrap_or_default(),
                assessment,
            })
            .collect()
    }
}
