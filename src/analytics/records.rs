//! Read interface the aggregators pull their inputs through, plus the
//! request-level operations built on top of it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    analytics::{
        pathway::{EnrolledSubject, GoalSnapshot, PathwayReport, match_pathway},
        progress::{
            CompletionStats, CourseBreakdown, EnrollmentSummary, ModuleOutline, ProgressRecord,
            breakdown, completion, summarize,
        },
        upcoming::{AssessmentSnapshot, SubmissionRecord, select_upcoming},
    },
    model::DatabaseResult,
};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct CourseInfo {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub description: String,
    pub year_level: String,
    pub subject: String,
    pub units: i32,
    pub teacher_id: Uuid,
    pub teacher_name: String,
}

/// One enrollment with everything needed to aggregate its progress.
#[derive(Debug, Clone)]
pub struct EnrollmentSnapshot {
    pub enrollment_id: Uuid,
    pub student_id: Uuid,
    pub course: CourseInfo,
    pub modules: Vec<ModuleOutline>,
    pub progress: Vec<ProgressRecord>,
}

/// A goal together with the enrollments it is matched against.
#[derive(Debug, Clone)]
pub struct PathwayInputs {
    pub goal: GoalSnapshot,
    pub enrolled: Vec<EnrolledSubject>,
}

/// Profile store and enrollment ledger reads, keyed by student profile id.
#[async_trait::async_trait]
pub trait StudentRecords: Send + Sync {
    /// Enrollments in enrollment order, each with its course outline and progress rows.
    async fn enrollments(&self, student_id: Uuid) -> DatabaseResult<Vec<EnrollmentSnapshot>>;

    /// Every enrollment of one course, in enrollment order.
    async fn course_enrollments(&self, course_id: Uuid)
    -> DatabaseResult<Vec<EnrollmentSnapshot>>;

    /// Course subjects of the student's enrollments, in enrollment order.
    async fn enrolled_subjects(&self, student_id: Uuid) -> DatabaseResult<Vec<EnrolledSubject>>;

    async fn university_goal(&self, student_id: Uuid) -> DatabaseResult<Option<GoalSnapshot>>;

    /// `None` when the student has no goal. Stores that can read both halves
    /// from one snapshot should override this.
    async fn pathway_inputs(&self, student_id: Uuid) -> DatabaseResult<Option<PathwayInputs>> {
        let Some(goal) = self.university_goal(student_id).await? else {
            return Ok(None);
        };
        let enrolled = self.enrolled_subjects(student_id).await?;
        Ok(Some(PathwayInputs { goal, enrolled }))
    }

    /// Assessments of every course the student is enrolled in.
    async fn assessments(&self, student_id: Uuid) -> DatabaseResult<Vec<AssessmentSnapshot>>;

    async fn submissions(&self, student_id: Uuid) -> DatabaseResult<Vec<SubmissionRecord>>;
}

#[tracing::instrument(skip(records))]
pub async fn enrollment_summaries<R: StudentRecords + ?Sized>(
    records: &R,
    student_id: Uuid,
) -> DatabaseResult<Vec<EnrollmentSummary>> {
    let enrollments = records.enrollments(student_id).await?;
    Ok(enrollments.iter().map(summarize).collect())
}

/// `None` when the student is not enrolled in `course_id`.
#[tracing::instrument(skip(records))]
pub async fn course_breakdown<R: StudentRecords + ?Sized>(
    records: &R,
    student_id: Uuid,
    course_id: Uuid,
) -> DatabaseResult<Option<CourseBreakdown>> {
    let enrollments = records.enrollments(student_id).await?;
    Ok(enrollments
        .iter()
        .find(|e| e.course.id == course_id)
        .map(breakdown))
}

/// Completion of every student enrolled in `course_id`, keyed by student id.
#[tracing::instrument(skip(records))]
pub async fn class_completion<R: StudentRecords + ?Sized>(
    records: &R,
    course_id: Uuid,
) -> DatabaseResult<HashMap<Uuid, CompletionStats>> {
    let enrollments = records.course_enrollments(course_id).await?;
    Ok(enrollments
        .iter()
        .map(|e| (e.student_id, completion(&e.modules, &e.progress)))
        .collect())
}

/// `None` when the student has no university goal.
#[tracing::instrument(skip(records))]
pub async fn pathway_report<R: StudentRecords + ?Sized>(
    records: &R,
    student_id: Uuid,
    current_atar: Option<f64>,
) -> DatabaseResult<Option<PathwayReport>> {
    let Some(inputs) = records.pathway_inputs(student_id).await? else {
        return Ok(None);
    };

    Ok(Some(match_pathway(
        &inputs.goal,
        &inputs.enrolled,
        current_atar,
    )))
}

#[tracing::instrument(skip(records))]
pub async fn upcoming_assessments<R: StudentRecords + ?Sized>(
    records: &R,
    student_id: Uuid,
    now: DateTime<Utc>,
) -> DatabaseResult<Vec<AssessmentSnapshot>> {
    let assessments = records.assessments(student_id).await?;
    let submissions = records.submissions(student_id).await?;
    Ok(select_upcoming(assessments, &submissions, student_id, now))
}

#[cfg(test)]
mod test {
    use chrono::Duration;

    use super::*;
    use crate::analytics::{
        pathway::test::engineering_goal,
        progress::test::{done, outline},
        upcoming::test::assessment,
    };

    #[derive(Default)]
    struct InMemoryRecords {
        enrollments: HashMap<Uuid, Vec<EnrollmentSnapshot>>,
        goals: HashMap<Uuid, GoalSnapshot>,
        assessments: HashMap<Uuid, Vec<AssessmentSnapshot>>,
        submissions: Vec<SubmissionRecord>,
    }

    #[async_trait::async_trait]
    impl StudentRecords for InMemoryRecords {
        async fn enrollments(&self, student_id: Uuid) -> DatabaseResult<Vec<EnrollmentSnapshot>> {
            Ok(self.enrollments.get(&student_id).cloned().unwrap_or_default())
        }

        async fn course_enrollments(
            &self,
            course_id: Uuid,
        ) -> DatabaseResult<Vec<EnrollmentSnapshot>> {
            Ok(self
                .enrollments
                .values()
                .flatten()
                .filter(|e| e.course.id == course_id)
                .cloned()
                .collect())
        }

        async fn enrolled_subjects(
            &self,
            student_id: Uuid,
        ) -> DatabaseResult<Vec<EnrolledSubject>> {
            let enrollments = self.enrollments(student_id).await?;
            Ok(enrollments
                .into_iter()
                .map(|e| EnrolledSubject {
                    course_id: e.course.id,
                    subject: e.course.subject,
                })
                .collect())
        }

        async fn university_goal(&self, student_id: Uuid) -> DatabaseResult<Option<GoalSnapshot>> {
            Ok(self.goals.get(&student_id).cloned())
        }

        async fn assessments(&self, student_id: Uuid) -> DatabaseResult<Vec<AssessmentSnapshot>> {
            Ok(self.assessments.get(&student_id).cloned().unwrap_or_default())
        }

        async fn submissions(&self, student_id: Uuid) -> DatabaseResult<Vec<SubmissionRecord>> {
            Ok(self
                .submissions
                .iter()
                .filter(|s| s.student_id == student_id)
                .cloned()
                .collect())
        }
    }

    fn course(subject: &str) -> CourseInfo {
        CourseInfo {
            id: Uuid::new_v4(),
            code: format!("{subject}_YEAR_11"),
            name: format!("{} - YEAR 11", subject.replace('_', " ")),
            description: String::new(),
            year_level: "YEAR_11".into(),
            subject: subject.to_string(),
            units: 4,
            teacher_id: Uuid::new_v4(),
            teacher_name: "Dr. Sarah Chen".into(),
        }
    }

    fn enrollment(subject: &str, modules: usize, lessons: usize, completed: usize) -> EnrollmentSnapshot {
        let modules = outline(modules, lessons);
        let progress = modules
            .iter()
            .flat_map(|m| m.lessons.iter().map(|l| l.id))
            .take(completed)
            .map(done)
            .collect();

        EnrollmentSnapshot {
            enrollment_id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            course: course(subject),
            modules,
            progress,
        }
    }

    #[tokio::test]
    async fn enrollment_summaries_test() {
        let student = Uuid::new_v4();
        let mut records = InMemoryRecords::default();
        records.enrollments.insert(
            student,
            vec![
                enrollment("PHYSICS", 4, 5, 14),
                enrollment("CHEMISTRY", 0, 0, 0),
            ],
        );

        let summaries = enrollment_summaries(&records, student).await.unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].stats.progress_percentage, 70);
        assert_eq!(summaries[0].course.subject, "PHYSICS");
        assert_eq!(summaries[1].stats.total_lessons, 0);
        assert_eq!(summaries[1].stats.progress_percentage, 0);

        // progress changes are visible on the next call
        let extra = records.enrollments.get_mut(&student).unwrap();
        let next_lesson = extra[0].modules[3].lessons[4].id;
        extra[0].progress.push(done(next_lesson));
        let summaries = enrollment_summaries(&records, student).await.unwrap();
        assert_eq!(summaries[0].stats.completed_lessons, 15);
        assert_eq!(summaries[0].stats.progress_percentage, 75);
    }

    #[tokio::test]
    async fn course_breakdown_test() {
        let student = Uuid::new_v4();
        let physics = enrollment("PHYSICS", 2, 3, 4);
        let course_id = physics.course.id;
        let mut records = InMemoryRecords::default();
        records.enrollments.insert(student, vec![physics]);

        let found = course_breakdown(&records, student, course_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.modules.len(), 2);
        assert_eq!(found.modules[0].progress_percentage, 100);
        assert_eq!(found.modules[1].progress_percentage, 33);
        assert!(found.modules[1].lessons[0].status.completed);
        assert!(!found.modules[1].lessons[1].status.completed);
        assert_eq!(found.stats.progress_percentage, 67);

        let missing = course_breakdown(&records, student, Uuid::new_v4())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn class_completion_test() {
        let ava = Uuid::new_v4();
        let ben = Uuid::new_v4();
        let physics = enrollment("PHYSICS", 1, 4, 2);
        let course_id = physics.course.id;

        let mut ben_physics = physics.clone();
        ben_physics.enrollment_id = Uuid::new_v4();
        ben_physics.student_id = ben;
        ben_physics.progress.truncate(1);

        let mut ava_physics = physics;
        ava_physics.student_id = ava;

        // other courses never leak into the class
        let mut ben_chemistry = enrollment("CHEMISTRY", 1, 1, 1);
        ben_chemistry.student_id = ben;

        let mut records = InMemoryRecords::default();
        records.enrollments.insert(ava, vec![ava_physics]);
        records
            .enrollments
            .insert(ben, vec![ben_chemistry, ben_physics]);

        let class = class_completion(&records, course_id).await.unwrap();
        assert_eq!(class.len(), 2);
        assert_eq!(class[&ava].completed_lessons, 2);
        assert_eq!(class[&ava].progress_percentage, 50);
        assert_eq!(class[&ben].completed_lessons, 1);
        assert_eq!(class[&ben].progress_percentage, 25);

        assert!(class_completion(&records, Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn pathway_report_test() {
        let student = Uuid::new_v4();
        let mut records = InMemoryRecords::default();
        records.enrollments.insert(
            student,
            vec![
                enrollment("MATHEMATICS_EXTENSION_1", 1, 1, 0),
                enrollment("ENGLISH_STANDARD", 1, 1, 0),
            ],
        );

        // no goal yet
        assert!(pathway_report(&records, student, None).await.unwrap().is_none());

        records.goals.insert(student, engineering_goal());
        let report = pathway_report(&records, student, Some(88.0))
            .await
            .unwrap()
            .unwrap();

        let enrolled: Vec<_> = report.subject_progress.iter().map(|s| s.enrolled).collect();
        assert_eq!(enrolled, [true, false, true]);
        assert_eq!(report.current_atar, Some(88.0));
    }

    #[tokio::test]
    async fn upcoming_assessments_test() {
        let student = Uuid::new_v4();
        let now = Utc::now();
        let mut records = InMemoryRecords::default();
        let weeks: Vec<_> = (1..=6)
            .map(|w| assessment(&format!("week {w}"), now + Duration::weeks(w)))
            .collect();
        records.submissions.push(SubmissionRecord {
            assessment_id: weeks[0].id,
            student_id: student,
        });
        records.assessments.insert(student, weeks);

        let upcoming = upcoming_assessments(&records, student, now).await.unwrap();
        let titles: Vec<_> = upcoming.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["week 2", "week 3", "week 4", "week 5", "week 6"]);
    }
}
