//! Postgres side of [`StudentRecords`].

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgConnection, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    analytics::{
        EnrollmentSnapshot, PathwayInputs, StudentRecords,
        pathway::{EnrolledSubject, GoalSnapshot},
        progress::ModuleOutline,
        upcoming::{AssessmentSnapshot, SubmissionRecord},
    },
    model::{
        ModelManager,
        entity::{
            EnrollmentCourseRow, EnrollmentProgressRow, ModuleWithLessonsRow, UniversityGoal,
            UniversitySubject,
        },
        error::DatabaseResult,
    },
};

impl ModelManager {
    /// Read-only transaction that sees one snapshot for all of its statements,
    /// so a concurrent write never shows up in only half of the reads.
    async fn begin_snapshot(&self) -> DatabaseResult<Transaction<'static, Postgres>> {
        let mut tx = self.executor().begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }
}

/// Attaches outlines and progress rows to the given enrollments.
async fn load_snapshots(
    conn: &mut PgConnection,
    enrollments: Vec<EnrollmentCourseRow>,
) -> DatabaseResult<Vec<EnrollmentSnapshot>> {
    if enrollments.is_empty() {
        return Ok(Vec::new());
    }

    let mut course_ids: Vec<Uuid> = enrollments.iter().map(|e| e.course.id).collect();
    course_ids.sort_unstable();
    course_ids.dedup();
    let enrollment_ids: Vec<Uuid> = enrollments.iter().map(|e| e.enrollment_id).collect();

    let modules = ModuleWithLessonsRow::fetch_by_courses(&mut *conn, &course_ids).await?;
    let progress = EnrollmentProgressRow::fetch_by_enrollments(&mut *conn, &enrollment_ids).await?;

    let mut modules_by_course: HashMap<Uuid, Vec<ModuleOutline>> = HashMap::new();
    for row in modules {
        let course_id = row.course_id;
        modules_by_course
            .entry(course_id)
            .or_default()
            .push(ModuleOutline::try_from(row)?);
    }

    let mut progress_by_enrollment = HashMap::<Uuid, Vec<_>>::new();
    for row in progress {
        progress_by_enrollment
            .entry(row.enrollment_id)
            .or_default()
            .push(row.record);
    }

    Ok(enrollments
        .into_iter()
        .map(|e| EnrollmentSnapshot {
            modules: modules_by_course.get(&e.course.id).cloned().unwrap_or_default(),
            progress: progress_by_enrollment
                .remove(&e.enrollment_id)
                .unwrap_or_default(),
            enrollment_id: e.enrollment_id,
            student_id: e.student_id,
            course: e.course,
        })
        .collect())
}

async fn fetch_enrolled_subjects(
    conn: &mut PgConnection,
    student_id: Uuid,
) -> DatabaseResult<Vec<EnrolledSubject>> {
    let rows = sqlx::query_as(
        r#"
        SELECT c.id AS course_id, c.subject
        FROM enrollments e
        JOIN courses c ON c.id = e.course_id
        WHERE e.student_id = $1
        ORDER BY e.enrolled_at, e.id
        "#,
    )
    .bind(student_id)
    .fetch_all(conn)
    .await?;

    Ok(rows)
}

async fn fetch_goal(
    conn: &mut PgConnection,
    student_id: Uuid,
) -> DatabaseResult<Option<GoalSnapshot>> {
    let Some(goal) = UniversityGoal::find_by_student(&mut *conn, student_id).await? else {
        return Ok(None);
    };

    let subjects = UniversitySubject::required_by_goal(&mut *conn, goal.id()).await?;

    Ok(Some(GoalSnapshot {
        id: goal.id(),
        university: goal.university().to_string(),
        degree: goal.degree().to_string(),
        discipline: goal.discipline().to_string(),
        required_atar: goal.required_atar(),
        subjects,
    }))
}

#[async_trait]
impl StudentRecords for ModelManager {
    async fn enrollments(&self, student_id: Uuid) -> DatabaseResult<Vec<EnrollmentSnapshot>> {
        let mut tx = self.begin_snapshot().await?;
        let enrollments = EnrollmentCourseRow::fetch_by_student(&mut *tx, student_id).await?;
        let snapshots = load_snapshots(&mut tx, enrollments).await?;
        tx.commit().await?;
        Ok(snapshots)
    }

    async fn course_enrollments(
        &self,
        course_id: Uuid,
    ) -> DatabaseResult<Vec<EnrollmentSnapshot>> {
        let mut tx = self.begin_snapshot().await?;
        let enrollments = EnrollmentCourseRow::fetch_by_course(&mut *tx, course_id).await?;
        let snapshots = load_snapshots(&mut tx, enrollments).await?;
        tx.commit().await?;
        Ok(snapshots)
    }

    async fn enrolled_subjects(&self, student_id: Uuid) -> DatabaseResult<Vec<EnrolledSubject>> {
        let mut conn = self.executor().acquire().await?;
        fetch_enrolled_subjects(&mut conn, student_id).await
    }

    async fn university_goal(&self, student_id: Uuid) -> DatabaseResult<Option<GoalSnapshot>> {
        let mut tx = self.begin_snapshot().await?;
        let goal = fetch_goal(&mut tx, student_id).await?;
        tx.commit().await?;
        Ok(goal)
    }

    async fn pathway_inputs(&self, student_id: Uuid) -> DatabaseResult<Option<PathwayInputs>> {
        let mut tx = self.begin_snapshot().await?;
        let Some(goal) = fetch_goal(&mut tx, student_id).await? else {
            tx.commit().await?;
            return Ok(None);
        };
        let enrolled = fetch_enrolled_subjects(&mut tx, student_id).await?;
        tx.commit().await?;
        Ok(Some(PathwayInputs { goal, enrolled }))
    }

    async fn assessments(&self, student_id: Uuid) -> DatabaseResult<Vec<AssessmentSnapshot>> {
        let rows = sqlx::query_as(
            r#"
            SELECT
                a.id,
                a.course_id,
                c.name AS course_name,
                a.title,
                a.description,
                a.kind,
                a.total_marks,
                a.weight,
                a.due_date
            FROM assessments a
            JOIN courses c ON c.id = a.course_id
            WHERE EXISTS (
                SELECT 1 FROM enrollments e
                WHERE e.course_id = a.course_id AND e.student_id = $1
            )
            ORDER BY a.due_date, a.id
            "#,
        )
        .bind(student_id)
        .fetch_all(self.executor())
        .await?;

        Ok(rows)
    }

    async fn submissions(&self, student_id: Uuid) -> DatabaseResult<Vec<SubmissionRecord>> {
        let rows = sqlx::query_as(
            "SELECT assessment_id, student_id FROM submissions WHERE student_id = $1",
        )
        .bind(student_id)
        .fetch_all(self.executor())
        .await?;

        Ok(rows)
    }
}
