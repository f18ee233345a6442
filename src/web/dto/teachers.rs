use serde::Serialize;

use crate::{
    analytics::{CourseInfo, progress::CompletionStats},
    model::entity::{
        Assessment, EnrolledStudentRow, TeacherCourseRow, TeacherEntity, UserEntity,
    },
};

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TeacherCourseOverview {
    #[serde(flatten)]
    pub course: TeacherCourseRow,
    pub assessments: Vec<Assessment>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TeacherDashboard {
    pub user: UserEntity,
    pub teacher: TeacherEntity,
    pub total_courses: usize,
    pub total_enrollments: i64,
    pub courses: Vec<TeacherCourseOverview>,
}

impl TeacherDashboard {
    pub fn new(user: UserEntity, teacher: TeacherEntity, courses: Vec<TeacherCourseOverview>) -> Self {
        Self {
            user,
            teacher,
            total_courses: courses.len(),
            total_enrollments: courses.iter().map(|c| c.course.enrollment_count).sum(),
            courses,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TeacherCourseWithStudents {
    #[serde(flatten)]
    pub course: TeacherCourseRow,
    pub students: Vec<EnrolledStudentRow>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct StudentProgress {
    #[serde(flatten)]
    pub student: EnrolledStudentRow,
    #[serde(flatten)]
    pub stats: CompletionStats,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ClassProgress {
    pub course: CourseInfo,
    pub students: Vec<StudentProgress>,
    /// Mean of the students' percentages, rounded half up; 0 for an empty class.
    pub average_progress: i64,
}

impl ClassProgress {
    pub fn new(course: CourseInfo, students: Vec<StudentProgress>) -> Self {
        let count = students.len() as i64;
        let average_progress = if count == 0 {
            0
        } else {
            let total: i64 = students.iter().map(|s| s.stats.progress_percentage).sum();
            (total * 2 + count) / (count * 2)
        };

        Self {
            course,
            students,
            average_progress,
        }
    }
}
