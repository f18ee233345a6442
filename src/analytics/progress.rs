//! Completion statistics derived from lesson progress rows.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analytics::records::{CourseInfo, EnrollmentSnapshot};

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LessonOutline {
    pub id: Uuid,
    pub title: String,
    pub order_index: i32,
    /// Expected duration in minutes
    pub duration: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ModuleOutline {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub order_index: i32,
    pub lessons: Vec<LessonOutline>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct ProgressRecord {
    pub lesson_id: Uuid,
    pub completed: bool,
    /// Minutes
    pub time_spent: i32,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CompletionStats {
    pub completed_lessons: i64,
    pub total_lessons: i64,
    pub progress_percentage: i64,
}

/// `round(100 * completed / total)`, rounding halves up. Zero lessons is 0%.
pub fn percentage(completed: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    let completed = completed.clamp(0, total);
    (completed * 200 + total) / (total * 2)
}

fn completion_of<'a, I>(lessons: I, progress: &[ProgressRecord]) -> CompletionStats
where
    I: IntoIterator<Item = &'a LessonOutline>,
{
    let lesson_ids: HashSet<Uuid> = lessons.into_iter().map(|l| l.id).collect();

    // rows pointing at lessons outside this outline are ignored
    let completed: HashSet<Uuid> = progress
        .iter()
        .filter(|p| p.completed && lesson_ids.contains(&p.lesson_id))
        .map(|p| p.lesson_id)
        .collect();

    let total_lessons = lesson_ids.len() as i64;
    let completed_lessons = completed.len() as i64;

    CompletionStats {
        completed_lessons,
        total_lessons,
        progress_percentage: percentage(completed_lessons, total_lessons),
    }
}

/// Completion across every lesson of every module in the course.
pub fn completion(modules: &[ModuleOutline], progress: &[ProgressRecord]) -> CompletionStats {
    completion_of(modules.iter().flat_map(|m| m.lessons.iter()), progress)
}

pub fn module_completion(module: &ModuleOutline, progress: &[ProgressRecord]) -> CompletionStats {
    completion_of(module.lessons.iter(), progress)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LessonStatus {
    pub completed: bool,
    pub time_spent: i32,
    pub completed_at: Option<DateTime<Utc>>,
}

pub fn lesson_status(lesson_id: Uuid, progress: &[ProgressRecord]) -> LessonStatus {
    progress
        .iter()
        .find(|p| p.lesson_id == lesson_id)
        .map(|p| LessonStatus {
            completed: p.completed,
            time_spent: p.time_spent,
            completed_at: p.completed_at,
        })
        .unwrap_or(LessonStatus {
            completed: false,
            time_spent: 0,
            completed_at: None,
        })
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EnrollmentSummary {
    pub enrollment_id: Uuid,
    pub course: CourseInfo,
    #[serde(flatten)]
    pub stats: CompletionStats,
}

pub fn summarize(snapshot: &EnrollmentSnapshot) -> EnrollmentSummary {
    EnrollmentSummary {
        enrollment_id: snapshot.enrollment_id,
        course: snapshot.course.clone(),
        stats: completion(&snapshot.modules, &snapshot.progress),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LessonBreakdown {
    #[serde(flatten)]
    pub lesson: LessonOutline,
    #[serde(flatten)]
    pub status: LessonStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ModuleBreakdown {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub order_index: i32,
    pub lessons: Vec<LessonBreakdown>,
    pub progress_percentage: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CourseBreakdown {
    pub enrollment_id: Uuid,
    pub course: CourseInfo,
    pub modules: Vec<ModuleBreakdown>,
    #[serde(flatten)]
    pub stats: CompletionStats,
}

/// Per-module and per-lesson view of one enrollment, modules and lessons in display order.
pub fn breakdown(snapshot: &EnrollmentSnapshot) -> CourseBreakdown {
    let mut modules = snapshot.modules.clone();
    modules.sort_by_key(|m| m.order_index);

    let modules = modules
        .into_iter()
        .map(|mut module| {
            module.lessons.sort_by_key(|l| l.order_index);
            let stats = module_completion(&module, &snapshot.progress);

            let lessons = module
                .lessons
                .into_iter()
                .map(|lesson| LessonBreakdown {
                    status: lesson_status(lesson.id, &snapshot.progress),
                    lesson,
                })
                .collect();

            ModuleBreakdown {
                id: module.id,
                title: module.title,
                description: module.description,
                order_index: module.order_index,
                lessons,
                progress_percentage: stats.progress_percentage,
            }
        })
        .collect();

    CourseBreakdown {
        enrollment_id: snapshot.enrollment_id,
        course: snapshot.course.clone(),
        modules,
        stats: completion(&snapshot.modules, &snapshot.progress),
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    pub fn outline(modules: usize, lessons_per_module: usize) -> Vec<ModuleOutline> {
        (0..modules)
            .map(|m| ModuleOutline {
                id: Uuid::new_v4(),
                title: format!("Module {}", m + 1),
                description: String::new(),
                order_index: m as i32 + 1,
                lessons: (0..lessons_per_module)
                    .map(|l| LessonOutline {
                        id: Uuid::new_v4(),
                        title: format!("Lesson {}", l + 1),
                        order_index: l as i32 + 1,
                        duration: 45,
                    })
                    .collect(),
            })
            .collect()
    }

    pub fn done(lesson_id: Uuid) -> ProgressRecord {
        ProgressRecord {
            lesson_id,
            completed: true,
            time_spent: 30,
            completed_at: Some(Utc::now()),
        }
    }

    fn lesson_ids(modules: &[ModuleOutline]) -> Vec<Uuid> {
        modules
            .iter()
            .flat_map(|m| m.lessons.iter().map(|l| l.id))
            .collect()
    }

    #[test]
    fn percentage_zero_total_test() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(3, 0), 0);
    }

    #[test]
    fn percentage_rounding_test() {
        assert_eq!(percentage(14, 20), 70);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13); // 12.5 rounds up
        assert_eq!(percentage(20, 20), 100);
    }

    #[test]
    fn percentage_bounds_test() {
        for total in 1..=40 {
            for completed in 0..=total {
                let p = percentage(completed, total);
                assert!((0..=100).contains(&p));
                let expected = (100.0 * completed as f64 / total as f64).round() as i64;
                assert_eq!(p, expected, "{completed}/{total}");
            }
        }
    }

    #[test]
    fn completion_counts_all_lessons_test() {
        let modules = outline(4, 5);
        let progress: Vec<_> = lesson_ids(&modules).into_iter().take(14).map(done).collect();

        let stats = completion(&modules, &progress);
        assert_eq!(
            stats,
            CompletionStats {
                completed_lessons: 14,
                total_lessons: 20,
                progress_percentage: 70,
            }
        );
    }

    #[test]
    fn completion_ignores_incomplete_and_stale_rows_test() {
        let modules = outline(1, 4);
        let ids = lesson_ids(&modules);
        let progress = vec![
            done(ids[0]),
            ProgressRecord {
                completed: false,
                ..done(ids[1])
            },
            done(Uuid::new_v4()), // lesson no longer in the course
        ];

        let stats = completion(&modules, &progress);
        assert_eq!(stats.completed_lessons, 1);
        assert_eq!(stats.total_lessons, 4);
        assert_eq!(stats.progress_percentage, 25);
    }

    #[test]
    fn completion_counts_duplicate_rows_once_test() {
        let modules = outline(1, 2);
        let ids = lesson_ids(&modules);
        let progress = vec![done(ids[0]), done(ids[0])];

        assert_eq!(completion(&modules, &progress).completed_lessons, 1);
    }

    #[test]
    fn completion_empty_course_test() {
        let stats = completion(&[], &[done(Uuid::new_v4())]);
        assert_eq!(stats.total_lessons, 0);
        assert_eq!(stats.completed_lessons, 0);
        assert_eq!(stats.progress_percentage, 0);
    }

    #[test]
    fn lesson_status_defaults_test() {
        let status = lesson_status(Uuid::new_v4(), &[]);
        assert!(!status.completed);
        assert_eq!(status.time_spent, 0);
        assert!(status.completed_at.is_none());
    }
}
