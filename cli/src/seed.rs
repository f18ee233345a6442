//! Deterministic demo dataset. Every choice is derived from the student index, so
//! two runs over an empty database produce the same school.

use std::fmt;

use chrono::{Duration, Utc};
use learned::analytics::universities::{UNIVERSITIES, discipline_requirements};
use learned::analytics::{SubjectCode, YearLevel};
use learned::error::AppResult;
use learned::model::entity::{
    Assessment, AssessmentCreate, AssessmentKind, Course, CourseCreate, Enrollment,
    EnrollmentCreate, Lesson, LessonCreate, LessonProgress, LessonProgressCreate, Module,
    ModuleCreate, StudentCreate, StudentEntity, StudyPlan, StudyPlanCreate, StudySession,
    StudySessionCreate, TeacherCreate, TeacherEntity, UniversityGoal, UniversityGoalCreate,
    UniversitySubject, UniversitySubjectCreate, UserEntity, UserEntityCreate,
};
use learned::model::{CrudRepository, DatabaseError, ModelManager};
use learned::web::{AuthenticatedUser, UserRole};

const TEACHER_PASSWORD: &str = "teacher123";
const STUDENT_PASSWORD: &str = "student123";

const MODULES_PER_COURSE: i32 = 4;
const LESSONS_PER_MODULE: i32 = 5;
const COURSES_PER_STUDENT: usize = 6;
const ASSESSMENTS_PER_COURSE: i64 = 3;
const SESSION_DAYS: i64 = 14;

const FIRST_NAMES: &[&str] = &[
    "Alexander", "Emily", "William", "Olivia", "James", "Charlotte", "Benjamin", "Ava", "Lucas",
    "Sophia", "Henry", "Isabella", "Theodore", "Mia", "Oliver", "Amelia", "Ethan", "Harper",
    "Jacob", "Evelyn",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Brown", "Taylor", "Anderson", "Thomas", "Jackson", "White", "Harris",
    "Martin", "Thompson", "Garcia", "Martinez", "Robinson", "Clark", "Rodriguez", "Lewis", "Lee",
    "Walker", "Hall",
];

struct SeedTeacher {
    name: &'static str,
    department: &'static str,
    specialties: &'static [SubjectCode],
}

const TEACHERS: &[SeedTeacher] = {
    use SubjectCode::*;
    &[
        SeedTeacher {
            name: "Dr. Sarah Chen",
            department: "Mathematics",
            specialties: &[MathematicsAdvanced, MathematicsExtension1, MathematicsExtension2],
        },
        SeedTeacher {
            name: "Mr. David Thompson",
            department: "Mathematics",
            specialties: &[MathematicsStandard, MathematicsAdvanced],
        },
        SeedTeacher {
            name: "Ms. Rebecca Williams",
            department: "Science",
            specialties: &[Chemistry, Biology],
        },
        SeedTeacher {
            name: "Dr. Michael Johnson",
            department: "Science",
            specialties: &[Physics, Chemistry],
        },
        SeedTeacher {
            name: "Ms. Jennifer Clarke",
            department: "Science",
            specialties: &[Biology],
        },
        SeedTeacher {
            name: "Mr. Robert Anderson",
            department: "English",
            specialties: &[EnglishAdvanced, EnglishExtension1, EnglishExtension2],
        },
        SeedTeacher {
            name: "Ms. Lisa Martinez",
            department: "English",
            specialties: &[EnglishStandard, EnglishAdvanced],
        },
        SeedTeacher {
            name: "Dr. Andrew Wilson",
            department: "Humanities",
            specialties: &[ModernHistory, AncientHistory, Geography],
        },
        SeedTeacher {
            name: "Ms. Patricia Taylor",
            department: "Commerce",
            specialties: &[Economics, BusinessStudies, VisualArts],
        },
        SeedTeacher {
            name: "Mr. Christopher Lee",
            department: "Technology",
            specialties: &[InformationProcessesTechnology, SoftwareDesignDevelopment],
        },
    ]
};

#[derive(Debug, Default)]
pub struct SeedSummary {
    teachers: usize,
    students: usize,
    courses: usize,
    enrollments: usize,
    assessments: usize,
}

impl fmt::Display for SeedSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Database seeded:")?;
        writeln!(f, "  {} teachers (password: {TEACHER_PASSWORD})", self.teachers)?;
        writeln!(f, "  {} students (password: {STUDENT_PASSWORD})", self.students)?;
        writeln!(f, "  {} courses", self.courses)?;
        writeln!(f, "  {} enrollments", self.enrollments)?;
        write!(f, "  {} assessments", self.assessments)
    }
}

pub async fn reset(mm: &ModelManager) -> AppResult<()> {
    sqlx::query(
        r#"
        TRUNCATE
            submissions, assessments, study_sessions, study_plans, lesson_progress,
            enrollments, lessons, modules, courses, university_subjects, university_goals,
            students, teachers, users
        CASCADE
        "#,
    )
    .execute(mm.executor())
    .await
    .map_err(DatabaseError::from)?;
    Ok(())
}

/// Lowercases and strips everything but letters, `Dr. Sarah Chen` -> `drsarahchen`.
fn email_local(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

pub async fn run(mm: &ModelManager, student_count: usize) -> AppResult<SeedSummary> {
    let actor = AuthenticatedUser::admin();
    let mut summary = SeedSummary::default();

    let teacher_hash = learned::auth::hash_password(TEACHER_PASSWORD)?;
    let student_hash = learned::auth::hash_password(STUDENT_PASSWORD)?;

    let mut teachers: Vec<(TeacherEntity, &'static [SubjectCode])> = Vec::new();
    for seed in TEACHERS {
        let user = UserEntity::create(
            mm,
            &actor,
            UserEntityCreate {
                email: format!("{}@learned.edu.au", email_local(seed.name)),
                name: seed.name.to_string(),
                password_hash: teacher_hash.clone(),
                role: UserRole::Teacher,
            },
        )
        .await?;
        let teacher = TeacherEntity::create(
            mm,
            &actor,
            TeacherCreate {
                user_id: user.id(),
                department: seed.department.to_string(),
                specialties: seed.specialties.to_vec(),
            },
        )
        .await?;
        teachers.push((teacher, seed.specialties));
    }
    summary.teachers = teachers.len();

    // (course, lessons in display order)
    let mut courses: Vec<(Course, Vec<Lesson>)> = Vec::new();
    for subject in SubjectCode::ALL {
        let Some((teacher, _)) = teachers
            .iter()
            .find(|(_, specialties)| specialties.contains(&subject))
            .or(teachers.first())
        else {
            continue;
        };

        for year_level in YearLevel::ALL {
            let course = Course::create(
                mm,
                &actor,
                CourseCreate {
                    code: format!("{}_{}", subject.as_str(), year_level.as_str()),
                    name: format!("{} - {}", subject.display_name(), year_level.display_name()),
                    description: format!(
                        "Comprehensive {} course for {} students preparing for university entrance.",
                        subject.display_name().to_lowercase(),
                        year_level.display_name()
                    ),
                    year_level,
                    subject,
                    units: subject.units(),
                    teacher_id: teacher.id(),
                },
            )
            .await?;

            let lessons = seed_course_content(mm, &actor, &course, subject).await?;
            courses.push((course, lessons));
        }
    }
    summary.courses = courses.len();

    let now = Utc::now();
    for (course, _) in &courses {
        for week in 1..=ASSESSMENTS_PER_COURSE {
            let kind = AssessmentKind::ALL[(week as usize - 1) % AssessmentKind::ALL.len()];
            Assessment::create(
                mm,
                &actor,
                AssessmentCreate {
                    course_id: course.id(),
                    teacher_id: course.teacher_id(),
                    title: format!("{kind} {week} - {}", course.name()),
                    description: format!(
                        "Assessment covering key concepts from the first {week} modules"
                    ),
                    kind,
                    total_marks: 100,
                    weight: 25.0 + week as f64 * 2.5,
                    due_date: now + Duration::weeks(week),
                },
            )
            .await?;
            summary.assessments += 1;
        }
    }

    let half = student_count.div_ceil(2);
    for i in 0..student_count {
        let year_level = if i < half {
            YearLevel::Year11
        } else {
            YearLevel::Year12
        };
        let first = FIRST_NAMES[i % FIRST_NAMES.len()];
        let last = LAST_NAMES[(i * 7) % LAST_NAMES.len()];

        let user = UserEntity::create(
            mm,
            &actor,
            UserEntityCreate {
                email: format!(
                    "{}.{}{}@student.learned.edu.au",
                    first.to_lowercase(),
                    last.to_lowercase(),
                    i + 1
                ),
                name: format!("{first} {last}"),
                password_hash: student_hash.clone(),
                role: UserRole::Student,
            },
        )
        .await?;

        let atar = match year_level {
            YearLevel::Year12 => Some(80.0 + (i % 20) as f64),
            YearLevel::Year11 => None,
        };
        let student = StudentEntity::create(
            mm,
            &actor,
            StudentCreate {
                user_id: user.id(),
                year_level,
                atar,
            },
        )
        .await?;

        seed_goal(mm, &actor, &student, i).await?;

        let available: Vec<&(Course, Vec<Lesson>)> = courses
            .iter()
            .filter(|(course, _)| course.year_level() == year_level.as_str())
            .collect();
        for n in 0..COURSES_PER_STUDENT.min(available.len()) {
            let (course, lessons) = available[(i * 3 + n * 5) % available.len()];
            // stride 5 over a prime-sized list never repeats within six picks
            let enrollment = Enrollment::create(
                mm,
                &actor,
                EnrollmentCreate {
                    student_id: student.id(),
                    course_id: course.id(),
                },
            )
            .await?;
            summary.enrollments += 1;

            // seven lessons out of every ten
            for (k, lesson) in lessons.iter().enumerate() {
                if (k + i) % 10 < 7 {
                    LessonProgress::create(
                        mm,
                        &actor,
                        LessonProgressCreate::completed(enrollment.id(), lesson.id(), 30),
                    )
                    .await?;
                }
            }
        }

        seed_study_plan(mm, &actor, &student, i).await?;
    }
    summary.students = student_count;

    Ok(summary)
}

async fn seed_course_content(
    mm: &ModelManager,
    actor: &AuthenticatedUser,
    course: &Course,
    subject: SubjectCode,
) -> AppResult<Vec<Lesson>> {
    let mut lessons = Vec::new();
    for m in 1..=MODULES_PER_COURSE {
        let module = Module::create(
            mm,
            actor,
            ModuleCreate {
                course_id: course.id(),
                title: format!("Module {m}"),
                description: format!(
                    "Comprehensive coverage of key concepts in {}",
                    subject.display_name()
                ),
                order_index: Some(m),
            },
        )
        .await?;

        for l in 1..=LESSONS_PER_MODULE {
            let lesson = Lesson::create(
                mm,
                actor,
                LessonCreate {
                    module_id: module.id(),
                    title: format!("Lesson {l}"),
                    content: format!(
                        "# {} module {m}, lesson {l}\n\nWork through the notes, then attempt the practice set.",
                        subject.display_name()
                    ),
                    duration: 30 + (l * 5) % 30,
                    order_index: Some(l),
                },
            )
            .await?;
            lessons.push(lesson);
        }
    }
    Ok(lessons)
}

async fn seed_goal(
    mm: &ModelManager,
    actor: &AuthenticatedUser,
    student: &StudentEntity,
    i: usize,
) -> AppResult<()> {
    let university = &UNIVERSITIES[i % UNIVERSITIES.len()];
    let discipline = university.disciplines[(i / UNIVERSITIES.len()) % university.disciplines.len()];

    let goal = UniversityGoal::create(
        mm,
        actor,
        UniversityGoalCreate {
            student_id: student.id(),
            university: university.name.to_string(),
            degree: format!("Bachelor of {discipline}"),
            discipline: discipline.to_string(),
            required_atar: university.min_atar + (i % 10) as f64,
        },
    )
    .await?;

    let Some(requirements) = discipline_requirements(discipline) else {
        return Ok(());
    };

    let subjects = requirements
        .prerequisite
        .iter()
        .map(|s| (*s, true, 85.0))
        .chain(requirements.recommended.iter().map(|s| (*s, false, 75.0)));
    for (order_index, (subject, is_prerequisite, recommended_mark)) in subjects.enumerate() {
        UniversitySubject::create(
            mm,
            actor,
            UniversitySubjectCreate {
                goal_id: goal.id(),
                subject,
                is_prerequisite,
                recommended_mark,
                order_index: order_index as i32,
            },
        )
        .await?;
    }
    Ok(())
}

async fn seed_study_plan(
    mm: &ModelManager,
    actor: &AuthenticatedUser,
    student: &StudentEntity,
    i: usize,
) -> AppResult<()> {
    use SubjectCode::*;
    const ROTATION: [SubjectCode; 6] =
        [MathematicsAdvanced, EnglishAdvanced, Chemistry, Physics, Biology, Economics];

    let now = Utc::now();
    let plan = StudyPlan::create(
        mm,
        actor,
        StudyPlanCreate {
            student_id: student.id(),
            title: String::from("University Preparation Study Plan"),
            start_date: now,
            end_date: now + Duration::days(180),
        },
    )
    .await?;

    for day in 0..SESSION_DAYS {
        let subject = ROTATION[(i + day as usize) % ROTATION.len()];
        let start_time = now + Duration::days(day) + Duration::hours(2 + day % 4);
        StudySession::create(
            mm,
            actor,
            StudySessionCreate {
                study_plan_id: plan.id(),
                title: format!("Study Session - {}", subject.display_name()),
                subject: subject.as_str().to_string(),
                start_time,
                end_time: start_time + Duration::minutes(90),
                completed: false,
                notes: None,
            },
        )
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn teacher_email_test() {
        assert_eq!(email_local("Dr. Sarah Chen"), "drsarahchen");
        assert_eq!(email_local("Mr. Christopher Lee"), "mrchristopherlee");
    }

    #[test]
    fn every_subject_has_a_specialist_test() {
        for subject in SubjectCode::ALL {
            assert!(
                TEACHERS.iter().any(|t| t.specialties.contains(&subject)),
                "{subject} has no teacher"
            );
        }
    }

    #[test]
    fn summary_display_test() {
        let summary = SeedSummary {
            teachers: 10,
            students: 20,
            courses: 38,
            enrollments: 120,
            assessments: 114,
        };
        let text = summary.to_string();
        assert!(text.contains("10 teachers"));
        assert!(text.contains("38 courses"));
    }
}
