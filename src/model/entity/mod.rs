mod user;
pub use user::{UserEntity, UserEntityCreate};

mod student;
pub use student::{EnrolledStudentRow, StudentCreate, StudentEntity};

mod teacher;
pub use teacher::{TeacherCreate, TeacherEntity};

mod course;
pub use course::{Course, CourseCreate, TeacherCourseRow};

mod module;
pub use module::{Module, ModuleCreate, ModuleWithLessonsRow};

mod lesson;
pub use lesson::{Lesson, LessonCreate};

mod enrollment;
pub use enrollment::{Enrollment, EnrollmentCourseRow, EnrollmentCreate};

mod lesson_progress;
pub use lesson_progress::{EnrollmentProgressRow, LessonProgress, LessonProgressCreate};

mod university_goal;
pub use university_goal::{
    UniversityGoal, UniversityGoalCreate, UniversitySubject, UniversitySubjectCreate,
};

mod assessment;
pub use assessment::{Assessment, AssessmentCreate, AssessmentKind};

mod submission;
pub use submission::{Submission, SubmissionCreate};

mod study_plan;
pub use study_plan::{StudyPlan, StudyPlanCreate, StudySession, StudySessionCreate};
