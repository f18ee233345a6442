//! Student progress aggregation, university pathway matching and upcoming
//! assessment selection.
//!
//! Everything here is computed from data fetched for the current request;
//! nothing is cached between calls.

pub mod curriculum;
pub use curriculum::{CurriculumError, SubjectCode, YearLevel};

pub mod pathway;
pub mod progress;
pub mod universities;
pub mod upcoming;

mod records;
pub use records::{
    CourseInfo, EnrollmentSnapshot, PathwayInputs, StudentRecords, class_completion,
    course_breakdown, enrollment_summaries, pathway_report, upcoming_assessments,
};
