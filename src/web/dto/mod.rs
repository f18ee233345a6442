pub mod assessments;
pub mod auth;
pub mod students;
pub mod teachers;
pub mod university;
