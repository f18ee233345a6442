use serde::{Deserialize, Serialize};

use crate::{
    analytics::YearLevel,
    model::entity::{StudentEntity, TeacherEntity, UserEntity},
    web::{UserRole, WebError, WebResult},
};

const MIN_NAME_LEN: usize = 2;
const MIN_PASSWORD_LEN: usize = 6;
const DEFAULT_DEPARTMENT: &str = "General";

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct RegisterBody {
    pub email: String,
    pub password: String,
    pub name: String,
    /// `STUDENT` when omitted.
    pub role: Option<UserRole>,
    /// `YEAR_11` or `YEAR_12`; students only, defaults to `YEAR_11`.
    pub year_level: Option<String>,
    /// Teachers only.
    pub department: Option<String>,
}

/// A registration that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub enum Registration {
    Student { year_level: YearLevel },
    Teacher { department: String },
}

impl RegisterBody {
    pub fn validate(&self) -> WebResult<Registration> {
        match self.email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => return Err(WebError::request_invalid("email", "invalid email address")),
        }

        if self.name.trim().chars().count() < MIN_NAME_LEN {
            return Err(WebError::request_invalid(
                "name",
                format!("must be at least {MIN_NAME_LEN} characters"),
            ));
        }

        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(WebError::request_invalid(
                "password",
                format!("must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }

        match self.role.unwrap_or(UserRole::Student) {
            UserRole::Student => {
                let year_level = match &self.year_level {
                    Some(raw) => raw
                        .parse::<YearLevel>()
                        .map_err(|e| WebError::request_invalid("year_level", e.to_string()))?,
                    None => YearLevel::default(),
                };
                Ok(Registration::Student { year_level })
            }
            UserRole::Teacher => Ok(Registration::Teacher {
                department: self
                    .department
                    .clone()
                    .filter(|d| !d.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_DEPARTMENT.to_string()),
            }),
            UserRole::Admin => Err(WebError::request_invalid(
                "role",
                "only STUDENT or TEACHER can register",
            )),
        }
    }
}

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub user: UserEntity,
    pub token: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MeResponse {
    pub user: UserEntity,
    pub student: Option<StudentEntity>,
    pub teacher: Option<TeacherEntity>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod test {
    use super::*;

    fn body(email: &str, name: &str, password: &str) -> RegisterBody {
        RegisterBody {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
            role: None,
            year_level: None,
            department: None,
        }
    }

    #[test]
    fn test_student_defaults_to_year_11() {
        let reg = body("a@b.au", "Al", "secret").validate().unwrap();
        assert_eq!(
            reg,
            Registration::Student {
                year_level: YearLevel::Year11
            }
        );
    }

    #[test]
    fn test_rejects_bad_email() {
        for email in ["nobody", "@domain.au", "local@"] {
            let err = body(email, "Alice", "secret").validate().unwrap_err();
            assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_rejects_short_name_and_password() {
        assert!(body("a@b.au", "A", "secret").validate().is_err());
        assert!(body("a@b.au", "Alice", "12345").validate().is_err());
        assert!(body("a@b.au", "Alice", "123456").validate().is_ok());
    }

    #[test]
    fn test_year_level_parsed() {
        let mut b = body("a@b.au", "Alice", "secret");
        b.year_level = Some("YEAR_12".to_string());
        assert_eq!(
            b.validate().unwrap(),
            Registration::Student {
                year_level: YearLevel::Year12
            }
        );

        b.year_level = Some("YEAR_13".to_string());
        assert!(b.validate().is_err());
    }

    #[test]
    fn test_teacher_department() {
        let mut b = body("t@school.au", "Ms T", "secret");
        b.role = Some(UserRole::Teacher);
        assert_eq!(
            b.validate().unwrap(),
            Registration::Teacher {
                department: "General".to_string()
            }
        );

        b.department = Some("Science".to_string());
        assert_eq!(
            b.validate().unwrap(),
            Registration::Teacher {
                department: "Science".to_string()
            }
        );
    }

    #[test]
    fn test_admin_cannot_register() {
        let mut b = body("root@school.au", "Root", "secret");
        b.role = Some(UserRole::Admin);
        assert!(b.validate().is_err());
    }
}
