mod common;
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use learned::analytics::SubjectCode;

use crate::common::{
    Action, Flow, complete_lessons, enroll, insert_assessment, insert_course, insert_student,
    insert_teacher, login_action, setup_server, setup_test_db,
};

#[tokio::test]
async fn route_teacher_dashboard_test() {
    let db = setup_test_db().await;
    let mm = db.mm();
    let mut server = setup_server(&db).await;

    let teacher = insert_teacher(&mm, "sarah@example.com", "Sarah Johnson").await;
    let ava = insert_student(&mm, "ava@example.com", "Ava Nguyen", None).await;
    let ben = insert_student(&mm, "ben@example.com", "Ben Carter", None).await;
    let physics = insert_course(&mm, &teacher.teacher, SubjectCode::Physics, 1, 2).await;
    let chemistry = insert_course(&mm, &teacher.teacher, SubjectCode::Chemistry, 1, 2).await;
    enroll(&mm, &ava.student, &physics.course).await;
    enroll(&mm, &ben.student, &physics.course).await;
    enroll(&mm, &ben.student, &chemistry.course).await;

    let now = Utc::now();
    for week in 1..=6 {
        insert_assessment(
            &mm,
            &physics.course,
            &format!("Physics week {week}"),
            now + Duration::weeks(week),
        )
        .await;
    }

    Flow::new()
        .step(login_action("sarah@example.com"))
        .step(
            Action::new("dashboard", "GET", "/api/v1/teachers/dashboard").assert_body(|body| {
                assert_eq!(body["user"]["name"], "Sarah Johnson");
                assert_eq!(body["total_courses"], 2);
                assert_eq!(body["total_enrollments"], 3);

                let courses = body["courses"].as_array().unwrap();
                assert_eq!(courses[0]["subject"], "CHEMISTRY");
                assert_eq!(courses[0]["enrollment_count"], 1);
                assert!(courses[0]["assessments"].as_array().unwrap().is_empty());
                assert_eq!(courses[1]["subject"], "PHYSICS");
                assert_eq!(courses[1]["enrollment_count"], 2);
                // capped at five per course
                assert_eq!(courses[1]["assessments"].as_array().unwrap().len(), 5);
                assert_eq!(courses[1]["assessments"][0]["title"], "Physics week 1");
            }),
        )
        .step(
            Action::new("courses with students", "GET", "/api/v1/teachers/courses").assert_body(
                |body| {
                    let courses = body.as_array().unwrap();
                    assert_eq!(courses.len(), 2);
                    let names: Vec<&str> = courses[1]["students"]
                        .as_array()
                        .unwrap()
                        .iter()
                        .map(|s| s["name"].as_str().unwrap())
                        .collect();
                    assert_eq!(names, vec!["Ava Nguyen", "Ben Carter"]);
                },
            ),
        )
        .run(&mut server, db)
        .await;
}

#[tokio::test]
async fn route_teacher_class_progress_test() {
    let db = setup_test_db().await;
    let mm = db.mm();
    let mut server = setup_server(&db).await;

    let teacher = insert_teacher(&mm, "sarah@example.com", "Sarah Johnson").await;
    let other = insert_teacher(&mm, "mark@example.com", "Mark Lee").await;
    let ava = insert_student(&mm, "ava@example.com", "Ava Nguyen", None).await;
    let ben = insert_student(&mm, "ben@example.com", "Ben Carter", None).await;
    let physics = insert_course(&mm, &teacher.teacher, SubjectCode::Physics, 1, 4).await;
    let biology = insert_course(&mm, &other.teacher, SubjectCode::Biology, 1, 1).await;

    let ava_enrollment = enroll(&mm, &ava.student, &physics.course).await;
    let ben_enrollment = enroll(&mm, &ben.student, &physics.course).await;
    complete_lessons(&mm, &ava_enrollment, physics.all_lessons().take(2)).await;
    complete_lessons(&mm, &ben_enrollment, physics.all_lessons().take(3)).await;
    // progress in another course stays out of this class
    let ava_biology = enroll(&mm, &ava.student, &biology.course).await;
    complete_lessons(&mm, &ava_biology, biology.all_lessons()).await;

    let physics_id = physics.course.id();
    let biology_id = biology.course.id();

    Flow::new()
        .step(login_action("sarah@example.com"))
        .step(
            Action::new(
                "class progress",
                "GET",
                format!("/api/v1/teachers/courses/{physics_id}/progress"),
            )
            .assert_body(|body| {
                assert_eq!(body["course"]["subject"], "PHYSICS");
                let students = body["students"].as_array().unwrap();
                assert_eq!(students.len(), 2);
                assert_eq!(students[0]["name"], "Ava Nguyen");
                assert_eq!(students[0]["progress_percentage"], 50);
                assert_eq!(students[1]["name"], "Ben Carter");
                assert_eq!(students[1]["completed_lessons"], 3);
                assert_eq!(students[1]["progress_percentage"], 75);
                // (50 + 75) / 2 rounds half up
                assert_eq!(body["average_progress"], 63);
            }),
        )
        .step(
            Action::new(
                "someone else's course",
                "GET",
                format!("/api/v1/teachers/courses/{biology_id}/progress"),
            )
            .with_expect(StatusCode::FORBIDDEN),
        )
        .step(
            Action::new(
                "missing course",
                "GET",
                format!("/api/v1/teachers/courses/{}/progress", uuid::Uuid::new_v4()),
            )
            .with_expect(StatusCode::NOT_FOUND),
        )
        .step(login_action("ava@example.com").with_clear_cookies(true))
        .step(
            Action::new("student on teacher dashboard", "GET", "/api/v1/teachers/dashboard")
                .with_expect(StatusCode::FORBIDDEN),
        )
        .run(&mut server, db)
        .await;
}
