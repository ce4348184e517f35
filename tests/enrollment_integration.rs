// SPDX-License-Identifier: MIT

//! End-to-end enrollment and progress tests against the Firestore
//! emulator. Skipped unless FIRESTORE_EMULATOR_HOST is set.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
};
use chrono::{Duration, Utc};
use coursebay::models::{
    ApplicationStatus, Chapter, Course, CourseStatus, Enrollment, EnrollmentStatus,
    InstructorApplication, Lesson, LessonProgress, Role, User,
};
use tower::ServiceExt;

mod common;

fn lesson(id: &str, position: u32) -> Lesson {
    Lesson {
        id: id.to_string(),
        title: format!("Lesson {}", id),
        position,
    }
}

fn sample_course(id: &str, owner_id: &str) -> Course {
    Course {
        id: id.to_string(),
        owner_id: owner_id.to_string(),
        title: format!("Course {}", id),
        cover_key: Some("covers/img.png".to_string()),
        status: CourseStatus::Published,
        chapters: vec![
            Chapter {
                id: format!("{}-ch-1", id),
                title: "Basics".to_string(),
                position: 1,
                lessons: vec![
                    lesson(&format!("{}-l-1", id), 1),
                    lesson(&format!("{}-l-2", id), 2),
                    lesson(&format!("{}-l-3", id), 3),
                ],
            },
            Chapter {
                id: format!("{}-ch-2", id),
                title: "Advanced".to_string(),
                position: 2,
                lessons: vec![
                    lesson(&format!("{}-l-4", id), 1),
                    lesson(&format!("{}-l-5", id), 2),
                ],
            },
        ],
    }
}

fn user(id: &str, name: &str, role: Role) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: Some(format!("{}@example.com", id)),
        image: None,
        role,
        created_at: Utc::now().to_rfc3339(),
    }
}

fn enrollment(
    id: &str,
    user_id: &str,
    course: &Course,
    status: EnrollmentStatus,
    amount: i64,
) -> Enrollment {
    Enrollment {
        id: id.to_string(),
        user_id: user_id.to_string(),
        course_id: course.id.clone(),
        course_owner_id: course.owner_id.clone(),
        status,
        amount,
        created_at: Utc::now(),
    }
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(app: &axum::Router, uri: &str, auth: &str) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .header(header::AUTHORIZATION, auth)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_enrollment_list_with_progress() {
    require_emulator!();

    let db = common::test_db().await;
    let (app, key) = common::create_test_app_with_db(db.clone());

    let instructor = user("list-inst", "Ada Lovelace", Role::Instructor);
    let student = user("list-student", "Sam", Role::Student);
    db.upsert_user(&instructor).await.unwrap();
    db.upsert_user(&student).await.unwrap();

    let course_a = sample_course("list-course-a", &instructor.id);
    let course_b = sample_course("list-course-b", &instructor.id);
    db.upsert_course(&course_a).await.unwrap();
    db.upsert_course(&course_b).await.unwrap();

    let active = enrollment(
        "list-enr-a",
        &student.id,
        &course_a,
        EnrollmentStatus::Active,
        49_999,
    );
    let cancelled = enrollment(
        "list-enr-b",
        &student.id,
        &course_b,
        EnrollmentStatus::Cancelled,
        49_999,
    );
    db.upsert_enrollment(&active).await.unwrap();
    db.upsert_enrollment(&cancelled).await.unwrap();

    // 2 of 5 lessons complete
    for lesson_id in ["list-course-a-l-1", "list-course-a-l-4"] {
        db.upsert_lesson_progress(&LessonProgress {
            enrollment_id: active.id.clone(),
            lesson_id: lesson_id.to_string(),
            completed: true,
            updated_at: Utc::now(),
        })
        .await
        .unwrap();
    }

    let auth = common::bearer(&student.id, Role::Student, &key);
    let response = get(&app, "/api/enrollments", &auth).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let enrollments = json["enrollments"].as_array().unwrap();
    assert_eq!(enrollments.len(), 1, "cancelled enrollment must not appear");

    let entry = &enrollments[0];
    assert_eq!(entry["course"]["id"], "list-course-a");
    assert_eq!(entry["course"]["owner_name"], "Ada Lovelace");
    assert_eq!(
        entry["course"]["cover_url"],
        "https://coursebay-test.fly.storage.tigris.dev/covers/img.png"
    );
    assert_eq!(entry["progress"]["total_lessons"], 5);
    assert_eq!(entry["progress"]["completed_lessons"], 2);
    assert_eq!(entry["progress"]["percent"], 40);

    assert_eq!(json["summary"]["total_courses"], 1);
    assert_eq!(json["summary"]["completed_courses"], 0);
    assert_eq!(json["summary"]["average_percent"], 40);
}

#[tokio::test]
async fn test_enrollments_ordered_most_recent_first() {
    require_emulator!();

    let db = common::test_db().await;
    let (app, key) = common::create_test_app_with_db(db.clone());

    let instructor = user("order-inst", "Ada", Role::Instructor);
    let student = user("order-student", "Sam", Role::Student);
    db.upsert_user(&instructor).await.unwrap();
    db.upsert_user(&student).await.unwrap();

    let older_course = sample_course("order-course-old", &instructor.id);
    let newer_course = sample_course("order-course-new", &instructor.id);
    db.upsert_course(&older_course).await.unwrap();
    db.upsert_course(&newer_course).await.unwrap();

    let mut older = enrollment(
        "order-enr-old",
        &student.id,
        &older_course,
        EnrollmentStatus::Active,
        1_000,
    );
    older.created_at = Utc::now() - Duration::days(30);
    let newer = enrollment(
        "order-enr-new",
        &student.id,
        &newer_course,
        EnrollmentStatus::Active,
        1_000,
    );
    db.upsert_enrollment(&older).await.unwrap();
    db.upsert_enrollment(&newer).await.unwrap();

    let auth = common::bearer(&student.id, Role::Student, &key);
    let response = get(&app, "/api/enrollments", &auth).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let enrollments = json["enrollments"].as_array().unwrap();
    assert_eq!(enrollments.len(), 2);
    assert_eq!(enrollments[0]["id"], "order-enr-new");
    assert_eq!(enrollments[1]["id"], "order-enr-old");
}

#[tokio::test]
async fn test_course_progress_requires_enrollment() {
    require_emulator!();

    let db = common::test_db().await;
    let (app, key) = common::create_test_app_with_db(db.clone());

    let instructor = user("authz-inst", "Ada", Role::Instructor);
    let enrolled = user("authz-enrolled", "Sam", Role::Student);
    let outsider = user("authz-outsider", "Alex", Role::Student);
    for u in [&instructor, &enrolled, &outsider] {
        db.upsert_user(u).await.unwrap();
    }

    let course = sample_course("authz-course", &instructor.id);
    db.upsert_course(&course).await.unwrap();
    db.upsert_enrollment(&enrollment(
        "authz-enr",
        &enrolled.id,
        &course,
        EnrollmentStatus::Active,
        1_000,
    ))
    .await
    .unwrap();

    let uri = "/api/courses/authz-course/progress";

    let auth = common::bearer(&enrolled.id, Role::Student, &key);
    let response = get(&app, uri, &auth).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["progress"]["total_lessons"], 5);
    assert_eq!(json["progress"]["percent"], 0);

    let auth = common::bearer(&outsider.id, Role::Student, &key);
    let response = get(&app, uri, &auth).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_lesson_completion_is_idempotent() {
    require_emulator!();

    let db = common::test_db().await;
    let (app, key) = common::create_test_app_with_db(db.clone());

    let instructor = user("complete-inst", "Ada", Role::Instructor);
    let student = user("complete-student", "Sam", Role::Student);
    db.upsert_user(&instructor).await.unwrap();
    db.upsert_user(&student).await.unwrap();

    let course = sample_course("complete-course", &instructor.id);
    db.upsert_course(&course).await.unwrap();
    db.upsert_enrollment(&enrollment(
        "complete-enr",
        &student.id,
        &course,
        EnrollmentStatus::Active,
        1_000,
    ))
    .await
    .unwrap();

    let auth = common::bearer(&student.id, Role::Student, &key);
    let uri = "/api/courses/complete-course/lessons/complete-course-l-1/progress";

    // Marking the same lesson complete twice keeps one record
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(uri)
                    .header(header::AUTHORIZATION, &auth)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"completed":true}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["progress"]["completed_lessons"], 1);
        assert_eq!(json["progress"]["percent"], 20);
    }

    let records = db.list_progress_for_enrollment("complete-enr").await.unwrap();
    assert_eq!(records.len(), 1);

    // A lesson outside the course is rejected
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/courses/complete-course/lessons/other-lesson/progress")
                .header(header::AUTHORIZATION, &auth)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"completed":true}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_instructor_metrics_fresh_values() {
    require_emulator!();

    let db = common::test_db().await;
    let (app, key) = common::create_test_app_with_db(db.clone());

    let instructor = user("metrics-inst", "Ada", Role::Instructor);
    let student_a = user("metrics-student-a", "Sam", Role::Student);
    let student_b = user("metrics-student-b", "Alex", Role::Student);
    for u in [&instructor, &student_a, &student_b] {
        db.upsert_user(u).await.unwrap();
    }

    let course = sample_course("metrics-course", &instructor.id);
    db.upsert_course(&course).await.unwrap();

    db.upsert_enrollment(&enrollment(
        "metrics-enr-a",
        &student_a.id,
        &course,
        EnrollmentStatus::Active,
        49_999,
    ))
    .await
    .unwrap();
    db.upsert_enrollment(&enrollment(
        "metrics-enr-b",
        &student_b.id,
        &course,
        EnrollmentStatus::Active,
        1_600,
    ))
    .await
    .unwrap();
    // Refunded enrollments count toward nothing
    db.upsert_enrollment(&enrollment(
        "metrics-enr-c",
        &student_b.id,
        &course,
        EnrollmentStatus::Refunded,
        99_999,
    ))
    .await
    .unwrap();

    let auth = common::bearer(&instructor.id, Role::Instructor, &key);
    let response = get(&app, "/api/instructor/metrics", &auth).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["course_count"], 1);
    assert_eq!(json["active_student_count"], 2);
    // (49_999 + 1_600) / 1000 = 51.599 -> 52
    assert_eq!(json["revenue_in_thousands"], 52);
}

#[tokio::test]
async fn test_pending_application_count_for_admin() {
    require_emulator!();

    let db = common::test_db().await;
    let (app, key) = common::create_test_app_with_db(db.clone());

    let admin = user("apps-admin", "Root", Role::Admin);
    db.upsert_user(&admin).await.unwrap();

    db.upsert_application(&InstructorApplication {
        user_id: "apps-applicant".to_string(),
        status: ApplicationStatus::Pending,
        created_at: Utc::now().to_rfc3339(),
    })
    .await
    .unwrap();
    db.upsert_application(&InstructorApplication {
        user_id: "apps-rejected".to_string(),
        status: ApplicationStatus::Rejected,
        created_at: Utc::now().to_rfc3339(),
    })
    .await
    .unwrap();

    let auth = common::bearer(&admin.id, Role::Admin, &key);
    let response = get(&app, "/api/admin/applications/pending", &auth).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    // The count is global, so concurrent test data can only add to it
    assert!(json["pending"].as_u64().unwrap() >= 1);
}
