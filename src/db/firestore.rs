// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profiles written by the identity service)
//! - Courses (embedded chapter/lesson structure)
//! - Enrollments (created by the payment side)
//! - Lesson progress (join collection keyed per enrollment+lesson)
//! - Instructor applications (admin review queue)
//!
//! All aggregate counts and sums are computed in memory over filtered
//! query results; nothing here caches across requests.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{
    Course, Enrollment, EnrollmentStatus, InstructorApplication, LessonProgress, User,
};

/// Firestore database client.
#[derive(Clone)]
pub struct Db {
    client: Option<firestore::FirestoreDb>,
}

impl Db {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by identity service ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a user (used by seeding and tests; the identity
    /// service owns this collection in production).
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Course Operations ───────────────────────────────────────

    /// Get a course with its chapters and lessons in presentation order.
    pub async fn get_course(&self, course_id: &str) -> Result<Option<Course>, AppError> {
        let course: Option<Course> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::COURSES)
            .obj()
            .one(course_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(course.map(|mut c| {
            c.normalize();
            c
        }))
    }

    /// Create or update a course.
    pub async fn upsert_course(&self, course: &Course) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::COURSES)
            .document_id(&course.id)
            .object(course)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count courses owned by an instructor.
    pub async fn count_courses_for_owner(&self, owner_id: &str) -> Result<u32, AppError> {
        let owner_id = owner_id.to_string();
        let courses: Vec<Course> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::COURSES)
            .filter(move |q| q.field("owner_id").eq(owner_id.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(courses.len() as u32)
    }

    // ─── Enrollment Operations ───────────────────────────────────

    /// Get a learner's active enrollments, most recent first.
    ///
    /// Only `Active` status is ever returned; cancelled and refunded
    /// enrollments are invisible to the progress layer.
    pub async fn list_active_enrollments_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Enrollment>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::ENROLLMENTS)
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(user_id.clone()),
                    q.field("status").eq(EnrollmentStatus::Active.as_str()),
                ])
            })
            .order_by([("created_at", firestore::FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get active enrollments across all courses owned by an instructor.
    pub async fn list_active_enrollments_for_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<Enrollment>, AppError> {
        let owner_id = owner_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::ENROLLMENTS)
            .filter(move |q| {
                q.for_all([
                    q.field("course_owner_id").eq(owner_id.clone()),
                    q.field("status").eq(EnrollmentStatus::Active.as_str()),
                ])
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count active enrollments on an instructor's courses.
    pub async fn count_active_students_for_owner(&self, owner_id: &str) -> Result<u32, AppError> {
        Ok(self.list_active_enrollments_for_owner(owner_id).await?.len() as u32)
    }

    /// Sum of amounts paid over active enrollments on an instructor's
    /// courses, in minor currency units. An empty result is 0.
    pub async fn sum_revenue_for_owner(&self, owner_id: &str) -> Result<i64, AppError> {
        Ok(self
            .list_active_enrollments_for_owner(owner_id)
            .await?
            .iter()
            .map(|e| e.amount)
            .sum())
    }

    /// Create or update an enrollment (payment side in production,
    /// seeding in tests).
    pub async fn upsert_enrollment(&self, enrollment: &Enrollment) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::ENROLLMENTS)
            .document_id(&enrollment.id)
            .object(enrollment)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Lesson Progress Operations ──────────────────────────────

    /// Get all lesson-progress records for an enrollment.
    pub async fn list_progress_for_enrollment(
        &self,
        enrollment_id: &str,
    ) -> Result<Vec<LessonProgress>, AppError> {
        let enrollment_id = enrollment_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::LESSON_PROGRESS)
            .filter(move |q| q.field("enrollment_id").eq(enrollment_id.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Upsert the single progress record for an (enrollment, lesson)
    /// pair. The deterministic document ID makes repeated writes
    /// idempotent rather than duplicating records.
    pub async fn upsert_lesson_progress(&self, progress: &LessonProgress) -> Result<(), AppError> {
        let doc_id = LessonProgress::doc_id(&progress.enrollment_id, &progress.lesson_id);

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::LESSON_PROGRESS)
            .document_id(&doc_id)
            .object(progress)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Instructor Application Operations ───────────────────────

    /// Count instructor applications awaiting review.
    pub async fn count_pending_applications(&self) -> Result<u32, AppError> {
        let applications: Vec<InstructorApplication> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::INSTRUCTOR_APPLICATIONS)
            .filter(|q| q.field("status").eq("Pending"))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(applications.len() as u32)
    }

    /// Create or update an instructor application (tests/seeding).
    pub async fn upsert_application(
        &self,
        application: &InstructorApplication,
    ) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::INSTRUCTOR_APPLICATIONS)
            .document_id(&application.user_id)
            .object(application)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
