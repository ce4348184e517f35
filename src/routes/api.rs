// SPDX-License-Identifier: MIT

//! API routes for authenticated learners.

use crate::error::{AppError, Result};
use crate::middleware::auth::Session;
use crate::models::{compute_progress, LessonProgress, Progress};
use crate::services::enrollments::DashboardSummary;
use crate::services::{authorize, Requirement, RequestScope};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require a session).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/enrollments", get(get_enrollments))
        .route("/api/courses/{course_id}/progress", get(get_course_progress))
        .route(
            "/api/courses/{course_id}/lessons/{lesson_id}/progress",
            put(put_lesson_progress),
        )
}

// ─── User Profile ────────────────────────────────────────────

/// Current user response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub image_url: Option<String>,
    pub role: String,
}

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<UserResponse>> {
    let user = state
        .db
        .get_user(&session.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", session.user_id)))?;

    Ok(Json(UserResponse {
        image_url: state.storage.public_url(user.image.as_deref()),
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role.as_str().to_string(),
    }))
}

// ─── Enrollments ─────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EnrollmentsResponse {
    pub enrollments: Vec<EnrollmentSummary>,
    pub summary: DashboardSummary,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct EnrollmentSummary {
    pub id: String,
    pub course: CourseSummary,
    pub enrolled_at: String,
    pub progress: Progress,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CourseSummary {
    pub id: String,
    pub title: String,
    pub cover_url: Option<String>,
    pub owner_name: String,
    pub owner_image_url: Option<String>,
}

/// Get the learner's active enrollments with per-course progress and an
/// overall roll-up. Both reads go through one request scope, so the
/// joined list is fetched once.
async fn get_enrollments(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<EnrollmentsResponse>> {
    let scope = RequestScope::new();

    let records = state
        .enrollments
        .list_active(&scope, &session.user_id)
        .await?;
    let summary = state
        .enrollments
        .dashboard_summary(&scope, &session.user_id)
        .await?;

    let enrollments = records
        .iter()
        .map(|record| EnrollmentSummary {
            id: record.enrollment.id.clone(),
            course: CourseSummary {
                id: record.course.id.clone(),
                title: record.course.title.clone(),
                cover_url: state.storage.public_url(record.course.cover_key.as_deref()),
                owner_name: record.owner_name.clone(),
                owner_image_url: state.storage.public_url(record.owner_image.as_deref()),
            },
            enrolled_at: format_utc_rfc3339(record.enrollment.created_at),
            progress: compute_progress(record),
        })
        .collect();

    Ok(Json(EnrollmentsResponse {
        enrollments,
        summary,
    }))
}

// ─── Course Progress ─────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CourseProgressResponse {
    pub course_id: String,
    pub progress: Progress,
}

/// Get progress for one course. Requires an active enrollment; the
/// authorization lookup and the record lookup share the request scope.
async fn get_course_progress(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(course_id): Path<String>,
) -> Result<Json<CourseProgressResponse>> {
    let scope = RequestScope::new();

    let allowed = authorize(
        Some(&session),
        Requirement::Enrollment {
            course_id: &course_id,
        },
        &state.enrollments,
        &scope,
    )
    .await;
    if !allowed {
        return Err(AppError::Forbidden);
    }

    let records = state
        .enrollments
        .list_active(&scope, &session.user_id)
        .await?;
    let record = records
        .iter()
        .find(|r| r.enrollment.course_id == course_id)
        .ok_or(AppError::Forbidden)?;

    Ok(Json(CourseProgressResponse {
        course_id,
        progress: compute_progress(record),
    }))
}

// ─── Lesson Completion ───────────────────────────────────────

#[derive(Deserialize)]
struct LessonProgressRequest {
    completed: bool,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LessonProgressResponse {
    pub success: bool,
    pub progress: Progress,
}

/// Mark or unmark a lesson complete.
///
/// Requires an active enrollment and a lesson that belongs to the
/// course. Writes the single (enrollment, lesson) record; repeated
/// calls overwrite it rather than duplicating.
async fn put_lesson_progress(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path((course_id, lesson_id)): Path<(String, String)>,
    Json(body): Json<LessonProgressRequest>,
) -> Result<Json<LessonProgressResponse>> {
    let scope = RequestScope::new();

    let allowed = authorize(
        Some(&session),
        Requirement::Enrollment {
            course_id: &course_id,
        },
        &state.enrollments,
        &scope,
    )
    .await;
    if !allowed {
        return Err(AppError::Forbidden);
    }

    let records = state
        .enrollments
        .list_active(&scope, &session.user_id)
        .await?;
    let record = records
        .iter()
        .find(|r| r.enrollment.course_id == course_id)
        .ok_or(AppError::Forbidden)?;

    if !record.course.contains_lesson(&lesson_id) {
        return Err(AppError::NotFound(format!(
            "Lesson {} not found in course {}",
            lesson_id, course_id
        )));
    }

    let row = LessonProgress {
        enrollment_id: record.enrollment.id.clone(),
        lesson_id: lesson_id.clone(),
        completed: body.completed,
        updated_at: chrono::Utc::now(),
    };
    state.db.upsert_lesson_progress(&row).await?;

    tracing::debug!(
        user_id = %session.user_id,
        course_id = %course_id,
        lesson_id = %lesson_id,
        completed = body.completed,
        "Lesson progress updated"
    );

    // Recompute against the write without a second store round-trip.
    let mut updated = record.clone();
    updated.progress.retain(|p| p.lesson_id != lesson_id);
    updated.progress.push(row);

    Ok(Json(LessonProgressResponse {
        success: true,
        progress: compute_progress(&updated),
    }))
}
