// SPDX-License-Identifier: MIT

//! Dashboard routes for instructors and admins.
//!
//! These are the boundary where degraded aggregates are accepted:
//! authorization failures surface as 403, but a failed read renders as
//! zeros rather than an error page.

use crate::error::{AppError, Result};
use crate::middleware::auth::Session;
use crate::models::{InstructorMetrics, Role};
use crate::services::{authorize, Requirement, RequestScope};
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/instructor/metrics", get(get_instructor_metrics))
        .route(
            "/api/admin/applications/pending",
            get(get_pending_applications),
        )
}

/// Get dashboard metrics for the caller's courses.
///
/// Instructors see their own numbers; admins can hold courses too.
/// Students get 403, never a zero-valued success body.
async fn get_instructor_metrics(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<InstructorMetrics>> {
    let scope = RequestScope::new();
    let allowed = authorize(
        Some(&session),
        Requirement::Role(Role::Instructor),
        &state.enrollments,
        &scope,
    )
    .await
        || authorize(
            Some(&session),
            Requirement::Role(Role::Admin),
            &state.enrollments,
            &scope,
        )
        .await;
    if !allowed {
        return Err(AppError::Forbidden);
    }

    let metrics = state.metrics.instructor_metrics(&session.user_id).await;
    // Degraded is acceptable here: a dashboard showing zeros beats a
    // broken page. The service has already logged the cause.
    Ok(Json(metrics.into_inner()))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PendingApplicationsResponse {
    pub pending: u32,
}

/// Count instructor applications awaiting review. Admin only: the role
/// check runs before the read, and a non-admin caller gets 403, not a
/// zero count.
async fn get_pending_applications(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<PendingApplicationsResponse>> {
    let scope = RequestScope::new();
    let allowed = authorize(
        Some(&session),
        Requirement::Role(Role::Admin),
        &state.enrollments,
        &scope,
    )
    .await;
    if !allowed {
        return Err(AppError::Forbidden);
    }

    let pending = state.metrics.pending_applications().await;
    Ok(Json(PendingApplicationsResponse {
        pending: pending.into_inner(),
    }))
}
