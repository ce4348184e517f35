// SPDX-License-Identifier: MIT

//! Enrollment query service with per-request memoization.
//!
//! `list_active` is the single read path joining a learner's active
//! enrollments with course structure, owner display fields, and
//! lesson-progress records. Handlers and the authorization gate both
//! consult it within one request, so the joined list is memoized in an
//! explicit [`RequestScope`] that each handler creates and drops with
//! the request. Nothing is ever cached across requests or users.

use std::sync::Arc;

use futures_util::{stream, StreamExt};
use serde::Serialize;
use tokio::sync::OnceCell;

use crate::db::Db;
use crate::error::AppError;
use crate::models::{compute_progress, Enrollment, EnrollmentRecord};

/// Concurrency limit for the per-enrollment join reads.
const MAX_CONCURRENT_DB_OPS: usize = 8;

/// Per-request memo for the joined active-enrollment list.
///
/// Created in the handler, passed down by reference, dropped when the
/// response is produced. Must never be stored in shared state.
#[derive(Default)]
pub struct RequestScope {
    active: OnceCell<Arc<Vec<EnrollmentRecord>>>,
}

impl RequestScope {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Read-only projection over enrollments, courses, and progress.
#[derive(Clone)]
pub struct EnrollmentService {
    db: Db,
}

/// Roll-up across all of a learner's active enrollments.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DashboardSummary {
    pub total_courses: u32,
    pub completed_courses: u32,
    /// Mean completion percentage across enrollments (0 when none)
    pub average_percent: u8,
}

impl EnrollmentService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Get the learner's active enrollments, most recent first, joined
    /// with course structure and progress. Memoized in `scope`, so
    /// repeated calls within one request read the store once.
    pub async fn list_active(
        &self,
        scope: &RequestScope,
        user_id: &str,
    ) -> Result<Arc<Vec<EnrollmentRecord>>, AppError> {
        let records = scope
            .active
            .get_or_try_init(|| async { self.load_active(user_id).await.map(Arc::new) })
            .await?;
        Ok(Arc::clone(records))
    }

    /// Whether the user holds an `Active` enrollment for the course.
    pub async fn is_actively_enrolled(
        &self,
        scope: &RequestScope,
        user_id: &str,
        course_id: &str,
    ) -> Result<bool, AppError> {
        let records = self.list_active(scope, user_id).await?;
        Ok(records.iter().any(|r| r.enrollment.course_id == course_id))
    }

    /// Compute the dashboard roll-up. Reads through the same scope as
    /// the enrollment list, so a handler producing both pays for one
    /// store round-trip.
    pub async fn dashboard_summary(
        &self,
        scope: &RequestScope,
        user_id: &str,
    ) -> Result<DashboardSummary, AppError> {
        let records = self.list_active(scope, user_id).await?;

        let mut completed = 0u32;
        let mut percent_sum = 0u32;
        for record in records.iter() {
            let progress = compute_progress(record);
            percent_sum += u32::from(progress.percent);
            if progress.total_lessons > 0 && progress.completed_lessons == progress.total_lessons {
                completed += 1;
            }
        }

        let total = records.len() as u32;
        let average_percent = if total > 0 {
            (f64::from(percent_sum) / f64::from(total)).round() as u8
        } else {
            0
        };

        Ok(DashboardSummary {
            total_courses: total,
            completed_courses: completed,
            average_percent,
        })
    }

    async fn load_active(&self, user_id: &str) -> Result<Vec<EnrollmentRecord>, AppError> {
        let enrollments = self.db.list_active_enrollments_for_user(user_id).await?;

        tracing::debug!(
            user_id,
            count = enrollments.len(),
            "Joining active enrollments"
        );

        // Join each enrollment concurrently; `buffered` keeps the
        // created_at descending order from the store.
        let joined: Vec<Result<Option<EnrollmentRecord>, AppError>> = stream::iter(enrollments)
            .map(|enrollment| self.join_record(enrollment))
            .buffered(MAX_CONCURRENT_DB_OPS)
            .collect()
            .await;

        let mut records = Vec::with_capacity(joined.len());
        for result in joined {
            if let Some(record) = result? {
                records.push(record);
            }
        }
        Ok(records)
    }

    async fn join_record(
        &self,
        enrollment: Enrollment,
    ) -> Result<Option<EnrollmentRecord>, AppError> {
        let (course, progress) = tokio::try_join!(
            self.db.get_course(&enrollment.course_id),
            self.db.list_progress_for_enrollment(&enrollment.id),
        )?;

        let Some(course) = course else {
            // Course deleted after enrollment; the enrollment is not
            // presentable, skip it rather than failing the whole list.
            tracing::warn!(
                enrollment_id = %enrollment.id,
                course_id = %enrollment.course_id,
                "Active enrollment references missing course"
            );
            return Ok(None);
        };

        let owner = self.db.get_user(&course.owner_id).await?;
        let (owner_name, owner_image) = match owner {
            Some(user) => (user.name, user.image),
            None => ("Unknown".to_string(), None),
        };

        Ok(Some(EnrollmentRecord {
            enrollment,
            course,
            owner_name,
            owner_image,
            progress,
        }))
    }
}
