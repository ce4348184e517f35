// SPDX-License-Identifier: MIT

//! Fail-soft dashboard aggregators.
//!
//! Dashboard metrics are independent reads joined after all complete.
//! A failed read degrades the whole aggregate to its zero value, which
//! renders as "0" on the dashboard instead of a broken page. The
//! degradation is tagged ([`Aggregate::Degraded`]) so the route layer
//! stays in charge of whether a degraded value is acceptable.

use crate::db::Db;
use crate::models::{Aggregate, InstructorMetrics};

#[derive(Clone)]
pub struct MetricsService {
    db: Db,
}

impl MetricsService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Compute course count, active student count, and revenue for an
    /// instructor. The three reads run concurrently; any failure yields
    /// the zero metrics object.
    pub async fn instructor_metrics(&self, user_id: &str) -> Aggregate<InstructorMetrics> {
        let (courses, students, revenue) = tokio::join!(
            self.db.count_courses_for_owner(user_id),
            self.db.count_active_students_for_owner(user_id),
            self.db.sum_revenue_for_owner(user_id),
        );

        match (courses, students, revenue) {
            (Ok(course_count), Ok(active_student_count), Ok(revenue_minor)) => {
                Aggregate::Fresh(InstructorMetrics {
                    course_count,
                    active_student_count,
                    revenue_in_thousands: round_to_thousands(revenue_minor),
                })
            }
            (courses, students, revenue) => {
                let error = [
                    courses.err().map(|e| e.to_string()),
                    students.err().map(|e| e.to_string()),
                    revenue.err().map(|e| e.to_string()),
                ]
                .into_iter()
                .flatten()
                .next()
                .unwrap_or_default();

                tracing::warn!(
                    user_id,
                    error = %error,
                    "Instructor metrics degraded to zero values"
                );
                Aggregate::Degraded(InstructorMetrics::zero())
            }
        }
    }

    /// Count instructor applications awaiting admin review. Fail-soft
    /// like the metrics read; the admin role check happens at the route
    /// layer before this runs.
    pub async fn pending_applications(&self) -> Aggregate<u32> {
        match self.db.count_pending_applications().await {
            Ok(count) => Aggregate::Fresh(count),
            Err(e) => {
                tracing::warn!(error = %e, "Pending application count degraded to zero");
                Aggregate::Degraded(0)
            }
        }
    }
}

/// Divide a minor-unit amount by 1000 and round half away from zero.
fn round_to_thousands(minor: i64) -> i64 {
    (minor as f64 / 1000.0).round() as i64
}
