// SPDX-License-Identifier: MIT

//! Instructor dashboard metrics and the degraded-result wrapper.

use serde::Serialize;

/// Dashboard metrics for one instructor's courses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct InstructorMetrics {
    /// Courses owned by the instructor
    pub course_count: u32,
    /// Active enrollments across those courses
    pub active_student_count: u32,
    /// Revenue over active enrollments, in thousands of minor units,
    /// rounded to the nearest integer. An empty sum is 0, never null.
    pub revenue_in_thousands: i64,
}

impl InstructorMetrics {
    /// The zero-valued metrics object used for degraded responses.
    pub fn zero() -> Self {
        Self {
            course_count: 0,
            active_student_count: 0,
            revenue_in_thousands: 0,
        }
    }
}

/// An aggregate that may have degraded to a fallback value.
///
/// Aggregation services return `Degraded` instead of an error when an
/// upstream read fails; the route layer decides whether that is
/// acceptable (dashboards: yes, authorization checks: never).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate<T> {
    Fresh(T),
    Degraded(T),
}

impl<T> Aggregate<T> {
    pub fn into_inner(self) -> T {
        match self {
            Aggregate::Fresh(v) | Aggregate::Degraded(v) => v,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Aggregate::Degraded(_))
    }
}
