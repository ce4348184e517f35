// SPDX-License-Identifier: MIT

//! Enrollment and lesson-progress models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Enrollment status. Only `Active` enrollments count toward progress
/// and revenue; other states are set by the payment side on
/// cancellation or refund.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnrollmentStatus {
    Active,
    Pending,
    Cancelled,
    Refunded,
}

impl EnrollmentStatus {
    /// Serialized form, for Firestore field filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::Active => "Active",
            EnrollmentStatus::Pending => "Pending",
            EnrollmentStatus::Cancelled => "Cancelled",
            EnrollmentStatus::Refunded => "Refunded",
        }
    }
}

/// Enrollment record, created by the payment side at successful
/// checkout. Read-only to this layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: String,
    /// Enrolled learner
    pub user_id: String,
    pub course_id: String,
    /// Denormalized course owner, set at creation. Lets instructor
    /// metrics filter enrollments without joining through courses.
    pub course_owner_id: String,
    pub status: EnrollmentStatus,
    /// Amount paid, in minor currency units
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

/// One logical completion record per (enrollment, lesson) pair.
///
/// The document ID is `"{enrollment_id}_{lesson_id}"` so concurrent
/// writes collapse into one record instead of creating duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonProgress {
    pub enrollment_id: String,
    pub lesson_id: String,
    pub completed: bool,
    pub updated_at: DateTime<Utc>,
}

impl LessonProgress {
    /// Deterministic document ID for the (enrollment, lesson) pair.
    pub fn doc_id(enrollment_id: &str, lesson_id: &str) -> String {
        format!("{}_{}", enrollment_id, lesson_id)
    }
}
