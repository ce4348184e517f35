// SPDX-License-Identifier: MIT

//! Joined enrollment records and the progress aggregator.

use serde::Serialize;

use crate::models::course::Course;
use crate::models::enrollment::{Enrollment, LessonProgress};

/// An active enrollment joined with the current course structure, the
/// owner's display fields, and the enrollment's progress records.
/// Produced by the enrollment query service; read-only.
#[derive(Debug, Clone)]
pub struct EnrollmentRecord {
    pub enrollment: Enrollment,
    pub course: Course,
    /// Owning instructor's display name ("Unknown" if the account is gone)
    pub owner_name: String,
    /// Owning instructor's image: storage key or full URL
    pub owner_image: Option<String>,
    pub progress: Vec<LessonProgress>,
}

/// Completion summary for one enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(ts_rs::TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Progress {
    pub total_lessons: u32,
    pub completed_lessons: u32,
    /// 0..=100, rounded half away from zero
    pub percent: u8,
}

/// Compute the completion summary for one enrollment.
///
/// Pure function: `total_lessons` comes from the live course structure,
/// `completed_lessons` from the progress records. Completions are capped
/// at the lesson total so records left behind by deleted lessons cannot
/// push the percentage past 100. A course with zero lessons yields 0%.
pub fn compute_progress(record: &EnrollmentRecord) -> Progress {
    let total_lessons = record.course.total_lessons();
    let completed = record.progress.iter().filter(|p| p.completed).count() as u32;
    let completed_lessons = completed.min(total_lessons);

    let percent = if total_lessons > 0 {
        (f64::from(completed_lessons) / f64::from(total_lessons) * 100.0).round() as u8
    } else {
        0
    };

    Progress {
        total_lessons,
        completed_lessons,
        percent,
    }
}
