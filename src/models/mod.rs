// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod course;
pub mod enrollment;
pub mod metrics;
pub mod progress;
pub mod user;

pub use course::{Chapter, Course, CourseStatus, Lesson};
pub use enrollment::{Enrollment, EnrollmentStatus, LessonProgress};
pub use metrics::{Aggregate, InstructorMetrics};
pub use progress::{compute_progress, EnrollmentRecord, Progress};
pub use user::{ApplicationStatus, InstructorApplication, Role, User};
