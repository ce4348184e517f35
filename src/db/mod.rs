//! Database layer (Firestore).

pub mod firestore;

pub use firestore::Db;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const COURSES: &str = "courses";
    pub const ENROLLMENTS: &str = "enrollments";
    /// One document per (enrollment, lesson) pair
    pub const LESSON_PROGRESS: &str = "lesson_progress";
    pub const INSTRUCTOR_APPLICATIONS: &str = "instructor_applications";
}
