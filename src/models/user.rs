//! User and instructor-application models.
//!
//! Users are created by the external identity service; this layer only
//! reads them.

use serde::{Deserialize, Serialize};

/// Role attached to a session by the identity service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Instructor,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Instructor => "instructor",
            Role::Student => "student",
        }
    }

    /// Parse a role claim. Unknown values are rejected, not defaulted,
    /// so a malformed token can never gain a role.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "instructor" => Some(Role::Instructor),
            "student" => Some(Role::Student),
            _ => None,
        }
    }
}

/// User profile stored in Firestore (written by the identity service).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Identity service user ID (also used as document ID)
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address (may be None if not shared)
    pub email: Option<String>,
    /// Profile image: storage key or full URL
    pub image: Option<String>,
    pub role: Role,
    /// When the account was created (ISO 8601)
    pub created_at: String,
}

/// Application to become an instructor, reviewed by admins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructorApplication {
    /// Applicant user ID (also used as document ID)
    pub user_id: String,
    pub status: ApplicationStatus,
    /// When the application was submitted (ISO 8601)
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}
