// SPDX-License-Identifier: MIT

//! Authorization gate.
//!
//! One capability check evaluated in one place, instead of role string
//! comparisons scattered through handlers. Deny-by-default: a missing
//! session, a role mismatch, or a failed enrollment lookup all evaluate
//! to `false`; authorization never degrades to a permissive answer.

use crate::middleware::auth::Session;
use crate::models::Role;
use crate::services::enrollments::{EnrollmentService, RequestScope};

/// Capability required to perform an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement<'a> {
    /// Session role must equal this role exactly.
    Role(Role),
    /// Session user must hold an `Active` enrollment for the course.
    Enrollment { course_id: &'a str },
}

/// Evaluate a requirement against a (possibly absent) session.
pub async fn authorize(
    session: Option<&Session>,
    requirement: Requirement<'_>,
    enrollments: &EnrollmentService,
    scope: &RequestScope,
) -> bool {
    let Some(session) = session else {
        return false;
    };

    match requirement {
        Requirement::Role(role) => session.role == role,
        Requirement::Enrollment { course_id } => {
            match enrollments
                .is_actively_enrolled(scope, &session.user_id, course_id)
                .await
            {
                Ok(enrolled) => enrolled,
                Err(e) => {
                    // Fail closed: an unreadable store never grants access.
                    tracing::warn!(
                        user_id = %session.user_id,
                        course_id,
                        error = %e,
                        "Enrollment check failed, denying"
                    );
                    false
                }
            }
        }
    }
}
