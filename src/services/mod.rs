// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod authz;
pub mod enrollments;
pub mod metrics;
pub mod storage;

pub use authz::{authorize, Requirement};
pub use enrollments::{EnrollmentService, RequestScope};
pub use metrics::MetricsService;
pub use storage::StorageUrlResolver;
