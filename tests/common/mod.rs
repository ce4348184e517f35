// SPDX-License-Identifier: MIT

use coursebay::config::Config;
use coursebay::db::Db;
use coursebay::middleware::auth::create_jwt;
use coursebay::models::Role;
use coursebay::routes::create_router;
use coursebay::services::{EnrollmentService, MetricsService, StorageUrlResolver};
use coursebay::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> Db {
    Db::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> Db {
    Db::new_mock()
}

/// Create a test app over the given database.
/// Returns the router and the JWT signing key.
#[allow(dead_code)]
pub fn create_test_app_with_db(db: Db) -> (axum::Router, Vec<u8>) {
    let config = Config::test_default();
    let signing_key = config.jwt_signing_key.clone();

    let storage = StorageUrlResolver::new(&config.storage_bucket, &config.storage_domain);
    let enrollments = EnrollmentService::new(db.clone());
    let metrics = MetricsService::new(db.clone());

    let state = Arc::new(AppState {
        config,
        db,
        storage,
        enrollments,
        metrics,
    });

    (create_router(state), signing_key)
}

/// Create a test app with offline mock dependencies.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Vec<u8>) {
    create_test_app_with_db(test_db_offline())
}

/// Create a bearer header value for a test session.
#[allow(dead_code)]
pub fn bearer(user_id: &str, role: Role, signing_key: &[u8]) -> String {
    let token = create_jwt(user_id, role, signing_key).expect("Failed to create test JWT");
    format!("Bearer {}", token)
}
