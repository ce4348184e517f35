// SPDX-License-Identifier: MIT

//! Coursebay API Server
//!
//! Serves the enrollment, progress, and dashboard read API for the
//! course marketplace frontend.

use coursebay::{
    config::Config,
    db::Db,
    services::{EnrollmentService, MetricsService, StorageUrlResolver},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Coursebay API");

    // Initialize Firestore database
    let db = Db::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    let storage = StorageUrlResolver::new(&config.storage_bucket, &config.storage_domain);
    let enrollments = EnrollmentService::new(db.clone());
    let metrics = MetricsService::new(db.clone());

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        storage,
        enrollments,
        metrics,
    });

    // Build router
    let app = coursebay::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("coursebay=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
