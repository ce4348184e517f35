// SPDX-License-Identifier: MIT

//! Coursebay: backend API for an online-course marketplace.
//!
//! This crate provides the read-side aggregation layer of the
//! marketplace: resolving sessions, authorizing access, joining active
//! enrollments with course structure and lesson progress, and computing
//! dashboard metrics for instructors and admins.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Db;
use services::{EnrollmentService, MetricsService, StorageUrlResolver};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub storage: StorageUrlResolver,
    pub enrollments: EnrollmentService,
    pub metrics: MetricsService,
}
