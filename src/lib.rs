//! Attendance calendar server
//!
//! REST JSON API for employee attendance: check-in/out with lateness
//! classification, a weekly working/holiday calendar with date overrides,
//! and a daily auto-absence sweep.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    /// Time zone for attendance dates and timestamps
    pub tz: Tz,
}

impl AppState {
    /// Local wall-clock time in the configured time zone
    pub fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.tz).naive_local()
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }
}
