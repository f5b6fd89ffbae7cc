//! API handlers for the attendance REST endpoints

pub mod attendance;
pub mod calendar;
pub mod employees;
pub mod events;
pub mod health;
pub mod openapi;
pub mod settings;

use chrono::NaiveDate;

use crate::{error::AppResult, models::calendar::parse_date};

/// Parse a `:date` path segment
pub(crate) fn path_date(value: &str) -> AppResult<NaiveDate> {
    parse_date(value, "date")
}
