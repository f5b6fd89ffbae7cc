//! Weekly calendar settings (weekday -> default day type)

use std::collections::BTreeMap;

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::enums::{parse_weekday_key, weekday_key, DayType, WEEKDAYS};
use crate::error::{AppError, AppResult};

/// Default day type for every weekday
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WeeklySettings {
    pub sunday: DayType,
    pub monday: DayType,
    pub tuesday: DayType,
    pub wednesday: DayType,
    pub thursday: DayType,
    pub friday: DayType,
    pub saturday: DayType,
}

impl Default for WeeklySettings {
    fn default() -> Self {
        Self {
            sunday: DayType::Holiday,
            monday: DayType::Working,
            tuesday: DayType::Working,
            wednesday: DayType::Working,
            thursday: DayType::Working,
            friday: DayType::Working,
            saturday: DayType::Holiday,
        }
    }
}

impl WeeklySettings {
    pub fn get(&self, day: Weekday) -> DayType {
        match day {
            Weekday::Sun => self.sunday,
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
        }
    }

    pub fn set(&mut self, day: Weekday, day_type: DayType) {
        let slot = match day {
            Weekday::Sun => &mut self.sunday,
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
        };
        *slot = day_type;
    }

    /// Build settings from a persisted mapping. Missing or unreadable
    /// entries keep their defaults.
    pub fn from_stored(stored: &BTreeMap<String, String>) -> Self {
        let mut settings = Self::default();
        for day in WEEKDAYS {
            match stored.get(weekday_key(day)).map(|v| v.parse::<DayType>()) {
                Some(Ok(day_type)) => settings.set(day, day_type),
                Some(Err(e)) => {
                    tracing::warn!("Ignoring stored calendar setting for {}: {}", weekday_key(day), e)
                }
                None => {}
            }
        }
        settings
    }

    /// Validate an update as a whole. Every invalid weekday name or day type
    /// is reported; weekdays not supplied take their defaults.
    pub fn from_update(update: &BTreeMap<String, String>) -> AppResult<Self> {
        let mut settings = Self::default();
        let mut invalid = Vec::new();

        for (key, value) in update {
            match (parse_weekday_key(key), value.parse::<DayType>()) {
                (Some(day), Ok(day_type)) => settings.set(day, day_type),
                _ => invalid.push(key.clone()),
            }
        }

        if !invalid.is_empty() {
            return Err(AppError::Validation(format!(
                "Invalid calendar settings for: {} (weekdays are sunday..saturday, day types are working, holiday, half_day, special)",
                invalid.join(", ")
            )));
        }

        Ok(settings)
    }

    /// Mapping form used for persistence
    pub fn to_map(&self) -> BTreeMap<String, String> {
        WEEKDAYS
            .into_iter()
            .map(|day| (weekday_key(day).to_string(), self.get(day).as_str().to_string()))
            .collect()
    }
}
