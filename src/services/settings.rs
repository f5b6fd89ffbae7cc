//! Weekly calendar settings service

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use super::calendar::CalendarService;
use crate::{error::AppResult, models::settings::WeeklySettings, repository::Repository};

/// Result of saving weekly settings
#[derive(Debug, Serialize, ToSchema)]
pub struct SettingsSaved {
    pub success: bool,
    pub settings: WeeklySettings,
    /// Months regenerated with the new settings ("2024-01")
    pub regenerated_months: Vec<String>,
}

#[derive(Clone)]
pub struct SettingsService {
    repository: Repository,
    calendar: CalendarService,
}

impl SettingsService {
    pub fn new(repository: Repository, calendar: CalendarService) -> Self {
        Self {
            repository,
            calendar,
        }
    }

    /// Get current settings
    pub async fn get_settings(&self) -> AppResult<WeeklySettings> {
        self.calendar.weekly_settings().await
    }

    /// Validate and save settings, then regenerate this year and next
    pub async fn set_settings(
        &self,
        update: &BTreeMap<String, String>,
        today: NaiveDate,
    ) -> AppResult<SettingsSaved> {
        let settings = WeeklySettings::from_update(update)?;
        self.repository.save_weekly_settings(&settings.to_map()).await?;
        tracing::info!("Weekly calendar settings saved: {:?}", settings);

        let regenerated_months = self.calendar.regenerate_years(today).await?;
        tracing::info!("Regenerated {} calendar months", regenerated_months.len());

        Ok(SettingsSaved {
            success: true,
            settings,
            regenerated_months,
        })
    }
}
