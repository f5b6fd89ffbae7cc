//! Day-type resolution: may attendance be recorded on a date?

use chrono::{Datelike, NaiveDate};

use super::calendar::CalendarService;
use crate::{
    error::AppResult,
    models::{
        calendar::{DayResolution, ResolutionSource},
        enums::DayType,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct DayResolver {
    repository: Repository,
    calendar: CalendarService,
}

impl DayResolver {
    pub fn new(repository: Repository, calendar: CalendarService) -> Self {
        Self {
            repository,
            calendar,
        }
    }

    /// Classify a date from what is stored, without generating anything.
    ///
    /// A generated holiday always wins. Otherwise an override decides, then
    /// the generated row, then the weekly default.
    pub async fn resolve(&self, date: NaiveDate) -> AppResult<DayResolution> {
        let day = self.repository.calendar_day(date).await?;
        if let Some(ref day) = day {
            if day.day_type == DayType::Holiday {
                return Ok(DayResolution::new(date, DayType::Holiday, ResolutionSource::Calendar));
            }
        }

        if let Some(event) = self.repository.date_event(date).await? {
            return Ok(DayResolution::new(date, event.event_type, ResolutionSource::Event));
        }

        if let Some(day) = day {
            return Ok(DayResolution::new(date, day.day_type, ResolutionSource::Calendar));
        }

        let settings = self.calendar.weekly_settings().await?;
        Ok(DayResolution::new(
            date,
            settings.get(date.weekday()),
            ResolutionSource::WeeklyDefault,
        ))
    }

    /// Generate the date's month if it has no row yet
    pub async fn ensure_generated(&self, date: NaiveDate) -> AppResult<()> {
        if self.repository.calendar_day(date).await?.is_none() {
            tracing::debug!("No calendar row for {}, generating its month", date);
            self.calendar.generate_month(date.year(), date.month()).await?;
        }
        Ok(())
    }

    /// Lazy generation followed by resolution
    pub async fn is_working_day(&self, date: NaiveDate) -> AppResult<DayResolution> {
        self.ensure_generated(date).await?;
        let resolution = self.resolve(date).await?;
        tracing::debug!(
            "{} resolves to {} via {:?}",
            date,
            resolution.day_type,
            resolution.source
        );
        Ok(resolution)
    }
}
