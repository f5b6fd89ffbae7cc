//! Calendar generation: weekly settings + date events -> calendar days

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::{
    error::{AppError, AppResult},
    models::{
        calendar::{
            custom_description, default_description, month_bounds, CalendarDay, DateEvent,
            MonthGeneration,
        },
        settings::WeeklySettings,
    },
    repository::Repository,
};

/// Rows for a month plus the overrides that turned out to be redundant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthPlan {
    pub days: Vec<CalendarDay>,
    pub pruned: Vec<NaiveDate>,
}

/// Compute the calendar rows of a month.
///
/// An event whose type differs from the weekday default wins and carries its
/// note (or "Custom: <label>"). An event equal to the default is reported in
/// `pruned` and the default is used.
pub fn plan_month(
    year: i32,
    month: u32,
    settings: &WeeklySettings,
    events: &[DateEvent],
) -> AppResult<MonthPlan> {
    let (first, last) = month_bounds(year, month)?;
    let by_date: HashMap<NaiveDate, &DateEvent> =
        events.iter().map(|e| (e.event_date, e)).collect();

    let mut days = Vec::with_capacity(31);
    let mut pruned = Vec::new();

    for date in first.iter_days().take_while(|d| *d <= last) {
        let default_type = settings.get(date.weekday());
        let day = match by_date.get(&date) {
            Some(event) if event.event_type != default_type => {
                let description = match event.event_note.as_deref().map(str::trim) {
                    Some(note) if !note.is_empty() => note.to_string(),
                    _ => custom_description(event.event_type),
                };
                CalendarDay::new(date, event.event_type, description)
            }
            Some(_) => {
                pruned.push(date);
                CalendarDay::new(date, default_type, default_description(date, default_type))
            }
            None => CalendarDay::new(date, default_type, default_description(date, default_type)),
        };
        days.push(day);
    }

    Ok(MonthPlan { days, pruned })
}

#[derive(Clone)]
pub struct CalendarService {
    repository: Repository,
}

impl CalendarService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Current weekly settings with defaults filled in
    pub async fn weekly_settings(&self) -> AppResult<WeeklySettings> {
        let stored = self.repository.load_weekly_settings().await?;
        Ok(WeeklySettings::from_stored(&stored))
    }

    /// (Re)generate every day of a month
    #[tracing::instrument(skip(self))]
    pub async fn generate_month(&self, year: i32, month: u32) -> AppResult<MonthGeneration> {
        let (first, last) = month_bounds(year, month)?;
        let settings = self.weekly_settings().await?;
        let events = self.repository.events_between(first, last).await?;

        let plan = plan_month(year, month, &settings, &events)?;
        for date in &plan.pruned {
            tracing::info!("Pruning redundant calendar override for {}", date);
        }

        self.repository
            .replace_month(year, month, &plan.days, &plan.pruned)
            .await
            .map_err(|e| {
                tracing::error!("Failed to store calendar for {}-{:02}: {}", year, month, e);
                e
            })?;

        tracing::info!(
            "Generated calendar for {}-{:02} ({} days, {} overrides pruned)",
            year,
            month,
            plan.days.len(),
            plan.pruned.len()
        );

        Ok(MonthGeneration {
            success: true,
            year,
            month,
            days: plan.days,
            pruned_events: plan.pruned,
        })
    }

    /// Regenerate all months of `today`'s year and the next one
    pub async fn regenerate_years(&self, today: NaiveDate) -> AppResult<Vec<String>> {
        let mut regenerated = Vec::with_capacity(24);
        for year in today.year()..=today.year() + 1 {
            for month in 1..=12 {
                self.generate_month(year, month).await?;
                regenerated.push(format!("{}-{:02}", year, month));
            }
        }
        Ok(regenerated)
    }

    /// A month's rows, generated first when none exist
    pub async fn month_calendar(&self, year: i32, month: u32) -> AppResult<Vec<CalendarDay>> {
        month_bounds(year, month)?;
        let days = self.repository.month_days(year, month).await?;
        if !days.is_empty() {
            return Ok(days);
        }
        Ok(self.generate_month(year, month).await?.days)
    }

    /// Generated row for a date, if any
    pub async fn calendar_day(&self, date: NaiveDate) -> AppResult<Option<CalendarDay>> {
        self.repository.calendar_day(date).await
    }

    /// List overrides in an optional date range
    pub async fn list_events(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> AppResult<Vec<DateEvent>> {
        let start = start.or_else(|| NaiveDate::from_ymd_opt(1900, 1, 1));
        let end = end.or_else(|| NaiveDate::from_ymd_opt(9999, 12, 31));
        let (Some(start), Some(end)) = (start, end) else {
            return Ok(Vec::new());
        };
        if start > end {
            return Err(AppError::Validation(
                "start_date must not be after end_date".to_string(),
            ));
        }
        self.repository.events_between(start, end).await
    }
}
