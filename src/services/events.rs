//! Date events service (save/remove overrides, holiday enforcement)

use chrono::{Datelike, NaiveDate};

use super::calendar::CalendarService;
use crate::{
    error::{AppError, AppResult},
    models::{
        calendar::{
            default_description, HolidayEnforcement, RemoveEventResult, SaveEventResult,
            HOLIDAY_ENFORCED_DESCRIPTION, MAX_EVENT_NOTE_CHARS,
        },
        enums::DayType,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct EventsService {
    repository: Repository,
    calendar: CalendarService,
}

impl EventsService {
    pub fn new(repository: Repository, calendar: CalendarService) -> Self {
        Self {
            repository,
            calendar,
        }
    }

    /// Upsert an override, regenerate its month and enforce holidays
    pub async fn save_date_event(
        &self,
        date: NaiveDate,
        event_type: &str,
        note: Option<&str>,
    ) -> AppResult<SaveEventResult> {
        let event_type: DayType = event_type.parse().map_err(AppError::Validation)?;
        let note = note.map(str::trim).filter(|n| !n.is_empty());
        if let Some(note) = note {
            if note.chars().count() > MAX_EVENT_NOTE_CHARS {
                return Err(AppError::Validation(format!(
                    "event_note must be at most {} characters",
                    MAX_EVENT_NOTE_CHARS
                )));
            }
        }

        tracing::info!("Saving calendar event {} -> {}", date, event_type);
        self.repository.upsert_event(date, event_type, note).await?;
        self.calendar.generate_month(date.year(), date.month()).await?;

        let enforcement = if event_type == DayType::Holiday {
            Some(self.enforce_holiday(date).await?)
        } else {
            None
        };

        // None when the override matched the weekday default and was pruned
        let event = self.repository.date_event(date).await?;
        let calendar_day = self.repository.calendar_day(date).await?;

        let message = match enforcement {
            Some(_) => "Holiday saved and enforced immediately".to_string(),
            None => format!("{} event saved", event_type.label()),
        };

        Ok(SaveEventResult {
            success: true,
            message,
            event,
            calendar_day,
            enforcement,
        })
    }

    /// Delete the override (if any) and reset the day to its weekday default
    pub async fn remove_date_event(&self, date: NaiveDate) -> AppResult<RemoveEventResult> {
        let removed = self.repository.delete_event(date).await?;
        if !removed {
            tracing::debug!("No calendar event to remove for {}", date);
        }

        let settings = self.calendar.weekly_settings().await?;
        let day_type = settings.get(date.weekday());
        let updated = self
            .repository
            .update_calendar_day(date, day_type, &default_description(date, day_type))
            .await?;

        tracing::info!(
            "Removed calendar event for {} (existed: {}, calendar row reset: {})",
            date,
            removed,
            updated
        );

        Ok(RemoveEventResult {
            success: true,
            date,
            removed,
            day_type,
        })
    }

    /// Delete all attendance for the date and mark its row as a blocked holiday
    async fn enforce_holiday(&self, date: NaiveDate) -> AppResult<HolidayEnforcement> {
        let deleted_records = self.repository.delete_attendance_on(date).await?;
        self.repository
            .update_calendar_day(date, DayType::Holiday, HOLIDAY_ENFORCED_DESCRIPTION)
            .await?;

        tracing::info!("Holiday enforced for {}: deleted {} attendance records", date, deleted_records);

        Ok(HolidayEnforcement {
            date,
            deleted_records,
            message: format!(
                "Holiday enforced, deleted {} attendance records and blocked check-ins",
                deleted_records
            ),
        })
    }
}
