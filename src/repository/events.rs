//! Date events repository

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{EventStore, PgStore};
use crate::{
    error::AppResult,
    models::{calendar::DateEvent, enums::DayType},
};

#[async_trait]
impl EventStore for PgStore {
    async fn events_between(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<DateEvent>> {
        let rows = sqlx::query_as::<_, DateEvent>(
            r#"
            SELECT event_date, event_type, event_note, created_at, updated_at
            FROM calendar_events
            WHERE event_date BETWEEN $1 AND $2
            ORDER BY event_date
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn date_event(&self, date: NaiveDate) -> AppResult<Option<DateEvent>> {
        let row = sqlx::query_as::<_, DateEvent>(
            "SELECT event_date, event_type, event_note, created_at, updated_at FROM calendar_events WHERE event_date = $1",
        )
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn upsert_event(
        &self,
        date: NaiveDate,
        event_type: DayType,
        note: Option<&str>,
    ) -> AppResult<DateEvent> {
        let row = sqlx::query_as::<_, DateEvent>(
            r#"
            INSERT INTO calendar_events (event_date, event_type, event_note)
            VALUES ($1, $2, $3)
            ON CONFLICT (event_date) DO UPDATE SET
                event_type = EXCLUDED.event_type,
                event_note = EXCLUDED.event_note,
                updated_at = NOW()
            RETURNING event_date, event_type, event_note, created_at, updated_at
            "#,
        )
        .bind(date)
        .bind(event_type)
        .bind(note)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_event(&self, date: NaiveDate) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM calendar_events WHERE event_date = $1")
            .bind(date)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
