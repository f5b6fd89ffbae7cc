//! Calendar days repository

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};

use super::{CalendarStore, PgStore};
use crate::{
    error::AppResult,
    models::{calendar::CalendarDay, enums::DayType},
};

/// Advisory lock key for one (year, month)
fn month_lock_key(year: i32, month: u32) -> i64 {
    i64::from(year) * 100 + i64::from(month)
}

#[async_trait]
impl CalendarStore for PgStore {
    async fn month_days(&self, year: i32, month: u32) -> AppResult<Vec<CalendarDay>> {
        let rows = sqlx::query_as::<_, CalendarDay>(
            r#"
            SELECT year, month, day, day_type, description
            FROM calendar_days
            WHERE year = $1 AND month = $2
            ORDER BY day
            "#,
        )
        .bind(year)
        .bind(month as i32)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn calendar_day(&self, date: NaiveDate) -> AppResult<Option<CalendarDay>> {
        let row = sqlx::query_as::<_, CalendarDay>(
            r#"
            SELECT year, month, day, day_type, description
            FROM calendar_days
            WHERE year = $1 AND month = $2 AND day = $3
            "#,
        )
        .bind(date.year())
        .bind(date.month() as i32)
        .bind(date.day() as i32)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn replace_month(
        &self,
        year: i32,
        month: u32,
        days: &[CalendarDay],
        pruned: &[NaiveDate],
    ) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        // Released at commit or rollback
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(month_lock_key(year, month))
            .execute(&mut *tx)
            .await?;

        if !pruned.is_empty() {
            sqlx::query("DELETE FROM calendar_events WHERE event_date = ANY($1)")
                .bind(pruned)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("DELETE FROM calendar_days WHERE year = $1 AND month = $2")
            .bind(year)
            .bind(month as i32)
            .execute(&mut *tx)
            .await?;

        for day in days {
            sqlx::query(
                r#"
                INSERT INTO calendar_days (year, month, day, day_type, description)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(day.year)
            .bind(day.month)
            .bind(day.day)
            .bind(day.day_type)
            .bind(&day.description)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn update_calendar_day(
        &self,
        date: NaiveDate,
        day_type: DayType,
        description: &str,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE calendar_days SET day_type = $4, description = $5
            WHERE year = $1 AND month = $2 AND day = $3
            "#,
        )
        .bind(date.year())
        .bind(date.month() as i32)
        .bind(date.day() as i32)
        .bind(day_type)
        .bind(description)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
