//! Auto-absence sweep and its daily scheduler

use chrono::{Duration, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tokio::task::JoinHandle;

use super::resolver::DayResolver;
use crate::{
    error::AppResult,
    models::{
        attendance::{InsertOutcome, NewAttendance, SweepReport, ABSENCE_CUTOFF_HOURS},
        employee::Employee,
    },
    repository::Repository,
};

/// Next local time at which a daily job scheduled for `at` should fire
pub fn next_run_after(now: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(at);
    if now < today {
        today
    } else {
        today + Duration::days(1)
    }
}

/// Instant at which the sweep for `now`'s employees stops waiting
pub fn absence_cutoff(now: NaiveDateTime, employee: &Employee) -> NaiveDateTime {
    now.date().and_time(employee.scheduled_time) + Duration::hours(ABSENCE_CUTOFF_HOURS)
}

enum Mark {
    Marked,
    BeforeCutoff,
    AlreadyRecorded,
}

#[derive(Clone)]
pub struct SweepService {
    repository: Repository,
    resolver: DayResolver,
    skip_holidays: bool,
}

impl SweepService {
    pub fn new(repository: Repository, resolver: DayResolver, skip_holidays: bool) -> Self {
        Self {
            repository,
            resolver,
            skip_holidays,
        }
    }

    /// Insert an absence for every employee without a record today whose
    /// cutoff has passed. Safe to run any number of times.
    #[tracing::instrument(skip(self))]
    pub async fn run_auto_absence(&self, now: NaiveDateTime) -> AppResult<SweepReport> {
        let today = now.date();
        let mut report = SweepReport {
            success: true,
            date: Some(today),
            ..SweepReport::default()
        };

        if self.skip_holidays && !self.resolver.is_working_day(today).await?.is_working_day {
            tracing::info!("Auto-absence sweep skipped, {} is a holiday", today);
            report.holiday = true;
            return Ok(report);
        }

        let candidates = self.repository.employees_without_record(today).await?;
        report.candidates = candidates.len();

        for employee in &candidates {
            match self.mark_absent(employee, now).await {
                Ok(Mark::Marked) => report.marked += 1,
                Ok(Mark::BeforeCutoff) => report.before_cutoff += 1,
                Ok(Mark::AlreadyRecorded) => report.already_recorded += 1,
                Err(e) => {
                    tracing::warn!("Auto-absence failed for {}: {}", employee.employee_id, e);
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            "Auto-absence sweep for {}: {} marked, {} before cutoff, {} already recorded, {} failed",
            today,
            report.marked,
            report.before_cutoff,
            report.already_recorded,
            report.failed
        );
        Ok(report)
    }

    async fn mark_absent(&self, employee: &Employee, now: NaiveDateTime) -> AppResult<Mark> {
        let today = now.date();
        if now < absence_cutoff(now, employee) {
            tracing::debug!("{} not yet past cutoff", employee.employee_id);
            return Ok(Mark::BeforeCutoff);
        }

        if self
            .repository
            .attendance_for(&employee.employee_id, today)
            .await?
            .is_some()
        {
            return Ok(Mark::AlreadyRecorded);
        }

        let row = NewAttendance::auto_absence(
            &employee.employee_id,
            &employee.name,
            today,
            employee.scheduled_time,
        );
        match self.repository.insert_attendance(&row).await? {
            InsertOutcome::Inserted(_) => {
                tracing::debug!("Marked {} absent for {}", employee.employee_id, today);
                Ok(Mark::Marked)
            }
            InsertOutcome::AlreadyExists => Ok(Mark::AlreadyRecorded),
        }
    }

    /// Run the sweep every day at `at` local time in `tz`
    pub fn spawn_daily(self, tz: Tz, at: NaiveTime) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let now = Utc::now().with_timezone(&tz).naive_local();
                let next = next_run_after(now, at);
                let wait = tz
                    .from_local_datetime(&next)
                    .earliest()
                    .map(|t| t.with_timezone(&Utc) - Utc::now())
                    .unwrap_or_else(|| next - now);
                tracing::info!("Next auto-absence sweep at {} ({})", next, tz);

                tokio::time::sleep(wait.to_std().unwrap_or_default()).await;

                let now = Utc::now().with_timezone(&tz).naive_local();
                if let Err(e) = self.run_auto_absence(now).await {
                    tracing::error!("Auto-absence sweep failed: {}", e);
                }
            }
        })
    }
}
