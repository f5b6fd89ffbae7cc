//! Calendar generation, resolution and date event tests against the in-memory store

use std::collections::BTreeMap;

use attendance_server::{
    config::AttendanceConfig,
    error::AppError,
    models::{
        calendar::ResolutionSource,
        employee::NewEmployee,
        enums::DayType,
        NewAttendance,
    },
    repository::{memory::MemoryStore, CalendarStore, EmployeeStore, EventStore, AttendanceStore},
    services::Services,
};
use chrono::{NaiveDate, NaiveTime};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn nine() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap()
}

fn setup() -> (MemoryStore, Services) {
    let store = MemoryStore::new();
    let services = Services::new(store.clone().into_repository(), &AttendanceConfig::default());
    (store, services)
}

async fn add_employee(store: &MemoryStore, id: &str) {
    store
        .create_employee(&NewEmployee {
            employee_id: id.to_string(),
            name: format!("Employee {}", id),
            email: None,
            scheduled_time: nine(),
            password_hash: None,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_generate_month_is_deterministic() {
    let (store, services) = setup();
    store
        .upsert_event(date(2024, 1, 10), DayType::Special, Some("Audit"))
        .await
        .unwrap();

    let first = services.calendar.generate_month(2024, 1).await.unwrap();
    let stored_first = store.month_days(2024, 1).await.unwrap();
    let second = services.calendar.generate_month(2024, 1).await.unwrap();
    let stored_second = store.month_days(2024, 1).await.unwrap();

    assert_eq!(first.days, second.days);
    assert_eq!(stored_first, stored_second);
    assert_eq!(stored_first.len(), 31);
    assert_eq!(stored_first[9].day_type, DayType::Special);
    assert_eq!(stored_first[9].description, "Audit");
}

#[tokio::test]
async fn test_generate_month_rejects_invalid_month() {
    let (_, services) = setup();
    let err = services.calendar.generate_month(2024, 13).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_redundant_override_is_pruned() {
    let (store, services) = setup();

    // Tuesday is working by default
    let result = services
        .events
        .save_date_event(date(2024, 1, 9), "working", Some("Normal day"))
        .await
        .unwrap();

    assert!(result.success);
    assert!(result.event.is_none());
    assert!(store.date_event(date(2024, 1, 9)).await.unwrap().is_none());

    let day = result.calendar_day.unwrap();
    assert_eq!(day.day_type, DayType::Working);
    assert_eq!(day.description, "Tuesday - Working");
}

#[tokio::test]
async fn test_generation_reports_pruned_dates() {
    let (store, services) = setup();
    store
        .upsert_event(date(2024, 1, 13), DayType::Holiday, None)
        .await
        .unwrap();

    let generated = services.calendar.generate_month(2024, 1).await.unwrap();
    assert_eq!(generated.pruned_events, vec![date(2024, 1, 13)]);
    assert!(store.events_between(date(2024, 1, 1), date(2024, 1, 31)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_event_holiday_beats_generated_working_day() {
    let (store, services) = setup();
    services.calendar.generate_month(2024, 1).await.unwrap();

    // Override written after generation so the calendar row still says working
    store
        .upsert_event(date(2024, 1, 8), DayType::Holiday, None)
        .await
        .unwrap();
    let day = store.calendar_day(date(2024, 1, 8)).await.unwrap().unwrap();
    assert_eq!(day.day_type, DayType::Working);

    let resolution = services.resolver.is_working_day(date(2024, 1, 8)).await.unwrap();
    assert!(!resolution.is_working_day);
    assert_eq!(resolution.source, ResolutionSource::Event);
}

#[tokio::test]
async fn test_generated_holiday_wins_over_event() {
    let (store, services) = setup();
    services.calendar.generate_month(2024, 1).await.unwrap();
    store
        .upsert_event(date(2024, 1, 6), DayType::Working, None)
        .await
        .unwrap();

    let resolution = services.resolver.resolve(date(2024, 1, 6)).await.unwrap();
    assert!(!resolution.is_working_day);
    assert_eq!(resolution.source, ResolutionSource::Calendar);
}

#[tokio::test]
async fn test_resolve_falls_back_to_weekly_settings_without_generating() {
    let (store, services) = setup();

    let resolution = services.resolver.resolve(date(2024, 5, 4)).await.unwrap();
    assert_eq!(resolution.source, ResolutionSource::WeeklyDefault);
    assert!(!resolution.is_working_day);
    assert!(store.month_days(2024, 5).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_is_working_day_generates_missing_month() {
    let (store, services) = setup();

    let resolution = services.resolver.is_working_day(date(2024, 5, 6)).await.unwrap();
    assert!(resolution.is_working_day);
    assert_eq!(resolution.source, ResolutionSource::Calendar);
    assert_eq!(store.month_days(2024, 5).await.unwrap().len(), 31);
}

#[tokio::test]
async fn test_half_day_and_special_are_working() {
    let (_, services) = setup();
    services
        .events
        .save_date_event(date(2024, 1, 11), "half_day", None)
        .await
        .unwrap();
    services
        .events
        .save_date_event(date(2024, 1, 12), "special", Some("Town hall"))
        .await
        .unwrap();

    let half = services.resolver.is_working_day(date(2024, 1, 11)).await.unwrap();
    let special = services.resolver.is_working_day(date(2024, 1, 12)).await.unwrap();
    assert!(half.is_working_day);
    assert_eq!(half.day_type, DayType::HalfDay);
    assert!(special.is_working_day);
}

#[tokio::test]
async fn test_saturday_saved_as_working_keeps_attendance() {
    let (store, services) = setup();
    add_employee(&store, "E1").await;
    let saturday = date(2024, 1, 6);
    store
        .insert_attendance(&NewAttendance::check_in(
            "E1",
            "Employee E1",
            saturday,
            nine(),
            saturday.and_hms_opt(9, 5, 0).unwrap(),
        ))
        .await
        .unwrap();

    let result = services
        .events
        .save_date_event(saturday, "working", Some("Make-up day"))
        .await
        .unwrap();

    assert!(result.enforcement.is_none());
    let day = result.calendar_day.unwrap();
    assert_eq!(day.day_type, DayType::Working);
    assert_eq!(day.description, "Make-up day");
    assert!(services.resolver.is_working_day(saturday).await.unwrap().is_working_day);
    assert!(store.attendance_for("E1", saturday).await.unwrap().is_some());
}

#[tokio::test]
async fn test_monday_saved_as_holiday_deletes_attendance() {
    let (store, services) = setup();
    add_employee(&store, "E1").await;
    add_employee(&store, "E2").await;
    let monday = date(2024, 1, 8);

    for id in ["E1", "E2"] {
        services
            .attendance
            .check_in(id, monday, monday.and_hms_opt(9, 0, 0).unwrap())
            .await
            .unwrap();
    }

    let result = services
        .events
        .save_date_event(monday, "holiday", Some("Strike"))
        .await
        .unwrap();

    let enforcement = result.enforcement.unwrap();
    assert_eq!(enforcement.deleted_records, 2);
    assert!(result.message.contains("enforced"));

    let day = result.calendar_day.unwrap();
    assert_eq!(day.day_type, DayType::Holiday);
    assert_eq!(day.description, "Holiday - Attendance blocked");

    assert!(!services.resolver.is_working_day(monday).await.unwrap().is_working_day);
    assert!(store.attendance_for("E1", monday).await.unwrap().is_none());
    assert!(store.attendance_for("E2", monday).await.unwrap().is_none());
}

#[tokio::test]
async fn test_save_event_rejects_unknown_type() {
    let (store, services) = setup();
    let err = services
        .events
        .save_date_event(date(2024, 1, 8), "weekend", None)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert!(store.date_event(date(2024, 1, 8)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_holiday_on_default_holiday_still_enforces() {
    let (store, services) = setup();
    add_employee(&store, "E1").await;
    let saturday = date(2024, 1, 6);
    store
        .insert_attendance(&NewAttendance::check_in(
            "E1",
            "Employee E1",
            saturday,
            nine(),
            saturday.and_hms_opt(9, 0, 0).unwrap(),
        ))
        .await
        .unwrap();

    let result = services
        .events
        .save_date_event(saturday, "holiday", Some("Closed"))
        .await
        .unwrap();

    // Same as the weekday default, so the override itself is pruned
    assert!(result.event.is_none());
    assert!(store.date_event(saturday).await.unwrap().is_none());

    let enforcement = result.enforcement.unwrap();
    assert_eq!(enforcement.deleted_records, 1);
    assert_eq!(
        result.calendar_day.unwrap().description,
        "Holiday - Attendance blocked"
    );
    assert!(store.attendance_for("E1", saturday).await.unwrap().is_none());
    assert!(!services.resolver.is_working_day(saturday).await.unwrap().is_working_day);
}

#[tokio::test]
async fn test_overlong_note_is_rejected_before_saving() {
    let (store, services) = setup();
    let day = date(2031, 3, 12);

    let err = services
        .events
        .save_date_event(day, "special", Some("n".repeat(256).as_str()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(store.date_event(day).await.unwrap().is_none());
    assert!(store.month_days(2031, 3).await.unwrap().is_empty());

    // The month still generates normally afterwards
    let resolution = services.resolver.is_working_day(date(2031, 3, 3)).await.unwrap();
    assert!(resolution.is_working_day);

    let longest = "n".repeat(255);
    let saved = services
        .events
        .save_date_event(day, "special", Some(longest.as_str()))
        .await
        .unwrap();
    assert_eq!(saved.calendar_day.unwrap().description, longest);
}

#[tokio::test]
async fn test_remove_event_is_idempotent_and_restores_default() {
    let (store, services) = setup();
    let monday = date(2024, 1, 8);
    services
        .events
        .save_date_event(monday, "holiday", None)
        .await
        .unwrap();

    let first = services.events.remove_date_event(monday).await.unwrap();
    assert!(first.success);
    assert!(first.removed);
    assert_eq!(first.day_type, DayType::Working);

    let day = store.calendar_day(monday).await.unwrap().unwrap();
    assert_eq!(day.day_type, DayType::Working);
    assert_eq!(day.description, "Monday - Working");

    let second = services.events.remove_date_event(monday).await.unwrap();
    assert!(second.success);
    assert!(!second.removed);
    assert_eq!(store.calendar_day(monday).await.unwrap().unwrap(), day);
}

#[tokio::test]
async fn test_set_settings_regenerates_two_years() {
    let (store, services) = setup();
    let update: BTreeMap<String, String> = [
        ("friday".to_string(), "half_day".to_string()),
        ("saturday".to_string(), "working".to_string()),
    ]
    .into_iter()
    .collect();

    let saved = services
        .settings
        .set_settings(&update, date(2024, 3, 15))
        .await
        .unwrap();

    assert_eq!(saved.regenerated_months.len(), 24);
    assert_eq!(saved.regenerated_months.first().unwrap(), "2024-01");
    assert_eq!(saved.regenerated_months.last().unwrap(), "2025-12");
    // Omitted weekdays take their defaults
    assert_eq!(saved.settings.sunday, DayType::Holiday);

    let friday = store.calendar_day(date(2025, 6, 6)).await.unwrap().unwrap();
    assert_eq!(friday.day_type, DayType::HalfDay);
    assert_eq!(friday.description, "Friday - Half day");
    let saturday = store.calendar_day(date(2024, 1, 6)).await.unwrap().unwrap();
    assert_eq!(saturday.day_type, DayType::Working);

    assert_eq!(services.settings.get_settings().await.unwrap(), saved.settings);
}

#[tokio::test]
async fn test_invalid_settings_are_rejected_as_a_batch() {
    let (store, services) = setup();
    let update: BTreeMap<String, String> = [
        ("friday".to_string(), "half_day".to_string()),
        ("caturday".to_string(), "holiday".to_string()),
        ("monday".to_string(), "off".to_string()),
    ]
    .into_iter()
    .collect();

    let err = services
        .settings
        .set_settings(&update, date(2024, 3, 15))
        .await
        .unwrap_err();

    match err {
        AppError::Validation(msg) => {
            assert!(msg.contains("caturday"));
            assert!(msg.contains("monday"));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // Nothing persisted or generated
    assert_eq!(
        services.settings.get_settings().await.unwrap().friday,
        DayType::Working
    );
    assert!(store.month_days(2024, 3).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_month_calendar_generates_lazily() {
    let (store, services) = setup();
    assert!(store.month_days(2024, 2).await.unwrap().is_empty());

    let days = services.calendar.month_calendar(2024, 2).await.unwrap();
    assert_eq!(days.len(), 29);
    assert_eq!(store.month_days(2024, 2).await.unwrap(), days);
}

#[tokio::test]
async fn test_list_events_filters_by_range() {
    let (_, services) = setup();
    for (d, t) in [(8, "holiday"), (13, "working"), (20, "working")] {
        services
            .events
            .save_date_event(date(2024, 1, d), t, None)
            .await
            .unwrap();
    }

    let all = services.calendar.list_events(None, None).await.unwrap();
    assert_eq!(all.len(), 3);

    let some = services
        .calendar
        .list_events(Some(date(2024, 1, 10)), Some(date(2024, 1, 15)))
        .await
        .unwrap();
    assert_eq!(some.len(), 1);
    assert_eq!(some[0].event_date, date(2024, 1, 13));

    let err = services
        .calendar
        .list_events(Some(date(2024, 2, 1)), Some(date(2024, 1, 1)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}
