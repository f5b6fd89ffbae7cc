//! Check-in, classification, auto-absence and employee tests against the in-memory store

use attendance_server::{
    config::AttendanceConfig,
    error::AppError,
    models::{
        attendance::AttendanceFilter,
        employee::{CreateEmployee, UpdateEmployee},
        enums::{ApprovalStatus, LateStatus},
    },
    repository::{memory::MemoryStore, AttendanceStore},
    services::Services,
};
use chrono::{NaiveDate, NaiveDateTime};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Monday 2024-01-08 at the given local time
fn monday_at(h: u32, m: u32) -> NaiveDateTime {
    date(2024, 1, 8).and_hms_opt(h, m, 0).unwrap()
}

fn setup_with(config: AttendanceConfig) -> (MemoryStore, Services) {
    let store = MemoryStore::new();
    let services = Services::new(store.clone().into_repository(), &config);
    (store, services)
}

fn setup() -> (MemoryStore, Services) {
    setup_with(AttendanceConfig::default())
}

async fn add_employee(services: &Services, id: &str, scheduled_time: Option<&str>) {
    services
        .employees
        .create(CreateEmployee {
            employee_id: id.to_string(),
            name: format!("Employee {}", id),
            email: Some(format!("{}@example.com", id.to_lowercase())),
            password: Some("secret-pass".to_string()),
            scheduled_time: scheduled_time.map(str::to_string),
        })
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Check-in
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_check_in_classification_boundaries() {
    let (_, services) = setup();
    let cases = [
        ("A", (10, 59), LateStatus::OnTime, 119),
        ("B", (11, 0), LateStatus::Late, 120),
        ("C", (11, 59), LateStatus::Late, 179),
        ("D", (12, 0), LateStatus::Absent, 180),
        ("E", (8, 30), LateStatus::OnTime, 0),
    ];

    for (id, (h, m), expected, minutes) in cases {
        add_employee(&services, id, None).await;
        let record = services
            .attendance
            .check_in(id, date(2024, 1, 8), monday_at(h, m))
            .await
            .unwrap();
        assert_eq!(record.late_status, expected, "employee {}", id);
        assert_eq!(record.late_minutes, minutes, "employee {}", id);
        assert_eq!(record.status, ApprovalStatus::Pending);
        assert_eq!(record.employee_name, format!("Employee {}", id));
    }
}

#[tokio::test]
async fn test_check_in_uses_employee_schedule() {
    let (_, services) = setup();
    add_employee(&services, "E1", Some("10:30")).await;

    let record = services
        .attendance
        .check_in("E1", date(2024, 1, 8), monday_at(12, 30))
        .await
        .unwrap();
    assert_eq!(record.late_minutes, 120);
    assert_eq!(record.late_status, LateStatus::Late);
}

#[tokio::test]
async fn test_holiday_blocks_check_in() {
    let (store, services) = setup();
    add_employee(&services, "E1", None).await;
    let saturday = date(2024, 1, 6);

    let err = services
        .attendance
        .check_in("E1", saturday, saturday.and_hms_opt(9, 0, 0).unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::BusinessRule(_)));
    assert!(store.attendance_for("E1", saturday).await.unwrap().is_none());
}

#[tokio::test]
async fn test_check_in_after_holiday_event() {
    let (store, services) = setup();
    add_employee(&services, "E1", None).await;
    services
        .events
        .save_date_event(date(2024, 1, 8), "holiday", None)
        .await
        .unwrap();

    let err = services
        .attendance
        .check_in("E1", date(2024, 1, 8), monday_at(9, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));
    assert!(store.attendance_for("E1", date(2024, 1, 8)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_check_in_conflicts() {
    let (_, services) = setup();
    add_employee(&services, "E1", None).await;
    services
        .attendance
        .check_in("E1", date(2024, 1, 8), monday_at(9, 0))
        .await
        .unwrap();

    let err = services
        .attendance
        .check_in("E1", date(2024, 1, 8), monday_at(9, 30))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn test_check_in_unknown_employee() {
    let (_, services) = setup();
    let err = services
        .attendance
        .check_in("nobody", date(2024, 1, 8), monday_at(9, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_check_in_fills_automatic_absence() {
    let (_, services) = setup();
    add_employee(&services, "E1", None).await;

    let report = services
        .sweep
        .run_auto_absence(monday_at(14, 0))
        .await
        .unwrap();
    assert_eq!(report.marked, 1);

    let record = services
        .attendance
        .check_in("E1", date(2024, 1, 8), monday_at(10, 0))
        .await
        .unwrap();
    assert_eq!(record.in_time, Some(monday_at(10, 0)));
    assert_eq!(record.late_status, LateStatus::OnTime);
    assert_eq!(record.late_minutes, 60);

    let records = services
        .attendance
        .list(&AttendanceFilter {
            employee_id: Some("E1".to_string()),
            ..AttendanceFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
}

// ---------------------------------------------------------------------------
// Check-out and approval
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_check_out_rules() {
    let (_, services) = setup();
    add_employee(&services, "E1", None).await;
    let record = services
        .attendance
        .check_in("E1", date(2024, 1, 8), monday_at(9, 0))
        .await
        .unwrap();

    let err = services
        .attendance
        .check_out(record.id, monday_at(8, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let out = services
        .attendance
        .check_out(record.id, monday_at(17, 0))
        .await
        .unwrap();
    assert_eq!(out.out_time, Some(monday_at(17, 0)));

    let err = services
        .attendance
        .check_out(record.id, monday_at(18, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = services
        .attendance
        .check_out(9999, monday_at(18, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_check_out_requires_check_in() {
    let (_, services) = setup();
    add_employee(&services, "E1", None).await;
    services
        .sweep
        .run_auto_absence(monday_at(13, 0))
        .await
        .unwrap();
    let absence = services.attendance.pending_approvals().await.unwrap().remove(0);

    let err = services
        .attendance
        .check_out(absence.id, monday_at(17, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));
}

#[tokio::test]
async fn test_approval_and_summary() {
    let (_, services) = setup();
    for id in ["E1", "E2", "E3"] {
        add_employee(&services, id, None).await;
    }
    let on_time = services
        .attendance
        .check_in("E1", date(2024, 1, 8), monday_at(9, 0))
        .await
        .unwrap();
    let late = services
        .attendance
        .check_in("E2", date(2024, 1, 8), monday_at(11, 30))
        .await
        .unwrap();
    services
        .sweep
        .run_auto_absence(monday_at(13, 0))
        .await
        .unwrap();

    services
        .attendance
        .set_status(on_time.id, ApprovalStatus::Approved)
        .await
        .unwrap();
    services
        .attendance
        .set_status(late.id, ApprovalStatus::Rejected)
        .await
        .unwrap();

    let err = services
        .attendance
        .set_status(on_time.id, ApprovalStatus::Pending)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let pending = services.attendance.pending_approvals().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].employee_id, "E3");

    let summary = services.attendance.monthly_summary(2024, 1).await.unwrap();
    assert_eq!(summary.total_records, 3);
    assert_eq!(summary.approved, 1);
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.pending, 1);
    assert_eq!(summary.on_time_count, 1);
    assert_eq!(summary.late_count, 1);
    assert_eq!(summary.absent_count, 1);

    let february = services.attendance.monthly_summary(2024, 2).await.unwrap();
    assert_eq!(february.total_records, 0);
}

#[tokio::test]
async fn test_list_requires_complete_range() {
    let (_, services) = setup();
    let err = services
        .attendance
        .list(&AttendanceFilter {
            start_date: Some(date(2024, 1, 1)),
            ..AttendanceFilter::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

// ---------------------------------------------------------------------------
// Auto-absence sweep
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_sweep_before_cutoff_marks_nothing() {
    let (store, services) = setup();
    add_employee(&services, "E1", None).await;

    let report = services
        .sweep
        .run_auto_absence(monday_at(12, 59))
        .await
        .unwrap();
    assert_eq!(report.marked, 0);
    assert_eq!(report.before_cutoff, 1);
    assert!(store.attendance_for("E1", date(2024, 1, 8)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_sweep_at_cutoff_marks_absent() {
    let (store, services) = setup();
    add_employee(&services, "E1", None).await;

    let report = services
        .sweep
        .run_auto_absence(monday_at(13, 0))
        .await
        .unwrap();
    assert_eq!(report.marked, 1);

    let record = store
        .attendance_for("E1", date(2024, 1, 8))
        .await
        .unwrap()
        .unwrap();
    assert!(record.in_time.is_none());
    assert!(record.out_time.is_none());
    assert_eq!(record.late_status, LateStatus::Absent);
    assert_eq!(record.late_minutes, 240);
    assert_eq!(record.status, ApprovalStatus::Pending);
    assert_eq!(record.scheduled_time.to_string(), "09:00:00");
}

#[tokio::test]
async fn test_repeated_sweeps_are_idempotent() {
    let (store, services) = setup();
    add_employee(&services, "E1", None).await;

    let first = services
        .sweep
        .run_auto_absence(monday_at(13, 5))
        .await
        .unwrap();
    let second = services
        .sweep
        .run_auto_absence(monday_at(13, 5))
        .await
        .unwrap();

    assert_eq!(first.marked, 1);
    assert_eq!(second.marked, 0);
    assert_eq!(second.candidates, 0);

    let records = store
        .list_attendance(&AttendanceFilter {
            date: Some(date(2024, 1, 8)),
            ..AttendanceFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_concurrent_sweeps_insert_once() {
    let (store, services) = setup();
    for id in ["E1", "E2", "E3", "E4"] {
        add_employee(&services, id, None).await;
    }

    let a = services.sweep.clone();
    let b = services.sweep.clone();
    let (ra, rb) = tokio::join!(
        a.run_auto_absence(monday_at(13, 5)),
        b.run_auto_absence(monday_at(13, 5))
    );
    let (ra, rb) = (ra.unwrap(), rb.unwrap());

    assert_eq!(ra.marked + rb.marked, 4);
    assert_eq!(ra.failed + rb.failed, 0);
    let records = store
        .list_attendance(&AttendanceFilter::default())
        .await
        .unwrap();
    assert_eq!(records.len(), 4);
}

#[tokio::test]
async fn test_sweep_skips_employees_who_checked_in() {
    let (_, services) = setup();
    add_employee(&services, "E1", None).await;
    add_employee(&services, "E2", Some("11:00")).await;
    services
        .attendance
        .check_in("E1", date(2024, 1, 8), monday_at(9, 10))
        .await
        .unwrap();

    // E2's cutoff is 15:00
    let report = services
        .sweep
        .run_auto_absence(monday_at(14, 0))
        .await
        .unwrap();
    assert_eq!(report.candidates, 1);
    assert_eq!(report.marked, 0);
    assert_eq!(report.before_cutoff, 1);
}

#[tokio::test]
async fn test_sweep_runs_on_holidays_by_default() {
    let (_, services) = setup();
    add_employee(&services, "E1", None).await;
    let saturday = date(2024, 1, 6).and_hms_opt(14, 0, 0).unwrap();

    let report = services.sweep.run_auto_absence(saturday).await.unwrap();
    assert!(!report.holiday);
    assert_eq!(report.marked, 1);
}

#[tokio::test]
async fn test_sweep_can_skip_holidays() {
    let (store, services) = setup_with(AttendanceConfig {
        sweep_skips_holidays: true,
        ..AttendanceConfig::default()
    });
    add_employee(&services, "E1", None).await;
    let saturday = date(2024, 1, 6);

    let report = services
        .sweep
        .run_auto_absence(saturday.and_hms_opt(14, 0, 0).unwrap())
        .await
        .unwrap();
    assert!(report.holiday);
    assert_eq!(report.marked, 0);
    assert!(store.attendance_for("E1", saturday).await.unwrap().is_none());

    let report = services
        .sweep
        .run_auto_absence(monday_at(14, 0))
        .await
        .unwrap();
    assert_eq!(report.marked, 1);
}

// ---------------------------------------------------------------------------
// Employees
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_delete_employee_cascades() {
    let (store, services) = setup();
    add_employee(&services, "E1", None).await;
    add_employee(&services, "E2", None).await;
    services
        .attendance
        .check_in("E1", date(2024, 1, 8), monday_at(9, 0))
        .await
        .unwrap();
    services
        .attendance
        .check_in("E2", date(2024, 1, 8), monday_at(9, 0))
        .await
        .unwrap();

    let deleted = services.employees.delete("E1").await.unwrap();
    assert_eq!(deleted.deleted_records, 1);
    assert!(store.attendance_for("E1", date(2024, 1, 8)).await.unwrap().is_none());
    assert!(store.attendance_for("E2", date(2024, 1, 8)).await.unwrap().is_some());

    let err = services.employees.delete("E1").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_employee_create_update_and_password() {
    let (_, services) = setup();
    add_employee(&services, "E1", None).await;

    let employee = services.employees.get("E1").await.unwrap();
    assert_eq!(employee.scheduled_time.to_string(), "09:00:00");
    assert!(employee.password_hash.as_deref().unwrap().starts_with("$argon2"));
    assert!(services.employees.verify_password("E1", "secret-pass").await.unwrap());
    assert!(!services.employees.verify_password("E1", "wrong").await.unwrap());

    let duplicate = services
        .employees
        .create(CreateEmployee {
            employee_id: "E1".to_string(),
            name: "Someone".to_string(),
            email: None,
            password: None,
            scheduled_time: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(duplicate, AppError::Conflict(_)));

    let updated = services
        .employees
        .update(
            "E1",
            UpdateEmployee {
                name: Some("Renamed".to_string()),
                email: None,
                password: None,
                scheduled_time: Some("08:30".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.scheduled_time.to_string(), "08:30:00");
    assert_eq!(updated.email.as_deref(), Some("e1@example.com"));

    let invalid = services
        .employees
        .update(
            "E1",
            UpdateEmployee {
                name: None,
                email: None,
                password: None,
                scheduled_time: Some("half past eight".to_string()),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(invalid, AppError::Validation(_)));
}

#[tokio::test]
async fn test_employee_fields_are_trimmed_and_bounded() {
    let (_, services) = setup();

    let blank = services
        .employees
        .create(CreateEmployee {
            employee_id: "   ".to_string(),
            name: "  ".to_string(),
            email: None,
            password: None,
            scheduled_time: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(blank, AppError::Validation(_)));

    let too_long = services
        .employees
        .create(CreateEmployee {
            employee_id: "E".repeat(60),
            name: "Long Id".to_string(),
            email: None,
            password: None,
            scheduled_time: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(too_long, AppError::Validation(_)));
    assert!(services.employees.list().await.unwrap().is_empty());

    let padded = services
        .employees
        .create(CreateEmployee {
            employee_id: "  E1 ".to_string(),
            name: " Hina Raza ".to_string(),
            email: Some(" hina@example.com ".to_string()),
            password: None,
            scheduled_time: Some(" 08:45 ".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(padded.employee_id, "E1");
    assert_eq!(padded.name, "Hina Raza");
    assert_eq!(padded.email.as_deref(), Some("hina@example.com"));
    assert_eq!(padded.scheduled_time.to_string(), "08:45:00");

    let renamed = services
        .employees
        .update(
            "E1",
            UpdateEmployee {
                name: Some("   ".to_string()),
                email: None,
                password: None,
                scheduled_time: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(renamed, AppError::Validation(_)));
    assert_eq!(services.employees.get("E1").await.unwrap().name, "Hina Raza");
}

#[tokio::test]
async fn test_bulk_import_reports_each_line() {
    let (_, services) = setup();
    add_employee(&services, "E1", None).await;

    let lines = "\
E2,Ayesha Khan,ayesha@example.com,08:30,pass1234

E3,Omar Ali,,,
E1,Duplicate,,09:00,
E4,Broken line
E5,Bad Time,,quarter past,
";
    let report = services.employees.create_many(lines).await.unwrap();

    assert!(report.success);
    assert_eq!(report.imported, 2);
    assert_eq!(report.failed, 3);
    assert_eq!(
        report.errors.iter().map(|e| e.line).collect::<Vec<_>>(),
        vec![4, 5, 6]
    );
    assert_eq!(report.errors[1].input, "E4,Broken line");

    let ayesha = services.employees.get("E2").await.unwrap();
    assert_eq!(ayesha.scheduled_time.to_string(), "08:30:00");
    assert!(services.employees.verify_password("E2", "pass1234").await.unwrap());

    let omar = services.employees.get("E3").await.unwrap();
    assert_eq!(omar.email, None);
    assert_eq!(omar.scheduled_time.to_string(), "09:00:00");
    assert!(!services.employees.verify_password("E3", "").await.unwrap());

    assert_eq!(services.employees.get("E1").await.unwrap().name, "Employee E1");
    assert!(services.employees.get("E5").await.is_err());
}
