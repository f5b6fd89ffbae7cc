//! Data models for the attendance server

pub mod attendance;
pub mod calendar;
pub mod employee;
pub mod enums;
pub mod settings;

// Re-export commonly used types
pub use attendance::{AttendanceRecord, AttendanceSummary, NewAttendance, SweepReport};
pub use calendar::{CalendarDay, DateEvent, DayResolution};
pub use employee::Employee;
pub use enums::{ApprovalStatus, DayType, LateStatus};
pub use settings::WeeklySettings;
