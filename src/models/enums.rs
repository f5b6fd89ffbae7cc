//! Shared domain enums (day types, approval and lateness states, weekdays)

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef},
    Decode, Encode, Postgres,
};
use utoipa::ToSchema;

/// Store a string-backed enum in a TEXT/VARCHAR column
macro_rules! text_column {
    ($ty:ty) => {
        impl sqlx::Type<Postgres> for $ty {
            fn type_info() -> PgTypeInfo {
                <String as sqlx::Type<Postgres>>::type_info()
            }

            fn compatible(ty: &PgTypeInfo) -> bool {
                <String as sqlx::Type<Postgres>>::compatible(ty)
            }
        }

        impl<'r> Decode<'r, Postgres> for $ty {
            fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
                let s: String = Decode::<Postgres>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl Encode<'_, Postgres> for $ty {
            fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> IsNull {
                <String as Encode<Postgres>>::encode(self.as_str().to_string(), buf)
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

// ---------------------------------------------------------------------------
// DayType
// ---------------------------------------------------------------------------

/// Classification of a calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    Working,
    Holiday,
    HalfDay,
    Special,
}

impl DayType {
    pub const ALL: [DayType; 4] = [
        DayType::Working,
        DayType::Holiday,
        DayType::HalfDay,
        DayType::Special,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayType::Working => "working",
            DayType::Holiday => "holiday",
            DayType::HalfDay => "half_day",
            DayType::Special => "special",
        }
    }

    /// Human-readable label ("Half day")
    pub fn label(&self) -> &'static str {
        match self {
            DayType::Working => "Working",
            DayType::Holiday => "Holiday",
            DayType::HalfDay => "Half day",
            DayType::Special => "Special",
        }
    }

    /// Only holidays block attendance; half days and special days allow it
    pub fn allows_attendance(&self) -> bool {
        !matches!(self, DayType::Holiday)
    }
}

impl std::str::FromStr for DayType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "working" => Ok(DayType::Working),
            "holiday" => Ok(DayType::Holiday),
            "half_day" => Ok(DayType::HalfDay),
            "special" => Ok(DayType::Special),
            _ => Err(format!("Invalid day type: {}", s)),
        }
    }
}

text_column!(DayType);

// ---------------------------------------------------------------------------
// ApprovalStatus
// ---------------------------------------------------------------------------

/// Admin approval state of an attendance record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for ApprovalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApprovalStatus::Pending),
            "approved" => Ok(ApprovalStatus::Approved),
            "rejected" => Ok(ApprovalStatus::Rejected),
            _ => Err(format!("Invalid approval status: {}", s)),
        }
    }
}

text_column!(ApprovalStatus);

// ---------------------------------------------------------------------------
// LateStatus
// ---------------------------------------------------------------------------

/// Punctuality of a check-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum LateStatus {
    #[default]
    OnTime,
    Late,
    Absent,
}

impl LateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LateStatus::OnTime => "on_time",
            LateStatus::Late => "late",
            LateStatus::Absent => "absent",
        }
    }
}

impl std::str::FromStr for LateStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on_time" => Ok(LateStatus::OnTime),
            "late" => Ok(LateStatus::Late),
            "absent" => Ok(LateStatus::Absent),
            _ => Err(format!("Invalid late status: {}", s)),
        }
    }
}

text_column!(LateStatus);

// ---------------------------------------------------------------------------
// Weekdays
// ---------------------------------------------------------------------------

/// Weekdays in settings order (Sunday first)
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Settings key for a weekday ("monday")
pub fn weekday_key(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "sunday",
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
    }
}

/// Display name for a weekday ("Monday")
pub fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

/// Parse a settings key back into a weekday
pub fn parse_weekday_key(key: &str) -> Option<Weekday> {
    WEEKDAYS.into_iter().find(|d| weekday_key(*d) == key)
}
