//! Period keys and frozen production-count snapshots.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors for month-lock operations.
#[derive(Debug, Error)]
pub enum MonthLockError {
    /// The period key is not `YYYY-MM`.
    #[error("Invalid period key: {0} (expected YYYY-MM)")]
    InvalidPeriod(String),

    /// The period is already locked.
    #[error("Period {0} is already locked")]
    AlreadyLocked(Period),

    /// Unlock was requested for an unlocked period.
    #[error("Period {0} is not locked")]
    NotLocked(Period),

    /// The actor's role cannot lock or unlock months.
    #[error("Role {0} cannot manage month locks")]
    RoleNotAllowed(String),

    /// No lock record exists for the period.
    #[error("No month lock found for period {0}")]
    LockNotFound(Period),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl MonthLockError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidPeriod(_) => 400,
            Self::RoleNotAllowed(_) => 403,
            Self::LockNotFound(_) => 404,
            Self::AlreadyLocked(_) | Self::NotLocked(_) => 409,
            Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidPeriod(_) => "INVALID_PERIOD",
            Self::AlreadyLocked(_) => "ALREADY_LOCKED",
            Self::NotLocked(_) => "NOT_LOCKED",
            Self::RoleNotAllowed(_) => "ROLE_NOT_ALLOWED",
            Self::LockNotFound(_) => "LOCK_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// A billing period, one calendar month, keyed as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    /// Creates a period, validating the month.
    ///
    /// # Errors
    ///
    /// Returns `MonthLockError::InvalidPeriod` for months outside
    /// 1 to 12 or years outside a sane range.
    pub fn new(year: i32, month: u32) -> Result<Self, MonthLockError> {
        if !(1..=12).contains(&month) || !(2000..=9999).contains(&year) {
            return Err(MonthLockError::InvalidPeriod(format!("{year:04}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    /// The period containing the given instant.
    #[must_use]
    pub fn containing(at: DateTime<Utc>) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }

    /// The year component.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// The month component, 1 to 12.
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// The first day of the period.
    #[must_use]
    pub fn first_day(&self) -> NaiveDate {
        // Components are validated on construction.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// The first day of the following period.
    #[must_use]
    pub fn next_first_day(&self) -> NaiveDate {
        let (y, m) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(y, m, 1).unwrap_or_default()
    }

    /// Whether the instant falls inside this period.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let d = at.date_naive();
        d >= self.first_day() && d < self.next_first_day()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = MonthLockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MonthLockError::InvalidPeriod(s.to_string());
        let (y, m) = s.split_once('-').ok_or_else(invalid)?;
        if y.len() != 4 || m.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = y.parse().map_err(|_| invalid())?;
        let month: u32 = m.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for Period {
    type Error = MonthLockError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Period> for String {
    fn from(p: Period) -> Self {
        p.to_string()
    }
}

/// Production counts for one project and period.
///
/// Computed live for unlocked periods; frozen verbatim into the lock
/// record when the period is locked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionCounts {
    /// Orders received during the period.
    pub received: i64,
    /// Orders delivered during the period.
    pub delivered: i64,
    /// Orders still pending at computation time.
    pub pending: i64,
    /// Orders cancelled during the period.
    pub cancelled: i64,
    /// Completed work items per stage during the period.
    pub stage_completions: BTreeMap<String, i64>,
    /// When the counts were computed.
    pub computed_at: DateTime<Utc>,
}

impl ProductionCounts {
    /// An empty snapshot, used when a period has no activity.
    #[must_use]
    pub fn empty(computed_at: DateTime<Utc>) -> Self {
        Self {
            received: 0,
            delivered: 0,
            pending: 0,
            cancelled: 0,
            stage_completions: BTreeMap::new(),
            computed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_period_parse_round_trip() {
        let p: Period = "2026-08".parse().unwrap();
        assert_eq!(p.year(), 2026);
        assert_eq!(p.month(), 8);
        assert_eq!(p.to_string(), "2026-08");
    }

    #[test]
    fn test_period_rejects_garbage() {
        for s in ["2026", "2026-13", "2026-00", "26-08", "2026-8", "august"] {
            assert!(s.parse::<Period>().is_err(), "accepted {s}");
        }
    }

    #[test]
    fn test_period_contains() {
        let p: Period = "2026-08".parse().unwrap();
        let inside = Utc.with_ymd_and_hms(2026, 8, 31, 23, 59, 59).unwrap();
        let before = Utc.with_ymd_and_hms(2026, 7, 31, 23, 59, 59).unwrap();
        let after = Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap();
        assert!(p.contains(inside));
        assert!(!p.contains(before));
        assert!(!p.contains(after));
    }

    #[test]
    fn test_december_rolls_over() {
        let p: Period = "2026-12".parse().unwrap();
        assert_eq!(
            p.next_first_day(),
            NaiveDate::from_ymd_opt(2027, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_error_codes() {
        let p: Period = "2026-08".parse().unwrap();
        assert_eq!(MonthLockError::AlreadyLocked(p).status_code(), 409);
        assert_eq!(MonthLockError::NotLocked(p).error_code(), "NOT_LOCKED");
        assert_eq!(
            MonthLockError::InvalidPeriod("x".to_string()).status_code(),
            400
        );
    }
}
