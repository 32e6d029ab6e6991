//! Certificate (CA) expiration classification

use chrono::{DateTime, NaiveDate};
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Default warning window, in days
pub const DEFAULT_WARNING_DAYS: i64 = 30;

/// Expiration state of a certificate relative to a reference date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExpirationStatus {
    Expired { days_overdue: i64 },
    ExpiringSoon { days_remaining: i64 },
    Valid,
}

impl ExpirationStatus {
    /// Days overdue or days remaining; `None` for valid certificates
    pub fn severity(&self) -> Option<i64> {
        match self {
            ExpirationStatus::Expired { days_overdue } => Some(*days_overdue),
            ExpirationStatus::ExpiringSoon { days_remaining } => Some(*days_remaining),
            ExpirationStatus::Valid => None,
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, ExpirationStatus::Expired { .. })
    }

    pub fn is_expiring_soon(&self) -> bool {
        matches!(self, ExpirationStatus::ExpiringSoon { .. })
    }
}

/// Signed whole-day difference `expiration - today`
pub fn days_until(expiration: NaiveDate, today: NaiveDate) -> i64 {
    expiration.signed_duration_since(today).num_days()
}

/// Classification thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirationPolicy {
    pub warning_days: i64,
}

impl Default for ExpirationPolicy {
    fn default() -> Self {
        Self {
            warning_days: DEFAULT_WARNING_DAYS,
        }
    }
}

impl ExpirationPolicy {
    pub fn new(warning_days: i64) -> Self {
        Self { warning_days }
    }

    pub fn classify(&self, expiration: NaiveDate, today: NaiveDate) -> ExpirationStatus {
        let days = days_until(expiration, today);
        if days < 0 {
            ExpirationStatus::Expired {
                days_overdue: days.abs(),
            }
        } else if days <= self.warning_days {
            ExpirationStatus::ExpiringSoon {
                days_remaining: days,
            }
        } else {
            ExpirationStatus::Valid
        }
    }

    /// Classify a stored date string
    pub fn classify_str(&self, expiration: &str, today: NaiveDate) -> AppResult<ExpirationStatus> {
        Ok(self.classify(parse_iso_date(expiration)?, today))
    }
}

/// Parse a calendar date given as `YYYY-MM-DD` or as an RFC 3339 timestamp
pub fn parse_iso_date(value: &str) -> AppResult<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map_err(|_| AppError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", value)))
}
