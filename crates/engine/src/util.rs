//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine, ValidationError};

const NOON: NaiveTime = match NaiveTime::from_hms_opt(12, 0, 0) {
    Some(time) => time,
    None => panic!("invalid noon"),
};

/// Canonical instant for a calendar date: 12:00:00 UTC.
///
/// Every stored record is pinned to noon so that a date never moves across
/// midnight when it is rendered in a different timezone.
pub(crate) fn noon_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NOON).and_utc()
}

/// Trim free text and drop it when nothing is left.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Trim a required name, rejecting empty input.
pub(crate) fn normalize_required_name(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}

/// Reject amounts outside `0..=MoneyCents::MAX_ENTRY`.
pub(crate) fn ensure_entry_amount(amount: MoneyCents, label: &str) -> Result<(), ValidationError> {
    if amount.is_negative() {
        return Err(ValidationError::InvalidAmount(format!(
            "{label} must be >= 0"
        )));
    }
    if amount > MoneyCents::MAX_ENTRY {
        return Err(ValidationError::InvalidAmount(format!(
            "{label} must be at most {}",
            MoneyCents::MAX_ENTRY
        )));
    }
    Ok(())
}

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidId(format!("invalid {label} id")))
}
