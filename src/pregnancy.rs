//! Gestational-age arithmetic from the last menstrual period.
//!
//! Everything here is pure: "today" is always passed in as `as_of`.

use chrono::{DateTime, Days, NaiveDate, Utc};
use crate::error::RegistryError;
use crate::models::{PregnancyDetails, Trimester};

pub const PREGNANCY_DAYS: i64 = 280;

/// Parses a calendar date given either as `YYYY-MM-DD` or as an RFC 3339
/// timestamp.
pub fn parse_date(raw: &str) -> Result<NaiveDate, RegistryError> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc).date_naive())
        .map_err(|_| RegistryError::InvalidDate(format!("{raw:?} (expected YYYY-MM-DD)")))
}

/// Like [`parse_date`], but also rejects an LMP whose due date would fall
/// outside the representable calendar.
pub fn parse_lmp(raw: &str) -> Result<NaiveDate, RegistryError> {
    let lmp = parse_date(raw)?;
    due_date(lmp)?;
    Ok(lmp)
}

/// Checked `date + days`; overflow past the calendar range is an invalid date.
pub fn add_days(date: NaiveDate, days: i64) -> Result<NaiveDate, RegistryError> {
    u64::try_from(days)
        .ok()
        .and_then(|d| date.checked_add_days(Days::new(d)))
        .ok_or_else(|| {
            RegistryError::InvalidDate(format!("{date} plus {days} days is out of range"))
        })
}

pub fn due_date(lmp: NaiveDate) -> Result<NaiveDate, RegistryError> {
    add_days(lmp, PREGNANCY_DAYS)
}

/// Weeks 12 and 26 still belong to the earlier trimester.
pub fn trimester_for_week(week: i64) -> Trimester {
    if week <= 12 {
        Trimester::First
    } else if week <= 26 {
        Trimester::Second
    } else {
        Trimester::Third
    }
}

/// Neither the day count nor the week is clamped: a future LMP gives negative
/// values and a stale record can run well past week 40.
pub fn compute_pregnancy_details(
    lmp: NaiveDate,
    as_of: NaiveDate,
) -> Result<PregnancyDetails, RegistryError> {
    let days_since_lmp = (as_of - lmp).num_days();
    let current_week = days_since_lmp.div_euclid(7);

    Ok(PregnancyDetails {
        due_date: due_date(lmp)?,
        current_week,
        trimester: trimester_for_week(current_week),
        days_since_lmp,
    })
}
