use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Resolved settlement period. The bounds label the remittances produced for
/// the run; unit selection itself is not period-filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SettlementPeriod {
    /// First instant of the start day, UTC.
    pub fn starts_at(&self) -> DateTime<Utc> {
        self.start.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc()
    }

    /// Last instant of the end day, UTC.
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.end
            .and_hms_micro_opt(23, 59, 59, 999_999)
            .unwrap_or_default()
            .and_utc()
    }
}

/// Resolve period bounds, defaulting to the current calendar month.
pub fn resolve(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<SettlementPeriod, AppError> {
    resolve_from(Utc::now().date_naive(), start, end)
}

fn resolve_from(
    today: NaiveDate,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<SettlementPeriod, AppError> {
    let start = start.unwrap_or_else(|| today.with_day(1).unwrap_or(today));

    let end = match end {
        Some(end) => end,
        None => last_day_of_month(today),
    };

    if end < start {
        return Err(AppError::BadRequest(
            "periodEnd must be on or after periodStart".to_string(),
        ));
    }

    Ok(SettlementPeriod { start, end })
}

/// Advance to the next month's first day and step back one day, which is
/// correct across month lengths and leap years.
fn last_day_of_month(today: NaiveDate) -> NaiveDate {
    let (year, month) = if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };

    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|first_of_next| first_of_next - Duration::days(1))
        .unwrap_or(today)
}
