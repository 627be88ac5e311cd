use bigdecimal::{BigDecimal, RoundingMode, Zero};

use crate::database::models::{TimeSegment, TimeSegmentStatus};
use crate::error::AppError;

/// Round to 2 decimal places, half-up. Every persisted or reported amount
/// goes through this, and per-segment amounts are rounded here immediately
/// rather than once at the end: totals are sums of already-rounded amounts.
pub fn round2(amount: &BigDecimal) -> BigDecimal {
    amount.with_scale_round(2, RoundingMode::HalfUp)
}

/// Price one time segment against its worklog's hourly rate.
///
/// REMOVED and DISPUTED segments price to zero; callers are expected to skip
/// them in aggregation anyway. A segment whose end precedes its start is a
/// hard validation error, never silently clamped.
pub fn segment_amount(
    segment: &TimeSegment,
    hourly_rate: &BigDecimal,
) -> Result<BigDecimal, AppError> {
    if segment.status != TimeSegmentStatus::Active {
        return Ok(BigDecimal::zero());
    }

    if segment.end_time < segment.start_time {
        return Err(AppError::BadRequest(format!(
            "Segment {} has negative duration",
            segment.id
        )));
    }

    let seconds = (segment.end_time - segment.start_time).num_seconds();
    let hours = BigDecimal::from(seconds) / BigDecimal::from(3600);
    Ok(round2(&(hours * hourly_rate)))
}
