use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

use crate::database::models::{Adjustment, SettlementStatus, TimeSegment, TimeSegmentStatus, WorkLog};
use crate::error::AppError;
use crate::services::money;

/// Overall settlement classification of a worklog, derived from its amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkLogSettlement {
    Remitted,
    Unremitted,
}

impl std::str::FromStr for WorkLogSettlement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REMITTED" => Ok(WorkLogSettlement::Remitted),
            "UNREMITTED" => Ok(WorkLogSettlement::Unremitted),
            _ => Err(format!("Invalid WorkLogSettlement: {}", s)),
        }
    }
}

/// Point-in-time money view of one worklog, recomputed on demand from the
/// current segment and adjustment states.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkLogAmounts {
    pub remitted_amount: BigDecimal,
    pub unremitted_amount: BigDecimal,
    pub total_amount: BigDecimal,
}

impl WorkLogAmounts {
    /// A worklog with any unpaid amount is UNREMITTED, and so is one with a
    /// zero total: nothing payable means nothing has been settled yet, not
    /// that settlement is complete.
    pub fn classification(&self) -> WorkLogSettlement {
        if self.unremitted_amount > BigDecimal::zero() || self.total_amount.is_zero() {
            WorkLogSettlement::Unremitted
        } else {
            WorkLogSettlement::Remitted
        }
    }
}

/// Bucket the worklog's payable units into remitted/unremitted totals.
/// REMOVED and DISPUTED segments are not payable and are skipped outright.
pub fn worklog_amounts(
    worklog: &WorkLog,
    segments: &[TimeSegment],
    adjustments: &[Adjustment],
) -> Result<WorkLogAmounts, AppError> {
    let mut remitted = BigDecimal::zero();
    let mut unremitted = BigDecimal::zero();

    for segment in segments {
        if segment.status != TimeSegmentStatus::Active {
            continue;
        }

        let amount = money::segment_amount(segment, &worklog.hourly_rate)?;
        match segment.settlement_status {
            SettlementStatus::Remitted => remitted += amount,
            SettlementStatus::Unremitted => unremitted += amount,
        }
    }

    for adjustment in adjustments {
        match adjustment.settlement_status {
            SettlementStatus::Remitted => remitted += adjustment.amount.clone(),
            SettlementStatus::Unremitted => unremitted += adjustment.amount.clone(),
        }
    }

    let total_amount = &remitted + &unremitted;
    Ok(WorkLogAmounts {
        remitted_amount: remitted,
        unremitted_amount: unremitted,
        total_amount,
    })
}
