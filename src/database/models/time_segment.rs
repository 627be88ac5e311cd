use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::macros::string_enum;

string_enum! {
    /// Work status of a segment. Only ACTIVE segments are payable.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum TimeSegmentStatus {
        Active => "ACTIVE",
        Removed => "REMOVED",
        Disputed => "DISPUTED",
    }
}

string_enum! {
    /// Settlement status of an individual segment or adjustment. The move to
    /// REMITTED happens exactly once, only inside a completed remittance run.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum SettlementStatus {
        Unremitted => "UNREMITTED",
        Remitted => "REMITTED",
    }
}

/// One interval of logged work inside a worklog. Settlement is tracked per
/// segment so work added after a payout stays payable.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TimeSegment {
    pub id: Uuid,
    pub worklog_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: TimeSegmentStatus,
    pub settlement_status: SettlementStatus,
    pub remittance_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSegmentInput {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}
