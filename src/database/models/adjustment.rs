use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::macros::string_enum;
use crate::database::models::time_segment::SettlementStatus;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum AdjustmentType {
        Deduction => "DEDUCTION",
        Bonus => "BONUS",
        Correction => "CORRECTION",
    }
}

/// Manual bonus, deduction or correction against a worklog. The amount is
/// signed; DEDUCTION is conventionally negative, BONUS positive. Can be
/// created after the parent worklog was already paid, in which case it starts
/// UNREMITTED and is swept into the next batch.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Adjustment {
    pub id: Uuid,
    pub worklog_id: Uuid,
    pub amount: BigDecimal,
    pub reason: String,
    pub adjustment_type: AdjustmentType,
    pub settlement_status: SettlementStatus,
    pub remittance_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentInput {
    pub amount: BigDecimal,
    pub reason: String,
    pub adjustment_type: AdjustmentType,
}
