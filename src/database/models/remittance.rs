use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::macros::string_enum;

string_enum! {
    /// Lifecycle of a payout batch. PROCESSING is written by the external
    /// payment executor, never by this engine.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    pub enum RemittanceStatus {
        Pending => "PENDING",
        Processing => "PROCESSING",
        Completed => "COMPLETED",
        Failed => "FAILED",
        Cancelled => "CANCELLED",
    }
}

/// One payout batch to one worker for one settlement period. Segments and
/// adjustments point back at the remittance that paid them; the remittance
/// does not own their lifetime.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Remittance {
    pub id: Uuid,
    pub worker_id: Uuid,
    pub gross_amount: BigDecimal,
    pub net_amount: BigDecimal,
    pub status: RemittanceStatus,
    pub failure_reason: Option<String>,
    pub period_start: Option<DateTime<Utc>>,
    pub period_end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewRemittance {
    pub worker_id: Uuid,
    pub gross_amount: BigDecimal,
    pub net_amount: BigDecimal,
    pub status: RemittanceStatus,
    pub failure_reason: Option<String>,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}
