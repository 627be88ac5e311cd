use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Container for one worker's logged effort against one task. The
/// `total_remitted_amount` column caches the sum of amounts of this worklog's
/// REMITTED segments and adjustments; it is bumped incrementally on every
/// completed remittance run and never edited independently.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WorkLog {
    pub id: Uuid,
    pub task_id: Uuid,
    pub worker_id: Uuid,
    pub hourly_rate: BigDecimal,
    pub total_remitted_amount: BigDecimal,
    pub remittance_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkLogInput {
    pub task_id: Uuid,
    pub worker_id: Uuid,
    pub hourly_rate: BigDecimal,
}
