use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::database::{
    get_pool,
    models::{NewRemittance, Remittance},
    utils::sql,
};

const REMITTANCE_COLUMNS: &str = "id, worker_id, gross_amount, net_amount, status, \
                                  failure_reason, period_start, period_end, created_at, \
                                  processed_at";

/// Insert a remittance row inside the settlement transaction.
pub async fn create_remittance(
    tx: &mut Transaction<'_, Postgres>,
    input: NewRemittance,
) -> Result<Remittance, sqlx::Error> {
    let remittance = sqlx::query_as::<_, Remittance>(&sql(&format!(
        r#"
        INSERT INTO remittances
            (worker_id, gross_amount, net_amount, status, failure_reason,
             period_start, period_end, processed_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING {REMITTANCE_COLUMNS}
        "#
    )))
    .bind(input.worker_id)
    .bind(input.gross_amount)
    .bind(input.net_amount)
    .bind(input.status)
    .bind(input.failure_reason)
    .bind(input.period_start)
    .bind(input.period_end)
    .bind(input.processed_at)
    .fetch_one(&mut **tx)
    .await?;

    Ok(remittance)
}

pub async fn find_by_id(id: Uuid) -> Result<Option<Remittance>, sqlx::Error> {
    let remittance = sqlx::query_as::<_, Remittance>(&sql(&format!(
        r#"
        SELECT {REMITTANCE_COLUMNS}
        FROM remittances
        WHERE id = ?
        "#
    )))
    .bind(id)
    .fetch_optional(&get_pool())
    .await?;

    Ok(remittance)
}

pub async fn find_all() -> Result<Vec<Remittance>, sqlx::Error> {
    let remittances = sqlx::query_as::<_, Remittance>(&sql(&format!(
        r#"
        SELECT {REMITTANCE_COLUMNS}
        FROM remittances
        ORDER BY created_at DESC
        "#
    )))
    .fetch_all(&get_pool())
    .await?;

    Ok(remittances)
}

pub async fn find_by_worker(worker_id: Uuid) -> Result<Vec<Remittance>, sqlx::Error> {
    let remittances = sqlx::query_as::<_, Remittance>(&sql(&format!(
        r#"
        SELECT {REMITTANCE_COLUMNS}
        FROM remittances
        WHERE worker_id = ?
        ORDER BY created_at DESC
        "#
    )))
    .bind(worker_id)
    .fetch_all(&get_pool())
    .await?;

    Ok(remittances)
}
