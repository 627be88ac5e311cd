use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::database::{
    get_pool,
    models::{Adjustment, AdjustmentInput},
    utils::sql,
};

const ADJUSTMENT_COLUMNS: &str = "id, worklog_id, amount, reason, adjustment_type, \
                                  settlement_status, remittance_id, created_at";

pub async fn create_adjustment(
    worklog_id: Uuid,
    input: AdjustmentInput,
) -> Result<Adjustment, sqlx::Error> {
    let adjustment = sqlx::query_as::<_, Adjustment>(&sql(&format!(
        r#"
        INSERT INTO adjustments (worklog_id, amount, reason, adjustment_type)
        VALUES (?, ?, ?, ?)
        RETURNING {ADJUSTMENT_COLUMNS}
        "#
    )))
    .bind(worklog_id)
    .bind(input.amount)
    .bind(input.reason)
    .bind(input.adjustment_type)
    .fetch_one(&get_pool())
    .await?;

    Ok(adjustment)
}

pub async fn find_by_worklog(worklog_id: Uuid) -> Result<Vec<Adjustment>, sqlx::Error> {
    let adjustments = sqlx::query_as::<_, Adjustment>(&sql(&format!(
        r#"
        SELECT {ADJUSTMENT_COLUMNS}
        FROM adjustments
        WHERE worklog_id = ?
        ORDER BY created_at
        "#
    )))
    .bind(worklog_id)
    .fetch_all(&get_pool())
    .await?;

    Ok(adjustments)
}

pub async fn find_unremitted() -> Result<Vec<Adjustment>, sqlx::Error> {
    let adjustments = sqlx::query_as::<_, Adjustment>(&sql(&format!(
        r#"
        SELECT {ADJUSTMENT_COLUMNS}
        FROM adjustments
        WHERE settlement_status = 'UNREMITTED'
        "#
    )))
    .fetch_all(&get_pool())
    .await?;

    Ok(adjustments)
}

pub async fn find_unremitted_for_update(
    tx: &mut Transaction<'_, Postgres>,
) -> Result<Vec<Adjustment>, sqlx::Error> {
    let adjustments = sqlx::query_as::<_, Adjustment>(&sql(&format!(
        r#"
        SELECT {ADJUSTMENT_COLUMNS}
        FROM adjustments
        WHERE settlement_status = 'UNREMITTED'
        FOR UPDATE
        "#
    )))
    .fetch_all(&mut **tx)
    .await?;

    Ok(adjustments)
}

pub async fn mark_remitted(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    remittance_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(&sql(r#"
        UPDATE adjustments
        SET settlement_status = 'REMITTED',
            remittance_id = ?
        WHERE id = ?
    "#))
    .bind(remittance_id)
    .bind(id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
