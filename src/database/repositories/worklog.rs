use bigdecimal::BigDecimal;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::database::{
    get_pool,
    models::{WorkLog, WorkLogInput},
    utils::sql,
};

const WORKLOG_COLUMNS: &str =
    "id, task_id, worker_id, hourly_rate, total_remitted_amount, remittance_id, created_at";

pub async fn create_worklog(input: WorkLogInput) -> Result<WorkLog, sqlx::Error> {
    let worklog = sqlx::query_as::<_, WorkLog>(&sql(&format!(
        r#"
        INSERT INTO worklogs (task_id, worker_id, hourly_rate)
        VALUES (?, ?, ?)
        RETURNING {WORKLOG_COLUMNS}
        "#
    )))
    .bind(input.task_id)
    .bind(input.worker_id)
    .bind(input.hourly_rate)
    .fetch_one(&get_pool())
    .await?;

    Ok(worklog)
}

pub async fn find_by_id(id: Uuid) -> Result<Option<WorkLog>, sqlx::Error> {
    let worklog = sqlx::query_as::<_, WorkLog>(&sql(&format!(
        r#"
        SELECT {WORKLOG_COLUMNS}
        FROM worklogs
        WHERE id = ?
        "#
    )))
    .bind(id)
    .fetch_optional(&get_pool())
    .await?;

    Ok(worklog)
}

/// Point lookup inside the settlement transaction. The row is locked so a
/// concurrent run cannot bump the same running total.
pub async fn find_by_id_for_update(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<WorkLog>, sqlx::Error> {
    let worklog = sqlx::query_as::<_, WorkLog>(&sql(&format!(
        r#"
        SELECT {WORKLOG_COLUMNS}
        FROM worklogs
        WHERE id = ?
        FOR UPDATE
        "#
    )))
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(worklog)
}

pub async fn find_all() -> Result<Vec<WorkLog>, sqlx::Error> {
    let worklogs = sqlx::query_as::<_, WorkLog>(&sql(&format!(
        r#"
        SELECT {WORKLOG_COLUMNS}
        FROM worklogs
        ORDER BY created_at
        "#
    )))
    .fetch_all(&get_pool())
    .await?;

    Ok(worklogs)
}

/// Add a settled amount to the worklog's running total and point it at the
/// remittance that paid it.
pub async fn apply_settlement(
    tx: &mut Transaction<'_, Postgres>,
    worklog_id: Uuid,
    amount: &BigDecimal,
    remittance_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(&sql(r#"
        UPDATE worklogs
        SET total_remitted_amount = total_remitted_amount + ?,
            remittance_id = ?
        WHERE id = ?
    "#))
    .bind(amount)
    .bind(remittance_id)
    .bind(worklog_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
