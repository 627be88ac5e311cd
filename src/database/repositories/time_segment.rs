use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::database::{
    get_pool,
    models::{TimeSegment, TimeSegmentInput, TimeSegmentStatus},
    utils::sql,
};

const SEGMENT_COLUMNS: &str =
    "id, worklog_id, start_time, end_time, status, settlement_status, remittance_id, created_at";

pub async fn create_segment(
    worklog_id: Uuid,
    input: TimeSegmentInput,
) -> Result<TimeSegment, sqlx::Error> {
    let segment = sqlx::query_as::<_, TimeSegment>(&sql(&format!(
        r#"
        INSERT INTO time_segments (worklog_id, start_time, end_time)
        VALUES (?, ?, ?)
        RETURNING {SEGMENT_COLUMNS}
        "#
    )))
    .bind(worklog_id)
    .bind(input.start_time)
    .bind(input.end_time)
    .fetch_one(&get_pool())
    .await?;

    Ok(segment)
}

pub async fn find_by_worklog(worklog_id: Uuid) -> Result<Vec<TimeSegment>, sqlx::Error> {
    let segments = sqlx::query_as::<_, TimeSegment>(&sql(&format!(
        r#"
        SELECT {SEGMENT_COLUMNS}
        FROM time_segments
        WHERE worklog_id = ?
        ORDER BY start_time
        "#
    )))
    .bind(worklog_id)
    .fetch_all(&get_pool())
    .await?;

    Ok(segments)
}

/// Every payable segment not yet included in a remittance, system-wide.
/// Used by dry runs and reporting; real runs take the locking variant.
pub async fn find_unremitted_active() -> Result<Vec<TimeSegment>, sqlx::Error> {
    let segments = sqlx::query_as::<_, TimeSegment>(&sql(&format!(
        r#"
        SELECT {SEGMENT_COLUMNS}
        FROM time_segments
        WHERE status = 'ACTIVE'
          AND settlement_status = 'UNREMITTED'
        "#
    )))
    .fetch_all(&get_pool())
    .await?;

    Ok(segments)
}

/// Same selection under row locks, so two concurrent settlement runs cannot
/// both pick up a segment while it still reads UNREMITTED.
pub async fn find_unremitted_active_for_update(
    tx: &mut Transaction<'_, Postgres>,
) -> Result<Vec<TimeSegment>, sqlx::Error> {
    let segments = sqlx::query_as::<_, TimeSegment>(&sql(&format!(
        r#"
        SELECT {SEGMENT_COLUMNS}
        FROM time_segments
        WHERE status = 'ACTIVE'
          AND settlement_status = 'UNREMITTED'
        FOR UPDATE
        "#
    )))
    .fetch_all(&mut **tx)
    .await?;

    Ok(segments)
}

/// Work-status transition (dispute/removal workflow). Settlement status is
/// not writable here.
pub async fn update_status(
    worklog_id: Uuid,
    id: Uuid,
    status: TimeSegmentStatus,
) -> Result<Option<TimeSegment>, sqlx::Error> {
    let segment = sqlx::query_as::<_, TimeSegment>(&sql(&format!(
        r#"
        UPDATE time_segments
        SET status = ?
        WHERE id = ?
          AND worklog_id = ?
        RETURNING {SEGMENT_COLUMNS}
        "#
    )))
    .bind(status)
    .bind(id)
    .bind(worklog_id)
    .fetch_optional(&get_pool())
    .await?;

    Ok(segment)
}

pub async fn mark_remitted(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    remittance_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(&sql(r#"
        UPDATE time_segments
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
