use actix_web::{web, HttpResponse, Result};
use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{
    Adjustment, AdjustmentInput, TimeSegment, TimeSegmentInput, TimeSegmentStatus, WorkLog,
    WorkLogInput,
};
use crate::database::repositories::{
    adjustment as adjustment_repo, task as task_repo, time_segment as time_segment_repo,
    worklog as worklog_repo,
};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::ledger::{self, WorkLogAmounts, WorkLogSettlement};
use crate::services::UserContext;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkLogListQuery {
    pub remittance_status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSegmentStatusRequest {
    pub status: TimeSegmentStatus,
}

/// Worklog with its payable units and the derived money view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkLogView {
    pub id: Uuid,
    pub task_id: Uuid,
    pub worker_id: Uuid,
    pub hourly_rate: BigDecimal,
    pub remittance_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub time_segments: Vec<TimeSegment>,
    pub adjustments: Vec<Adjustment>,
    pub amounts: WorkLogAmounts,
    pub remittance_status: WorkLogSettlement,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkLogsResponse {
    pub data: Vec<WorkLogView>,
    pub count: usize,
}

async fn build_view(worklog: WorkLog) -> Result<WorkLogView, AppError> {
    let segments = time_segment_repo::find_by_worklog(worklog.id).await?;
    let adjustments = adjustment_repo::find_by_worklog(worklog.id).await?;

    let amounts = ledger::worklog_amounts(&worklog, &segments, &adjustments)?;
    let remittance_status = amounts.classification();

    Ok(WorkLogView {
        id: worklog.id,
        task_id: worklog.task_id,
        worker_id: worklog.worker_id,
        hourly_rate: worklog.hourly_rate,
        remittance_id: worklog.remittance_id,
        created_at: worklog.created_at,
        time_segments: segments,
        adjustments,
        amounts,
        remittance_status,
    })
}

pub async fn create_worklog(
    ctx: UserContext,
    input: web::Json<WorkLogInput>,
) -> Result<HttpResponse, AppError> {
    ctx.requires_manager()?;

    let input = input.into_inner();
    if input.hourly_rate < BigDecimal::zero() {
        return Err(AppError::BadRequest(
            "hourlyRate must not be negative".to_string(),
        ));
    }

    task_repo::find_by_id(input.task_id)
        .await?
        .ok_or_else(|| AppError::BadRequest(format!("Task {} not found", input.task_id)))?;

    let worklog = worklog_repo::create_worklog(input).await.map_err(|e| {
        log::error!("Failed to create worklog: {}", e);
        AppError::DatabaseError(e)
    })?;

    Ok(ApiResponse::created(worklog))
}

/// Ledger view across all worklogs, with an optional classification filter.
pub async fn get_worklogs(
    _ctx: UserContext,
    query: web::Query<WorkLogListQuery>,
) -> Result<HttpResponse, AppError> {
    let filter = query
        .remittance_status
        .as_deref()
        .map(str::parse::<WorkLogSettlement>)
        .transpose()
        .map_err(|_| {
            AppError::BadRequest("remittanceStatus must be REMITTED or UNREMITTED".to_string())
        })?;

    let worklogs = worklog_repo::find_all().await?;

    let mut views = Vec::with_capacity(worklogs.len());
    for worklog in worklogs {
        let view = build_view(worklog).await?;
        if let Some(wanted) = filter {
            if view.remittance_status != wanted {
                continue;
            }
        }
        views.push(view);
    }

    let count = views.len();
    Ok(ApiResponse::success(WorkLogsResponse { data: views, count }))
}

pub async fn get_worklog(
    _ctx: UserContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let worklog_id = path.into_inner();

    let worklog = worklog_repo::find_by_id(worklog_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Worklog not found".to_string()))?;

    Ok(ApiResponse::success(build_view(worklog).await?))
}

/// Log a time segment against a worklog. New segments always start UNREMITTED
/// regardless of the worklog's settlement history.
pub async fn log_time(
    _ctx: UserContext,
    path: web::Path<Uuid>,
    input: web::Json<TimeSegmentInput>,
) -> Result<HttpResponse, AppError> {
    let worklog_id = path.into_inner();
    let input = input.into_inner();

    if input.end_time < input.start_time {
        return Err(AppError::BadRequest(
            "endTime must not be before startTime".to_string(),
        ));
    }

    worklog_repo::find_by_id(worklog_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Worklog not found".to_string()))?;

    let segment = time_segment_repo::create_segment(worklog_id, input)
        .await
        .map_err(|e| {
            log::error!("Failed to create segment for worklog {}: {}", worklog_id, e);
            AppError::DatabaseError(e)
        })?;

    Ok(ApiResponse::created(segment))
}

/// Dispute/removal workflow entry point. Only the work status moves here;
/// settlement status belongs to the remittance engine.
pub async fn update_segment_status(
    ctx: UserContext,
    path: web::Path<(Uuid, Uuid)>,
    input: web::Json<UpdateSegmentStatusRequest>,
) -> Result<HttpResponse, AppError> {
    ctx.requires_manager()?;

    let (worklog_id, segment_id) = path.into_inner();

    let segment = time_segment_repo::update_status(worklog_id, segment_id, input.status)
        .await
        .map_err(|e| {
            log::error!("Failed to update segment {}: {}", segment_id, e);
            AppError::DatabaseError(e)
        })?
        .ok_or_else(|| AppError::NotFound("Segment not found".to_string()))?;

    Ok(ApiResponse::success(segment))
}

/// Add a bonus, deduction or correction. Valid at any time, including after
/// the worklog has been fully paid; the adjustment is swept into the next
/// remittance run.
pub async fn add_adjustment(
    ctx: UserContext,
    path: web::Path<Uuid>,
    input: web::Json<AdjustmentInput>,
) -> Result<HttpResponse, AppError> {
    ctx.requires_manager()?;

    let worklog_id = path.into_inner();
    let input = input.into_inner();

    if input.reason.trim().is_empty() {
        return Err(AppError::BadRequest("reason must not be empty".to_string()));
    }

    worklog_repo::find_by_id(worklog_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Worklog not found".to_string()))?;

    let adjustment = adjustment_repo::create_adjustment(worklog_id, input)
        .await
        .map_err(|e| {
            log::error!(
                "Failed to create adjustment for worklog {}: {}",
                worklog_id,
                e
            );
            AppError::DatabaseError(e)
        })?;

    Ok(ApiResponse::created(adjustment))
}
