use actix_web::{web, HttpResponse, Result};
use uuid::Uuid;

use crate::database::models::TaskInput;
use crate::database::repositories::task as task_repo;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::UserContext;

pub async fn create_task(
    ctx: UserContext,
    input: web::Json<TaskInput>,
) -> Result<HttpResponse, AppError> {
    ctx.requires_manager()?;

    let input = input.into_inner();
    if input.title.trim().is_empty() {
        return Err(AppError::BadRequest("title must not be empty".to_string()));
    }

    let task = task_repo::create_task(input).await.map_err(|e| {
        log::error!("Failed to create task: {}", e);
        AppError::DatabaseError(e)
    })?;

    Ok(ApiResponse::created(task))
}

pub async fn get_tasks(_ctx: UserContext) -> Result<HttpResponse, AppError> {
    let tasks = task_repo::find_all().await.map_err(|e| {
        log::error!("Failed to fetch tasks: {}", e);
        AppError::DatabaseError(e)
    })?;

    Ok(ApiResponse::success(tasks))
}

pub async fn get_task(_ctx: UserContext, path: web::Path<Uuid>) -> Result<HttpResponse, AppError> {
    let task_id = path.into_inner();

    let task = task_repo::find_by_id(task_id)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch task {}: {}", task_id, e);
            AppError::DatabaseError(e)
        })?
        .ok_or_else(|| AppError::NotFound("Task not found".to_string()))?;

    Ok(ApiResponse::success(task))
}
