use actix_web::{web, HttpResponse, Result};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::repositories::remittance as remittance_repo;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::settlement::{self, GenerateRemittancesInput};
use crate::services::UserContext;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemittanceListQuery {
    pub worker_id: Option<Uuid>,
}

/// Run the settlement batcher. Dry runs are open to any authenticated
/// caller; a real run moves money state and needs manager privileges.
pub async fn generate_remittances(
    ctx: UserContext,
    input: Option<web::Json<GenerateRemittancesInput>>,
) -> Result<HttpResponse, AppError> {
    let input = input.map(web::Json::into_inner).unwrap_or_default();

    if !input.dry_run {
        ctx.requires_manager()?;
    }

    let summary = settlement::generate_remittances(input).await?;

    Ok(ApiResponse::success(summary))
}

pub async fn get_remittances(
    _ctx: UserContext,
    query: web::Query<RemittanceListQuery>,
) -> Result<HttpResponse, AppError> {
    let remittances = match query.worker_id {
        Some(worker_id) => remittance_repo::find_by_worker(worker_id).await?,
        None => remittance_repo::find_all().await?,
    };

    Ok(ApiResponse::success(remittances))
}

pub async fn get_remittance(
    _ctx: UserContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let remittance_id = path.into_inner();

    let remittance = remittance_repo::find_by_id(remittance_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Remittance not found".to_string()))?;

    Ok(ApiResponse::success(remittance))
}
