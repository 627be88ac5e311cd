use std::future::{ready, Ready};

use actix_web::{dev::Payload, web::Data, Error as ActixError, FromRequest, HttpRequest};
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::{self, Claims, UserRole};

/// Authenticated caller, extracted from the bearer token on every request
/// that declares it as a handler argument.
#[derive(Debug, Clone)]
pub struct UserContext {
    pub claims: Claims,
}

impl UserContext {
    pub fn user_id(&self) -> Uuid {
        self.claims.sub
    }

    pub fn is_admin(&self) -> bool {
        self.claims.role == UserRole::Admin
    }

    pub fn is_manager_or_admin(&self) -> bool {
        matches!(self.claims.role, UserRole::Admin | UserRole::Manager)
    }

    pub fn requires_manager(&self) -> Result<(), AppError> {
        if self.is_manager_or_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Manager or admin role required".to_string(),
            ))
        }
    }

    pub fn requires_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin role required".to_string()))
        }
    }
}

impl FromRequest for UserContext {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_context(req).map_err(Into::into))
    }
}

fn extract_context(req: &HttpRequest) -> Result<UserContext, AppError> {
    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| AppError::internal_server_error_message("Config not registered"))?;

    let token = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthorized)?;

    let claims = auth::verify_token(token, config)?;
    Ok(UserContext { claims })
}
