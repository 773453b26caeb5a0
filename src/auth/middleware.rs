use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use tracing::warn;

use crate::error::{AppError, AuthError};
use crate::AppState;

/// Identity decoded from the bearer token. Extracting it guards a route:
/// an absent or non-bearer header yields 401, a token that fails
/// verification 403.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub email: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(AppError::AuthError(AuthError::MissingToken))?;

    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::InternalError("Application state is not configured".to_string()))?;

    let claims = state.auth.verify_token(token).map_err(|e| {
        warn!("Rejected bearer token: {}", e);
        e
    })?;

    Ok(AuthenticatedUser {
        user_id: claims.sub,
        email: claims.email,
    })
}
