use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::auth::middleware::AuthenticatedUser;
use crate::categories::normalize::{normalize_categories, union_categories};
use crate::error::{AppError, DatabaseError};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateCategoriesRequest {
    #[serde(rename = "newCategories")]
    pub new_categories: Vec<String>,
}

pub async fn update_categories(
    user: AuthenticatedUser,
    req: web::Json<UpdateCategoriesRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    if req.new_categories.is_empty() {
        return Err(AppError::ValidationError("Invalid input".to_string()));
    }

    let stored = state
        .db
        .fetch_categories(user.user_id)
        .await?
        .ok_or(AppError::DatabaseError(DatabaseError::NotFound))?;

    // Whatever shape the stored value has, the update works on a clean list
    let current = normalize_categories(&stored);
    let merged = union_categories(&current, &req.new_categories);

    let updated = state
        .db
        .update_categories(user.user_id, &json!(merged))
        .await?;

    info!(
        "Updated categories for user {}: {} total",
        user.user_id,
        merged.len()
    );

    Ok(HttpResponse::Ok().json(json!({
        "message": "Categories updated",
        "categories": updated
    })))
}

pub async fn get_categories(
    user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let categories = state
        .db
        .fetch_categories(user.user_id)
        .await?
        .ok_or(AppError::DatabaseError(DatabaseError::NotFound))?;

    // Returned raw, exactly as stored
    Ok(HttpResponse::Ok().json(json!({ "categories": categories })))
}
