use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::middleware::AuthenticatedUser;
use crate::error::AppError;
use crate::AppState;

/// The aggregate endpoint's body names its array "category", singular;
/// the field name is part of the wire contract.
#[derive(Debug, Deserialize)]
pub struct NewsByCategoryRequest {
    pub category: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct SingleNewsRequest {
    pub category: Option<String>,
}

/// `Some` only for a non-empty array made entirely of strings.
fn parse_topics(value: Option<&Value>) -> Option<Vec<String>> {
    let array = value?.as_array()?;
    if array.is_empty() {
        return None;
    }
    array
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

pub async fn news_by_category(
    user: AuthenticatedUser,
    req: web::Json<NewsByCategoryRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let topics = parse_topics(req.category.as_ref()).ok_or_else(|| {
        AppError::ValidationError("Categories array is required and must not be empty".to_string())
    })?;

    info!(
        "Fetching news for user {} across {} categories",
        user.user_id,
        topics.len()
    );

    let news = state.news.fetch_news_for_topics(&topics).await?;

    Ok(HttpResponse::Ok().json(json!({
        "news": news,
        "message": "success"
    })))
}

pub async fn single_news_by_category(
    req: web::Json<SingleNewsRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let category = req
        .category
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::ValidationError("Category is required".to_string()))?;

    info!("Fetching single-category news for query: {}", category);

    let news = state.news.fetch_single_topic(category).await?;

    Ok(HttpResponse::Ok().json(json!({
        "news": news,
        "message": "success"
    })))
}
