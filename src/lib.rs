pub mod auth;
pub mod categories;
pub mod config;
pub mod db;
pub mod error;
pub mod news;

use std::sync::Arc;
use std::time::Duration;
use actix_web::HttpResponse;

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use config::Settings;

pub use auth::{AuthService, AuthenticatedUser, RateLimiter, RateLimitConfig};
pub use db::{DbOperations, User};
pub use news::{NewsAggregator, NewsClient};

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Application state shared across all components
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub db: Arc<DbOperations>,
    pub auth: Arc<AuthService>,
    pub news: Arc<NewsAggregator>,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Connects the database pool and wires every service around it.
    pub async fn new(config: Settings) -> Result<Self> {
        let db = DbOperations::new_with_options(
            &config.database.url,
            config.database.max_connections,
            Duration::from_secs(5),
        )
        .await?;

        Self::with_db(config, db)
    }

    /// Builds the state around an existing database handle. Tests use this
    /// with a lazy pool so construction never touches the network.
    pub fn with_db(config: Settings, db: DbOperations) -> Result<Self> {
        let db = Arc::new(db);
        let auth = Arc::new(AuthService::new(db.clone(), config.auth.jwt_secret.clone()));
        let client = Arc::new(NewsClient::new(&config.news)?);
        let news = Arc::new(NewsAggregator::new(client));
        let limiter = Arc::new(RateLimiter::new(RateLimitConfig::from(&config.rate_limit)));

        Ok(Self {
            config: Arc::new(config),
            db,
            auth,
            news,
            limiter,
        })
    }

    pub async fn shutdown(&self) -> Result<()> {
        // Close database connections
        self.db.pool().close().await;

        Ok(())
    }
}
