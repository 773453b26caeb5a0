use actix_web::dev::ServiceRequest;
use actix_web::{HttpResponse, ResponseError};
use std::collections::HashMap;
use std::sync::Mutex;
use chrono::{DateTime, Utc, Duration};
use tracing::warn;

use crate::config;
use crate::error::{AppError, AuthError};

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub window_size: Duration,
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_size: Duration::seconds(600),
            max_requests: 100, // 100 requests per window
        }
    }
}

impl From<&config::RateLimitConfig> for RateLimitConfig {
    fn from(cfg: &config::RateLimitConfig) -> Self {
        Self {
            window_size: Duration::seconds(cfg.window_seconds as i64),
            max_requests: cfg.max_requests,
        }
    }
}

#[derive(Debug)]
struct RequestWindow {
    started_at: DateTime<Utc>,
    count: u32,
}

impl RequestWindow {
    fn new() -> Self {
        Self {
            started_at: Utc::now(),
            count: 0,
        }
    }

    fn has_elapsed(&self, window_size: Duration) -> bool {
        Utc::now() - self.started_at >= window_size
    }
}

/// Fixed-window counter per client key (source IP). The whole window's
/// budget resets at once when the window rolls over; there is no sliding.
///
/// Interior mutability is a sync `Mutex` so the check can run inside
/// middleware without awaiting.
pub struct RateLimiter {
    windows: Mutex<HashMap<String, RequestWindow>>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Counts the request against `key` and reports whether it is allowed.
    pub fn check_rate_limit(&self, key: &str) -> bool {
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());

        let window = windows
            .entry(key.to_string())
            .or_insert_with(RequestWindow::new);

        if window.has_elapsed(self.config.window_size) {
            *window = RequestWindow::new();
        }

        if window.count < self.config.max_requests {
            window.count += 1;
            true
        } else {
            false
        }
    }

    /// Drops windows that have rolled over; keeps the map from growing with
    /// every client ever seen.
    pub fn cleanup(&self) {
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());
        let window_size = self.config.window_size;
        windows.retain(|_, window| !window.has_elapsed(window_size));
    }
}

/// Guard for incoming requests, keyed by source IP. `None` lets the request
/// through; `Some` is the ready-made 429 to answer with instead.
pub fn check_request(limiter: &RateLimiter, req: &ServiceRequest) -> Option<HttpResponse> {
    let key = req
        .connection_info()
        .realip_remote_addr()
        .unwrap_or("unknown")
        .to_string();

    if limiter.check_rate_limit(&key) {
        None
    } else {
        warn!("Rate limited request from {}", key);
        Some(AppError::AuthError(AuthError::RateLimited).error_response())
    }
}
