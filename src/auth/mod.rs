//! Authentication module for the NewsDesk server
//!
//! Registration, login, token issue/verify, the request extractor that
//! guards routes, and the blanket rate limiter.

pub mod handlers;
pub mod middleware;
mod password;
mod rate_limit;
mod service;

pub use middleware::AuthenticatedUser;
pub use rate_limit::{check_request, RateLimiter, RateLimitConfig};
pub use service::{AuthService, Claims};
