use actix_web::{web, HttpResponse};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, error};

use crate::AppState;
use crate::error::AppError;

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
}

fn validate_registration(req: &RegisterRequest) -> Result<(), AppError> {
    if !is_valid_email(&req.email)
        || req.password.chars().count() < 6
        || req.username.chars().count() < 3
    {
        return Err(AppError::ValidationError("Invalid input".to_string()));
    }
    Ok(())
}

pub async fn register(
    req: web::Json<RegisterRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received registration request for email: {}", req.email);

    validate_registration(&req)?;

    match state.auth.register(&req.email, &req.password, &req.username).await {
        Ok((user, token)) => {
            info!("Registration successful for user id: {}", user.id);
            Ok(HttpResponse::Created().json(AuthResponse {
                message: "User created".to_string(),
                token,
            }))
        }
        Err(e) => {
            error!("Registration failed for email: {}: {}", req.email, e);
            Err(e)
        }
    }
}

pub async fn login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    // Absent and empty fields are the same failure
    let email = req.email.as_deref().filter(|s| !s.is_empty());
    let password = req.password.as_deref().filter(|s| !s.is_empty());
    let (Some(email), Some(password)) = (email, password) else {
        return Err(AppError::ValidationError(
            "Email and password are required".to_string(),
        ));
    };

    info!("Received login request for email: {}", email);

    match state.auth.login(email, password).await {
        Ok((_, token)) => {
            info!("Login successful for email: {}", email);
            Ok(HttpResponse::Ok().json(AuthResponse {
                message: "Login successful".to_string(),
                token,
            }))
        }
        Err(e) => {
            error!("Login failed for email: {}: {}", email, e);
            Err(e)
        }
    }
}
