//! Database module for the NewsDesk server
//!
//! Postgres access for user accounts and their stored news categories.

pub mod models;
pub mod operations;

pub use models::User;
pub use operations::DbOperations;
