//! Per-user news categories
//!
//! Stored as a JSONB array of strings. Legacy rows can hold anything, so
//! reads for update go through normalization first; the raw value is only
//! ever returned untouched by the plain get.

pub mod normalize;
pub mod handlers;

pub use normalize::{normalize_categories, union_categories};
