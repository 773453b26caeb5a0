//! News fetching for the NewsDesk server
//!
//! A thin client over the upstream news API plus the fan-out aggregator
//! that turns a set of topics into one merged article list.

pub mod client;
pub mod aggregator;
pub mod handlers;

pub use client::NewsClient;
pub use aggregator::NewsAggregator;
