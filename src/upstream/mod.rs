pub mod client;

pub use client::ApiFootballClient;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;

use crate::error::UpstreamError;

/// Source of raw API-Football fixture records.
///
/// Each method returns the `response` items of one upstream call.
#[async_trait]
pub trait FixtureSource: Send + Sync {
    /// In-progress fixtures for the dash-joined league IDs in `live`.
    async fn live_fixtures(&self, live: &str, timezone: &str) -> Result<Vec<Value>, UpstreamError>;

    /// All fixtures of one league on one calendar date.
    async fn fixtures_on(
        &self,
        league: u32,
        season: i32,
        date: NaiveDate,
        timezone: &str,
    ) -> Result<Vec<Value>, UpstreamError>;
}
