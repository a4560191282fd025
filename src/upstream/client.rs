use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::FixtureSource;
use crate::error::UpstreamError;

const API_KEY_HEADER: &str = "x-apisports-key";

/// Client for the API-Football v3 REST API.
/// Docs: <https://www.api-football.com/documentation-v3>
#[derive(Clone)]
pub struct ApiFootballClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl ApiFootballClient {
    pub fn new(base_url: &Url, api_key: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(ApiFootballClient {
            http,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// One GET against `path` with the given query parameters. No retries.
    pub async fn fetch(&self, path: &str, params: &[(&str, String)]) -> Result<Value, UpstreamError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, params);

        let resp = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                warn!("API-Football request to {} failed: {}", path, e);
                UpstreamError::Request(e)
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!("API-Football {} returned {}", path, status);
            return Err(UpstreamError::Status { status, body });
        }

        let bytes = resp.bytes().await?;
        let raw: Value = serde_json::from_slice(&bytes).map_err(UpstreamError::Decode)?;

        if let Some(errors) = api_errors(&raw) {
            warn!("API-Football {} reported errors: {}", path, errors);
            return Err(UpstreamError::Api(errors));
        }
        Ok(raw)
    }
}

#[async_trait]
impl FixtureSource for ApiFootballClient {
    async fn live_fixtures(&self, live: &str, timezone: &str) -> Result<Vec<Value>, UpstreamError> {
        let raw = self
            .fetch(
                "/fixtures",
                &[("live", live.to_string()), ("timezone", timezone.to_string())],
            )
            .await?;
        Ok(response_items(raw))
    }

    async fn fixtures_on(
        &self,
        league: u32,
        season: i32,
        date: NaiveDate,
        timezone: &str,
    ) -> Result<Vec<Value>, UpstreamError> {
        let raw = self
            .fetch(
                "/fixtures",
                &[
                    ("league", league.to_string()),
                    ("season", season.to_string()),
                    ("date", date.format("%Y-%m-%d").to_string()),
                    ("timezone", timezone.to_string()),
                ],
            )
            .await?;
        Ok(response_items(raw))
    }
}

/// The `response` array of an API-Football payload; empty when absent.
pub fn response_items(raw: Value) -> Vec<Value> {
    match raw {
        Value::Object(mut map) => match map.remove("response") {
            Some(Value::Array(items)) => items,
            _ => vec![],
        },
        _ => vec![],
    }
}

/// API-Football reports failures with a 200 status and an `errors` field
/// that is either an object (`{"token": "..."}`) or a list. Returns a
/// printable summary when that field is non-empty.
fn api_errors(raw: &Value) -> Option<String> {
    match raw.get("errors")? {
        Value::Object(map) if !map.is_empty() => Some(
            map.iter()
                .map(|(k, v)| format!("{}: {}", k, value_text(v)))
                .collect::<Vec<_>>()
                .join("; "),
        ),
        Value::Array(items) if !items.is_empty() => {
            Some(items.iter().map(value_text).collect::<Vec<_>>().join("; "))
        }
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
