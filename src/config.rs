use chrono_tz::Tz;
use clap::Parser;
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;
use crate::season::parse_timezone;

/// Football live/upcoming fixtures aggregator
#[derive(Parser, Debug, Clone)]
#[command(name = "footy-scores", version, about)]
pub struct Config {
    /// API-Football key sent as the `x-apisports-key` header (required)
    #[arg(long, env = "APISPORTS_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// API-Football base URL
    #[arg(
        long,
        env = "APISPORTS_BASE_URL",
        default_value = "https://v3.football.api-sports.io"
    )]
    pub api_base_url: String,

    /// Cache lifetime for live fixtures, in seconds
    #[arg(long, env = "LIVE_TTL_SECONDS", default_value = "30")]
    pub live_ttl_seconds: u64,

    /// Cache lifetime for a league's fixtures of the day, in seconds
    #[arg(long, env = "TODAY_TTL_SECONDS", default_value = "300")]
    pub today_ttl_seconds: u64,

    /// Upstream request timeout, in seconds
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value = "10")]
    pub upstream_timeout_secs: u64,

    /// IANA timezone used for "today", the season and kickoff times
    #[arg(long, env = "SCORES_TIMEZONE", default_value = "Europe/London")]
    pub timezone: String,

    /// HTTP listen address
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:5000")]
    pub listen_addr: String,

    /// Maximum number of cached upstream responses
    #[arg(long, env = "CACHE_MAX_ENTRIES", default_value = "256")]
    pub cache_max_entries: usize,

    /// Interval between sweeps of expired cache entries, in seconds
    #[arg(long, env = "CACHE_SWEEP_SECS", default_value = "60")]
    pub cache_sweep_secs: u64,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api_key()?;
        self.tz()?;
        self.base_url()?;
        if self.live_ttl_seconds == 0 {
            return Err(invalid("LIVE_TTL_SECONDS", "must be greater than zero"));
        }
        if self.today_ttl_seconds == 0 {
            return Err(invalid("TODAY_TTL_SECONDS", "must be greater than zero"));
        }
        if self.upstream_timeout_secs == 0 {
            return Err(invalid("UPSTREAM_TIMEOUT_SECS", "must be greater than zero"));
        }
        if self.cache_max_entries == 0 {
            return Err(invalid("CACHE_MAX_ENTRIES", "must be greater than zero"));
        }
        if self.cache_sweep_secs == 0 {
            return Err(invalid("CACHE_SWEEP_SECS", "must be greater than zero"));
        }
        Ok(())
    }

    /// The trimmed API key. Blank keys count as missing.
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    pub fn tz(&self) -> Result<Tz, ConfigError> {
        parse_timezone(&self.timezone)
    }

    pub fn base_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.api_base_url).map_err(|e| invalid("APISPORTS_BASE_URL", e.to_string()))
    }

    pub fn live_ttl(&self) -> Duration {
        Duration::from_secs(self.live_ttl_seconds)
    }

    pub fn today_ttl(&self) -> Duration {
        Duration::from_secs(self.today_ttl_seconds)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn cache_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.cache_sweep_secs)
    }

    /// Entries older than this are dropped by the sweeper; neither TTL class
    /// can still be serving them.
    pub fn cache_max_age(&self) -> Duration {
        self.live_ttl().max(self.today_ttl()) * 2
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
