use reqwest::StatusCode;
use thiserror::Error;

/// Problems with the startup configuration. Any of these stops the process
/// before it binds a socket.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("APISPORTS_KEY is missing or empty; set it in the environment or .env")]
    MissingApiKey,

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Failure of a single call to the fixtures API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Transport failure, including the request timeout.
    #[error("upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("upstream returned a non-JSON body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The payload carried a non-empty `errors` field.
    #[error("upstream reported errors: {0}")]
    Api(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_readable() {
        let e = ConfigError::Invalid {
            field: "SCORES_TIMEZONE",
            reason: "unknown zone 'Mars/Olympus'".into(),
        };
        assert_eq!(
            e.to_string(),
            "invalid SCORES_TIMEZONE: unknown zone 'Mars/Olympus'"
        );

        let e = UpstreamError::Status {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: "slow down".into(),
        };
        assert_eq!(
            e.to_string(),
            "upstream returned 429 Too Many Requests: slow down"
        );
    }
}
