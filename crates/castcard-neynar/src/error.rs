use thiserror::Error;

/// Errors returned by the Neynar API client.
#[derive(Debug, Error)]
pub enum NeynarError {
    /// Network, TLS or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered 404 for the requested resource.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-2xx response.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl NeynarError {
    /// `true` when the user or resource does not exist, as opposed to the
    /// provider being unreachable or misbehaving.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, NeynarError::NotFound(_))
    }
}
