use thiserror::Error;

/// Errors returned by [`crate::CatalogClient`].
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog has no record at this URL (HTTP 404).
    #[error("catalog record not found: {url}")]
    NotFound { url: String },

    /// Any other non-2xx response.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body did not match the expected payload shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid catalog base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
