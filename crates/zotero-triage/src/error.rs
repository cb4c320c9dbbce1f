//! Error types for the triage pipeline.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.
//! Each pipeline stage has its own error enum; [`FetchError`] ties the fetch stage together.

use std::time::Duration;

/// Errors from the HTTP transport layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Middleware error
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// Rate limited by the Zotero API (429 response)
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Suggested wait time before retry
        retry_after: Duration,
    },

    /// Library is private and no (or an insufficient) API key was sent (403 response)
    #[error("Access forbidden: {message}")]
    Forbidden {
        /// Error message from API
        message: String,
    },

    /// Group or collection not found (404 response)
    #[error("Resource not found: {resource}")]
    NotFound {
        /// Description of the missing resource
        resource: String,
    },

    /// Invalid request parameters (400 response)
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message from API
        message: String,
    },

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response body was valid JSON but not an array of items
    #[error("Expected a JSON array of items, got {found}")]
    NotAnArray {
        /// JSON type that was returned instead
        found: &'static str,
    },

    /// Server error (5xx response)
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },
}

impl ClientError {
    /// Create a rate limited error with retry-after duration.
    #[must_use]
    pub fn rate_limited(seconds: u64) -> Self {
        Self::RateLimited { retry_after: Duration::from_secs(seconds) }
    }

    /// Create a forbidden error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden { message: message.into() }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    /// Create a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    /// Returns true if a later attempt could plausibly succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Server { .. })
    }

    /// Get the retry-after duration if this is a rate limit error.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}

/// A raw item did not match the record schema.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid item {} (page start {start}, index {index}): {message}", .key.as_deref().unwrap_or("<no key>"))]
pub struct ValidationError {
    /// Item key, when the raw item carried one.
    pub key: Option<String>,
    /// Page cursor of the page the item came from.
    pub start: usize,
    /// Position of the item within the raw page.
    pub index: usize,
    /// What was wrong with the item.
    pub message: String,
}

impl ValidationError {
    /// Create a validation error for the item at `index` of the page starting at `start`.
    #[must_use]
    pub fn new(
        key: Option<String>,
        start: usize,
        index: usize,
        message: impl Into<String>,
    ) -> Self {
        Self { key, start, index, message: message.into() }
    }
}

/// Invalid fetcher or classifier configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Roster has no names, so assignment tags can never be recognized.
    #[error("Roster must contain at least one name")]
    EmptyRoster,

    /// A roster entry is the empty string.
    #[error("Roster entry {index} is empty")]
    EmptyRosterName {
        /// Position of the empty entry
        index: usize,
    },

    /// A relevance label is the empty string.
    #[error("Relevance label for '{relevance}' is empty")]
    EmptyRelevanceLabel {
        /// Which relevance value the label belongs to
        relevance: &'static str,
    },

    /// Two relevance values share the same label.
    #[error("Relevance label '{label}' is used for more than one relevance value")]
    DuplicateRelevanceLabel {
        /// The shared label
        label: String,
    },

    /// A tag would be both a relevance label and a roster name.
    #[error("Tag '{tag}' is both a relevance label and a roster name")]
    AmbiguousTag {
        /// The ambiguous tag
        tag: String,
    },

    /// No fallback assignee configured.
    #[error("Default assignee must not be empty")]
    EmptyDefaultAssignee,

    /// Page size of zero would never advance the cursor.
    #[error("Page size must be at least 1, got {0}")]
    InvalidPageSize(usize),
}

/// Errors from fetching a collection.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// A page request failed or returned an unparseable body.
    #[error("Transport error fetching page at start {start}: {source}")]
    Transport {
        /// Page cursor of the failed request
        start: usize,
        /// Underlying transport error
        #[source]
        source: ClientError,
    },

    /// An item on a page failed schema validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Fetcher configuration is unusable.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl FetchError {
    /// Wrap a transport error with the page cursor it occurred at.
    #[must_use]
    pub const fn transport(start: usize, source: ClientError) -> Self {
        Self::Transport { start, source }
    }

    /// Key of the offending item, for validation failures.
    #[must_use]
    pub fn item_key(&self) -> Option<&str> {
        match self {
            Self::Validation(err) => err.key.as_deref(),
            _ => None,
        }
    }

    /// Whether the underlying transport failure was transient.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { source, .. } => source.is_retryable(),
            _ => false,
        }
    }

    /// Wait suggested by the API when the fetch was rate limited.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Transport { source, .. } => source.retry_after(),
            _ => None,
        }
    }

    /// Pipeline stage that failed, for log fields.
    #[must_use]
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Validation(_) => "validation",
            Self::Config(_) => "configuration",
        }
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_retryable() {
        assert!(ClientError::rate_limited(60).is_retryable());
        assert!(ClientError::server(500, "Internal error").is_retryable());

        assert!(!ClientError::not_found("group 1").is_retryable());
        assert!(!ClientError::bad_request("invalid start").is_retryable());
        assert!(!ClientError::forbidden("private library").is_retryable());
    }

    #[test]
    fn test_fetch_error_retry_hints() {
        let limited = FetchError::transport(200, ClientError::rate_limited(15));
        assert!(limited.is_retryable());
        assert_eq!(limited.retry_after(), Some(Duration::from_secs(15)));

        let forbidden = FetchError::transport(0, ClientError::forbidden("private"));
        assert!(!forbidden.is_retryable());
        assert_eq!(forbidden.retry_after(), None);

        let invalid: FetchError = ValidationError::new(None, 0, 0, "bad").into();
        assert!(!invalid.is_retryable());
        assert_eq!(invalid.retry_after(), None);
    }

    #[test]
    fn test_client_error_retry_after() {
        let err = ClientError::rate_limited(60);
        assert_eq!(err.retry_after(), Some(Duration::from_secs(60)));

        let err = ClientError::not_found("collection");
        assert_eq!(err.retry_after(), None);
    }

    #[test]
    fn test_validation_error_names_key() {
        let err = ValidationError::new(Some("ABCD1234".to_string()), 100, 7, "missing field `title`");
        let message = err.to_string();
        assert!(message.contains("ABCD1234"));
        assert!(message.contains("100"));
        assert!(message.contains("missing field `title`"));

        let err = ValidationError::new(None, 0, 0, "not an object");
        assert!(err.to_string().contains("<no key>"));
    }

    #[test]
    fn test_fetch_error_stage() {
        let err = FetchError::transport(200, ClientError::server(502, "bad gateway"));
        assert_eq!(err.stage(), "transport");
        assert!(err.to_string().contains("200"));
        assert_eq!(err.item_key(), None);

        let err = FetchError::from(ValidationError::new(Some("K1".to_string()), 0, 3, "bad"));
        assert_eq!(err.stage(), "validation");
        assert_eq!(err.item_key(), Some("K1"));

        let err = FetchError::from(ConfigError::InvalidPageSize(0));
        assert_eq!(err.stage(), "configuration");
    }
}
