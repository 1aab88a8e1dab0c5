//! Error types for the Coinbase brokerage client library.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for all Coinbase client operations.
#[derive(Error, Debug)]
pub enum CoinbaseError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP request with middleware failed
    #[error("HTTP request failed: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    /// The server answered with a non-success status code.
    #[error("{method} {target} -> {status} {body}")]
    Transport {
        /// HTTP method of the failed attempt
        method: String,
        /// Full request target (URL including query)
        target: String,
        /// Status code returned by the server
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Every attempt allowed by the retry policy failed.
    #[error("{method} {target} failed after {attempts} attempts: {source}")]
    ExhaustedRetries {
        /// HTTP method of the request
        method: String,
        /// Full request target (URL including query)
        target: String,
        /// Number of attempts made
        attempts: u32,
        /// Error of the final attempt
        #[source]
        source: Box<CoinbaseError>,
    },

    /// Response body did not match the expected shape.
    #[error("Response validation failed for {target}: {source}")]
    SchemaValidation {
        /// Full request target (URL including query)
        target: String,
        /// Underlying deserialization error
        #[source]
        source: serde_json::Error,
    },

    /// Increment string is not `"1"` or a power-of-ten decimal
    #[error("Invalid increment: {0}")]
    InvalidIncrement(String),

    /// Value cannot be quantized (negative or non-finite)
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Coinbase rejected the request in a well-formed response
    #[error("Coinbase API error: {0}")]
    Api(ApiError),

    /// A requested entity was absent from an otherwise valid response
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response parsed but violates the API contract
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Nothing cached at the given path
    #[error("Cache miss for {}", path.display())]
    CacheMiss {
        /// Path of the missing cache file
        path: PathBuf,
    },

    /// Cached file exists but cannot be parsed
    #[error("Corrupt cache file {}: {source}", path.display())]
    CacheCorrupt {
        /// Path of the unreadable cache file
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// No credentials configured for signed requests
    #[error("Missing credentials: a Coinbase API key name and private key are required")]
    MissingCredentials,

    /// Credentials exist but cannot be turned into a signing key
    #[error("Missing signing keys: {0}")]
    MissingSigningKeys(String),

    /// Token signing failed
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Environment configuration is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),
}

impl CoinbaseError {
    /// Whether the retry policy may attempt the request again after this error.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CoinbaseError::Http(_) | CoinbaseError::HttpMiddleware(_) | CoinbaseError::Transport { .. }
        )
    }

    /// HTTP status code carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            CoinbaseError::Transport { status, .. } => Some(*status),
            CoinbaseError::Http(e) => e.status().map(|s| s.as_u16()),
            CoinbaseError::ExhaustedRetries { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Whether the error came from the on-disk cache.
    pub fn is_cache_error(&self) -> bool {
        matches!(
            self,
            CoinbaseError::CacheMiss { .. } | CoinbaseError::CacheCorrupt { .. }
        )
    }
}

/// A rejection reported by Coinbase inside a successful HTTP response.
///
/// Order creation reports a `preview_failure_reason` and batch cancellation a
/// `failure_reason`; both land here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Operation that was rejected (e.g. "create_order")
    pub operation: String,
    /// Reason string returned by Coinbase
    pub reason: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.operation, self.reason)
    }
}

impl ApiError {
    /// Create a new API error from operation and reason.
    pub fn new(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is an insufficient funds rejection.
    pub fn is_insufficient_funds(&self) -> bool {
        self.reason.contains(reasons::INSUFFICIENT_FUND)
    }

    /// Check if the order was rejected for an invalid size or price precision.
    pub fn is_invalid_precision(&self) -> bool {
        self.reason == reasons::INVALID_PRICE_PRECISION
            || self.reason == reasons::INVALID_SIZE_PRECISION
    }
}

/// Known Coinbase order preview failure reasons.
pub mod reasons {
    pub const INSUFFICIENT_FUND: &str = "PREVIEW_INSUFFICIENT_FUND";
    pub const INVALID_PRICE_PRECISION: &str = "PREVIEW_INVALID_PRICE_PRECISION";
    pub const INVALID_SIZE_PRECISION: &str = "PREVIEW_INVALID_SIZE_PRECISION";
    pub const INVALID_LIMIT_PRICE: &str = "PREVIEW_INVALID_LIMIT_PRICE";
    pub const UNKNOWN_FAILURE: &str = "UNKNOWN_FAILURE_REASON";
}
