use thiserror::Error;

use crate::FailureKind;

/// Errors from [`crate::SpatialSource::features_within`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpatialSourceError {
    /// The service rejected the query because of its rate limit.
    #[error("spatial service at {url} is rate limiting requests")]
    RateLimited {
        /// Request URL.
        url: String,
        /// Seconds to wait, when the service said so.
        retry_after_secs: Option<u64>,
    },
    /// The request did not complete within the configured timeout.
    #[error("spatial query to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Request URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The connection failed before a response arrived.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Request URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The service answered with a non-success status.
    #[error("spatial service at {url} returned HTTP {status}: {message}")]
    Http {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to decode spatial response: {message}")]
    Parse {
        /// Decoder error description.
        message: String,
    },
    /// The service reported a query failure in an otherwise valid response.
    #[error("spatial service error: {message}")]
    Service {
        /// Message reported by the service.
        message: String,
    },
}

impl SpatialSourceError {
    /// Report whether the service asked the caller to slow down.
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

/// Errors from [`crate::PoiAcquirer`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AcquireError {
    /// The site has not been geocoded.
    #[error("coordinates are required to search for nearby features")]
    MissingCoordinates,
    /// The search radius is not a positive finite number of metres.
    #[error("search radius must be positive and finite, got {radius_m}")]
    InvalidRadius {
        /// Rejected radius.
        radius_m: f64,
    },
    /// The spatial service is rate limiting.
    #[error("spatial query throttled")]
    Throttled {
        /// Underlying rate-limit response.
        #[source]
        source: SpatialSourceError,
    },
    /// Any other spatial query failure.
    #[error("spatial query failed")]
    QueryFailed {
        /// Underlying service failure.
        #[source]
        source: SpatialSourceError,
    },
}

impl AcquireError {
    /// Classify the error for batch reporting.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::MissingCoordinates | Self::InvalidRadius { .. } => FailureKind::InvalidInput,
            Self::Throttled { .. } => FailureKind::Throttled,
            Self::QueryFailed { .. } => FailureKind::QueryFailed,
        }
    }
}

impl From<SpatialSourceError> for AcquireError {
    fn from(source: SpatialSourceError) -> Self {
        if source.is_rate_limited() {
            Self::Throttled { source }
        } else {
            Self::QueryFailed { source }
        }
    }
}
