use thiserror::Error;

use crate::FailureKind;

/// Errors from [`crate::Geocoder::geocode`].
///
/// Every variant means the service could not answer; "no match" is not an
/// error and is reported as `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocoderError {
    /// The request did not complete within the configured timeout.
    #[error("geocoding request to {url} timed out after {timeout_secs}s")]
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
    #[error("geocoding service at {url} returned HTTP {status}: {message}")]
    Http {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to decode geocoding response: {message}")]
    Parse {
        /// Decoder error description.
        message: String,
    },
}

/// Errors from [`crate::GeocodingResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The record carries no address, or only whitespace.
    #[error("no address to geocode")]
    MissingAddress,
    /// The geocoding service was unavailable; remaining variants were skipped.
    #[error("geocoding service unavailable while resolving {query:?}")]
    ServiceUnavailable {
        /// Variant being looked up when the service failed.
        query: String,
        /// Underlying service failure.
        #[source]
        source: GeocoderError,
    },
    /// Every candidate variant was looked up without a match.
    #[error("no match for {address:?} after {attempts} candidate(s)")]
    NoMatch {
        /// Original address.
        address: String,
        /// Number of variants tried.
        attempts: usize,
    },
}

impl ResolveError {
    /// Classify the error for batch reporting.
    ///
    /// # Examples
    /// ```
    /// use sitescore_core::{FailureKind, ResolveError};
    ///
    /// assert_eq!(ResolveError::MissingAddress.kind(), FailureKind::InvalidInput);
    /// ```
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::MissingAddress => FailureKind::InvalidInput,
            Self::ServiceUnavailable { .. } => FailureKind::ServiceUnavailable,
            Self::NoMatch { .. } => FailureKind::NoMatch,
        }
    }
}
