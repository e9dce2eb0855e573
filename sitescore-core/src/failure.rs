//! Failure taxonomy shared by the enrichment stages.

use std::fmt;

/// Coarse classification of an enrichment failure.
///
/// Every stage error maps onto one of these kinds via its `kind()` method so
/// batch reports can count failures without matching on stage-specific
/// variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum FailureKind {
    /// A required field was missing or a parameter was out of range.
    InvalidInput,
    /// The geocoding backend could not be reached.
    ServiceUnavailable,
    /// Every address variant was tried without a match.
    NoMatch,
    /// The spatial service asked the caller to slow down.
    Throttled,
    /// Any other spatial query failure.
    QueryFailed,
}

impl FailureKind {
    /// Return the kind as a `snake_case` string.
    ///
    /// # Examples
    /// ```
    /// use sitescore_core::FailureKind;
    ///
    /// assert_eq!(FailureKind::NoMatch.as_str(), "no_match");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::ServiceUnavailable => "service_unavailable",
            Self::NoMatch => "no_match",
            Self::Throttled => "throttled",
            Self::QueryFailed => "query_failed",
        }
    }

    /// Report whether retrying the same call later may succeed.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::ServiceUnavailable | Self::Throttled)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
