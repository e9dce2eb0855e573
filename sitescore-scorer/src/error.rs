//! Error types raised while scoring a cohort.

use sitescore_core::FailureKind;
use thiserror::Error;

use crate::VenueType;

/// Errors raised by the composite scorer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    /// The requested venue type has no weighting profile.
    #[error("unknown venue type {name:?}; expected one of {}", VenueType::names())]
    UnknownVenueType {
        /// Name supplied by the caller.
        name: String,
    },
}

impl ScoreError {
    /// Classify the error for batch reporting.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::UnknownVenueType { .. } => FailureKind::InvalidInput,
        }
    }
}
