//! Error types emitted by the Sitescore CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use sitescore_core::{AcquireError, ResolveError};
use sitescore_data::ProviderBuildError;
use sitescore_scorer::ScoreError;
use thiserror::Error;

/// Errors emitted by the Sitescore CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// The search radius is not a positive number of metres.
    #[error("--radius must be a positive number of metres, got {radius_m}")]
    InvalidRadius { radius_m: f64 },
    /// A coordinate is outside its valid range.
    #[error("--{field} {value} is outside [-{limit}, {limit}]")]
    InvalidCoordinate {
        field: &'static str,
        value: f64,
        limit: f64,
    },
    /// The venue type names no profile.
    #[error(transparent)]
    Score(#[from] ScoreError),
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Opening the cohort file failed.
    #[error("failed to open cohort at {path:?}: {source}")]
    OpenCohort {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Cohort JSON could not be decoded.
    #[error("failed to parse cohort JSON at {path:?}: {source}")]
    ParseCohort {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Constructing the geocoder failed.
    #[error("failed to build geocoder for {base_url:?}: {source}")]
    BuildGeocoder {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// Constructing the spatial source failed.
    #[error("failed to build spatial source for {base_url:?}: {source}")]
    BuildSpatialSource {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// The address could not be resolved.
    #[error("failed to geocode {address:?}: {source}")]
    Resolve {
        address: String,
        #[source]
        source: ResolveError,
    },
    /// Nearby feature acquisition failed.
    #[error("failed to acquire nearby features: {0}")]
    Acquire(#[from] AcquireError),
    /// Serializing the command output failed.
    #[error("failed to serialize output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing the command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
