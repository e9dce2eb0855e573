use thiserror::Error;

/// Error type for HTTP adapter construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// The configured base URL could not be parsed.
    #[error("invalid service URL {url:?}")]
    InvalidUrl {
        /// Rejected URL.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime")]
    Runtime(#[source] std::io::Error),
}
