//! `SpatialSource` implementation backed by an Overpass interpreter.

use std::time::Duration;

use geo::Coord;
use log::debug;
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, RETRY_AFTER};
use sitescore_core::{RawFeature, SpatialSource, SpatialSourceError};
use url::Url;

use super::response::InterpreterResponse;
use crate::ProviderBuildError;
use crate::blocking::BlockingClient;

/// Main public Overpass instance.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Default user agent for Overpass requests.
pub const DEFAULT_USER_AGENT: &str = "sitescore-overpass/0.1";

/// Default request timeout in seconds. Also sent as the server-side query
/// timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 25;

/// Configuration for [`OverpassSource`].
#[derive(Debug, Clone)]
pub struct OverpassConfig {
    /// Interpreter endpoint URL.
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OVERPASS_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl OverpassConfig {
    /// Create a new configuration with the given interpreter URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Build an Overpass QL query for every node, way and relation within
/// `radius_m` metres of `center`, with inline way geometry.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use sitescore_data::overpass::build_around_query;
///
/// let query = build_around_query(Coord { x: 37.61, y: 55.75 }, 100.0, 25);
/// assert!(query.starts_with("[out:json][timeout:25];"));
/// assert!(query.contains("node(around:100,55.75,37.61);"));
/// assert!(query.ends_with("out geom;"));
/// ```
#[must_use]
pub fn build_around_query(center: Coord<f64>, radius_m: f64, timeout_secs: u64) -> String {
    let around = format!("(around:{radius_m},{},{})", center.y, center.x);
    format!(
        "[out:json][timeout:{timeout_secs}];(node{around};way{around};relation{around};);out geom;"
    )
}

/// Spatial source issuing one interpreter POST per radius query.
///
/// HTTP 429 responses become [`SpatialSourceError::RateLimited`] with the
/// `Retry-After` delay when the server sends one in seconds. A `runtime
/// error` remark in an otherwise successful response becomes
/// [`SpatialSourceError::Service`].
#[derive(Debug)]
pub struct OverpassSource {
    http: BlockingClient,
    endpoint: Url,
    config: OverpassConfig,
}

impl OverpassSource {
    /// Create a source for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(OverpassConfig::new(base_url))
    }

    /// Create a source with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn with_config(config: OverpassConfig) -> Result<Self, ProviderBuildError> {
        let endpoint =
            Url::parse(&config.base_url).map_err(|source| ProviderBuildError::InvalidUrl {
                url: config.base_url.clone(),
                source,
            })?;
        let http = BlockingClient::new(config.timeout, &config.user_agent)?;
        Ok(Self {
            http,
            endpoint,
            config,
        })
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &OverpassConfig {
        &self.config
    }

    async fn interpret_async(&self, query: String) -> Result<InterpreterResponse, SpatialSourceError> {
        let url_text = self.endpoint.to_string();
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("data", &query)
            .finish();

        let response = self
            .http
            .client()
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url_text))?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(SpatialSourceError::RateLimited {
                url: url_text,
                retry_after_secs: retry_after_secs(response.headers()),
            });
        }

        let response = response
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, &url_text))?;

        response
            .json()
            .await
            .map_err(|err| SpatialSourceError::Parse {
                message: err.to_string(),
            })
    }

    /// Convert a reqwest error to a `SpatialSourceError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> SpatialSourceError {
        if error.is_timeout() {
            return SpatialSourceError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return SpatialSourceError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        if error.is_decode() {
            return SpatialSourceError::Parse {
                message: error.to_string(),
            };
        }

        SpatialSourceError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }

    /// Reject failed queries and flatten the element list.
    fn convert_response(response: InterpreterResponse) -> Result<Vec<RawFeature>, SpatialSourceError> {
        if let Some(message) = response.runtime_error() {
            return Err(SpatialSourceError::Service {
                message: message.to_owned(),
            });
        }
        Ok(response.into_features())
    }
}

impl SpatialSource for OverpassSource {
    fn features_within(
        &self,
        center: Coord<f64>,
        radius_m: f64,
    ) -> Result<Vec<RawFeature>, SpatialSourceError> {
        let query = build_around_query(center, radius_m, self.config.timeout.as_secs());
        debug!("overpass query {query}");
        let response = self.http.block_on(self.interpret_async(query))?;
        let features = Self::convert_response(response)?;
        debug!("overpass returned {} elements", features.len());
        Ok(features)
    }
}

/// Parse a delay-seconds `Retry-After` value. HTTP-date values are ignored.
fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use rstest::rstest;

    #[rstest]
    fn query_covers_all_element_types() {
        let query = build_around_query(Coord { x: 30.31, y: 59.93 }, 250.5, 10);

        assert_eq!(
            query,
            "[out:json][timeout:10];(\
             node(around:250.5,59.93,30.31);\
             way(around:250.5,59.93,30.31);\
             relation(around:250.5,59.93,30.31);\
             );out geom;"
        );
    }

    #[rstest]
    #[case(Some("120"), Some(120))]
    #[case(Some(" 5 "), Some(5))]
    #[case(Some("Wed, 21 Oct 2015 07:28:00 GMT"), None)]
    #[case(None, None)]
    fn retry_after_parsing(#[case] header: Option<&'static str>, #[case] expected: Option<u64>) {
        let mut headers = HeaderMap::new();
        if let Some(value) = header {
            headers.insert(RETRY_AFTER, HeaderValue::from_static(value));
        }

        assert_eq!(retry_after_secs(&headers), expected);
    }

    #[rstest]
    fn runtime_error_remark_becomes_service_error() {
        let response = InterpreterResponse {
            elements: Vec::new(),
            remark: Some("runtime error: out of memory".to_string()),
        };

        let err = OverpassSource::convert_response(response).expect_err("should fail");

        assert_eq!(
            err,
            SpatialSourceError::Service {
                message: "runtime error: out of memory".to_string(),
            }
        );
    }

    #[rstest]
    fn invalid_url_is_rejected() {
        let err = OverpassSource::new("::not a url").expect_err("should fail");
        assert!(matches!(err, ProviderBuildError::InvalidUrl { .. }));
    }

    #[rstest]
    fn config_defaults() {
        let config = OverpassConfig::default();

        assert_eq!(config.base_url, DEFAULT_OVERPASS_URL);
        assert_eq!(config.timeout, Duration::from_secs(25));
    }
}
