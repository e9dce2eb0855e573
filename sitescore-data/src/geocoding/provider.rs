//! `Geocoder` implementation backed by Nominatim.

use std::time::Duration;

use geo::Coord;
use log::debug;
use sitescore_core::{GeocodeQuery, Geocoder, GeocoderError};
use url::Url;

use super::nominatim::SearchResult;
use crate::ProviderBuildError;
use crate::blocking::BlockingClient;

/// Public Nominatim instance.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// Default user agent for geocoding requests.
pub const DEFAULT_USER_AGENT: &str = "sitescore-geocoder/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for [`NominatimGeocoder`].
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    /// Base URL of the Nominatim service; `/search` is appended.
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests. Public instances require one that
    /// identifies the application.
    pub user_agent: String,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_NOMINATIM_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl NominatimConfig {
    /// Create a new configuration with the given base URL.
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

/// Geocoder issuing one Nominatim search per lookup.
///
/// The synchronous [`Geocoder`] trait is implemented by blocking on the
/// asynchronous request; see the crate documentation for runtime
/// requirements.
#[derive(Debug)]
pub struct NominatimGeocoder {
    http: BlockingClient,
    search_url: Url,
    config: NominatimConfig,
}

impl NominatimGeocoder {
    /// Create a geocoder for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(NominatimConfig::new(base_url))
    }

    /// Create a geocoder with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn with_config(config: NominatimConfig) -> Result<Self, ProviderBuildError> {
        let endpoint = format!("{}/search", config.base_url.trim_end_matches('/'));
        let search_url = Url::parse(&endpoint).map_err(|source| ProviderBuildError::InvalidUrl {
            url: config.base_url.clone(),
            source,
        })?;
        let http = BlockingClient::new(config.timeout, &config.user_agent)?;
        Ok(Self {
            http,
            search_url,
            config,
        })
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &NominatimConfig {
        &self.config
    }

    /// Build the search URL for `query`.
    fn build_search_url(&self, query: &GeocodeQuery<'_>) -> Url {
        let mut url = self.search_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("q", query.text)
                .append_pair("format", "jsonv2")
                .append_pair("limit", "1")
                .append_pair("accept-language", &query.locale.language);
            let country_codes = query.locale.country_codes_param();
            if !country_codes.is_empty() {
                pairs.append_pair("countrycodes", &country_codes);
            }
        }
        url
    }

    async fn search_async(&self, url: Url) -> Result<Vec<SearchResult>, GeocoderError> {
        let url_text = url.to_string();
        let response = self
            .http
            .client()
            .get(url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url_text))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, &url_text))?;

        response
            .json()
            .await
            .map_err(|err| GeocoderError::Parse {
                message: err.to_string(),
            })
    }

    /// Convert a reqwest error to a `GeocoderError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> GeocoderError {
        if error.is_timeout() {
            return GeocoderError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return GeocoderError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        if error.is_decode() {
            return GeocoderError::Parse {
                message: error.to_string(),
            };
        }

        GeocoderError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }

    /// Take the first hit, if any.
    fn convert_results(results: Vec<SearchResult>) -> Result<Option<Coord<f64>>, GeocoderError> {
        let Some(hit) = results.into_iter().next() else {
            return Ok(None);
        };
        if let Some(name) = &hit.display_name {
            debug!("nominatim matched {name:?}");
        }
        hit.coord()
            .map(Some)
            .map_err(|message| GeocoderError::Parse { message })
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, query: &GeocodeQuery<'_>) -> Result<Option<Coord<f64>>, GeocoderError> {
        let url = self.build_search_url(query);
        debug!("nominatim search {url}");
        let results = self.http.block_on(self.search_async(url))?;
        Self::convert_results(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use sitescore_core::GeocodeLocale;

    #[fixture]
    fn geocoder() -> NominatimGeocoder {
        NominatimGeocoder::new("http://nominatim.example.com/").expect("geocoder should build")
    }

    #[rstest]
    fn search_url_carries_locale_and_limits(geocoder: NominatimGeocoder) {
        let locale = GeocodeLocale::default();
        let url = geocoder.build_search_url(&GeocodeQuery {
            text: "Москва, улица Ленина, 5",
            locale: &locale,
        });

        assert_eq!(url.path(), "/search");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            [
                ("q".to_string(), "Москва, улица Ленина, 5".to_string()),
                ("format".to_string(), "jsonv2".to_string()),
                ("limit".to_string(), "1".to_string()),
                ("accept-language".to_string(), "ru".to_string()),
                ("countrycodes".to_string(), "ru".to_string()),
            ]
        );
    }

    #[rstest]
    fn empty_country_list_is_omitted(geocoder: NominatimGeocoder) {
        let locale = GeocodeLocale::new("en", Vec::<String>::new());
        let url = geocoder.build_search_url(&GeocodeQuery {
            text: "Paris",
            locale: &locale,
        });

        assert!(url.query_pairs().all(|(key, _)| key != "countrycodes"));
    }

    #[rstest]
    fn first_hit_wins() {
        let results = vec![
            SearchResult {
                lat: "59.93".to_string(),
                lon: "30.31".to_string(),
                display_name: None,
            },
            SearchResult {
                lat: "0".to_string(),
                lon: "0".to_string(),
                display_name: None,
            },
        ];

        let coord = NominatimGeocoder::convert_results(results).expect("should parse");

        assert_eq!(coord, Some(Coord { x: 30.31, y: 59.93 }));
    }

    #[rstest]
    fn no_hits_is_no_match() {
        assert_eq!(NominatimGeocoder::convert_results(Vec::new()), Ok(None));
    }

    #[rstest]
    fn malformed_coordinates_are_unavailability() {
        let results = vec![SearchResult {
            lat: String::new(),
            lon: "30.31".to_string(),
            display_name: None,
        }];

        let err = NominatimGeocoder::convert_results(results).expect_err("should fail");

        assert!(matches!(err, GeocoderError::Parse { .. }));
    }

    #[rstest]
    fn invalid_base_url_is_rejected() {
        let err = NominatimGeocoder::new("not a url").expect_err("should fail");
        assert!(matches!(err, ProviderBuildError::InvalidUrl { .. }));
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = NominatimConfig::new("http://example.com")
            .with_timeout(Duration::from_secs(3))
            .with_user_agent("test-agent/1.0");

        assert_eq!(config.base_url, "http://example.com");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.user_agent, "test-agent/1.0");
    }
}
