//! Construction of the external services a command talks to.

use std::time::Duration;

use sitescore_core::{GeocodeLocale, Geocoder, SpatialSource};
use sitescore_data::geocoding::{DEFAULT_NOMINATIM_URL, NominatimConfig, NominatimGeocoder};
use sitescore_data::overpass::{DEFAULT_OVERPASS_URL, OverpassConfig, OverpassSource};

use crate::CliError;

/// Resolved geocoding endpoint and locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GeocoderSettings {
    pub(crate) base_url: String,
    pub(crate) timeout: Option<Duration>,
    pub(crate) locale: GeocodeLocale,
}

impl GeocoderSettings {
    /// Fill unset options with the Nominatim and locale defaults.
    ///
    /// `country_codes` is a comma-separated list; an empty string disables
    /// the country filter.
    pub(crate) fn from_options(
        base_url: Option<String>,
        language: Option<String>,
        country_codes: Option<&str>,
        timeout_secs: Option<u64>,
    ) -> Self {
        let default_locale = GeocodeLocale::default();
        let codes = country_codes.map_or(default_locale.country_codes, |raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|code| !code.is_empty())
                .map(str::to_lowercase)
                .collect()
        });
        Self {
            base_url: base_url.unwrap_or_else(|| DEFAULT_NOMINATIM_URL.to_owned()),
            timeout: timeout_secs.map(Duration::from_secs),
            locale: GeocodeLocale::new(language.unwrap_or(default_locale.language), codes),
        }
    }
}

/// Resolved spatial feature endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SpatialSettings {
    pub(crate) base_url: String,
    pub(crate) timeout: Option<Duration>,
}

impl SpatialSettings {
    /// Fill unset options with the Overpass defaults.
    pub(crate) fn from_options(base_url: Option<String>, timeout_secs: Option<u64>) -> Self {
        Self {
            base_url: base_url.unwrap_or_else(|| DEFAULT_OVERPASS_URL.to_owned()),
            timeout: timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Builds service clients for the current invocation.
pub(crate) trait ServiceBuilder {
    fn geocoder(&self, settings: &GeocoderSettings) -> Result<Box<dyn Geocoder>, CliError>;

    fn spatial_source(
        &self,
        settings: &SpatialSettings,
    ) -> Result<Box<dyn SpatialSource>, CliError>;
}

/// Nominatim and Overpass over HTTP.
pub(crate) struct HttpServices;

impl ServiceBuilder for HttpServices {
    fn geocoder(&self, settings: &GeocoderSettings) -> Result<Box<dyn Geocoder>, CliError> {
        let mut config = NominatimConfig::new(settings.base_url.clone());
        if let Some(timeout) = settings.timeout {
            config = config.with_timeout(timeout);
        }
        let geocoder =
            NominatimGeocoder::with_config(config).map_err(|source| CliError::BuildGeocoder {
                base_url: settings.base_url.clone(),
                source,
            })?;
        Ok(Box::new(geocoder))
    }

    fn spatial_source(
        &self,
        settings: &SpatialSettings,
    ) -> Result<Box<dyn SpatialSource>, CliError> {
        let mut config = OverpassConfig::new(settings.base_url.clone());
        if let Some(timeout) = settings.timeout {
            config = config.with_timeout(timeout);
        }
        let source =
            OverpassSource::with_config(config).map_err(|source| CliError::BuildSpatialSource {
                base_url: settings.base_url.clone(),
                source,
            })?;
        Ok(Box::new(source))
    }
}
