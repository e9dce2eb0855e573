//! Geocode command implementation for the Sitescore CLI.

use std::io::Write;

use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use sitescore_core::{GeocodingResolver, candidate_variants};

use crate::services::{GeocoderSettings, ServiceBuilder};
use crate::{
    ARG_ADDRESS, ARG_COUNTRY_CODES, ARG_LANGUAGE, ARG_NOMINATIM_URL, ARG_TIMEOUT_SECS, CliError,
    ENV_GEOCODE_ADDRESS, write_json,
};

/// CLI arguments for the `geocode` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Normalise a free-text address, try each candidate query \
                 against the geocoder in turn and print the first match.",
    about = "Resolve an address to coordinates"
)]
#[ortho_config(prefix = "SITESCORE")]
pub(crate) struct GeocodeArgs {
    /// Free-text address.
    #[arg(value_name = "address")]
    #[serde(default)]
    pub(crate) address: Option<String>,
    /// Base URL of the Nominatim service.
    #[arg(long = ARG_NOMINATIM_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) nominatim_url: Option<String>,
    /// Geocoder response language.
    #[arg(long = ARG_LANGUAGE, value_name = "code")]
    #[serde(default)]
    pub(crate) language: Option<String>,
    /// Comma-separated country codes restricting matches.
    #[arg(long = ARG_COUNTRY_CODES, value_name = "codes")]
    #[serde(default)]
    pub(crate) country_codes: Option<String>,
    /// Request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl GeocodeArgs {
    pub(crate) fn into_config(self) -> Result<GeocodeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        GeocodeConfig::try_from(merged)
    }
}

/// Resolved `geocode` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GeocodeConfig {
    pub(crate) address: String,
    pub(crate) geocoder: GeocoderSettings,
}

impl TryFrom<GeocodeArgs> for GeocodeConfig {
    type Error = CliError;

    fn try_from(args: GeocodeArgs) -> Result<Self, Self::Error> {
        let address = args
            .address
            .filter(|address| !address.trim().is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_ADDRESS,
                env: ENV_GEOCODE_ADDRESS,
            })?;
        Ok(Self {
            address,
            geocoder: GeocoderSettings::from_options(
                args.nominatim_url,
                args.language,
                args.country_codes.as_deref(),
                args.timeout_secs,
            ),
        })
    }
}

/// Output of the `geocode` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct GeocodeReport {
    pub(crate) address: String,
    /// Queries in the order they are tried.
    pub(crate) variants: Vec<String>,
    pub(crate) lat: f64,
    pub(crate) lon: f64,
}

pub(crate) fn run_geocode_with(
    args: GeocodeArgs,
    services: &dyn ServiceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let report = execute_geocode(&config, services)?;
    write_json(writer, &report)
}

pub(crate) fn execute_geocode(
    config: &GeocodeConfig,
    services: &dyn ServiceBuilder,
) -> Result<GeocodeReport, CliError> {
    let resolver = GeocodingResolver::new(services.geocoder(&config.geocoder)?)
        .with_locale(config.geocoder.locale.clone());
    let coords = resolver
        .resolve_address(&config.address)
        .map_err(|source| CliError::Resolve {
            address: config.address.clone(),
            source,
        })?;
    Ok(GeocodeReport {
        address: config.address.clone(),
        variants: candidate_variants(&config.address),
        lat: coords.y,
        lon: coords.x,
    })
}
