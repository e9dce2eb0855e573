//! Score command implementation for the Sitescore CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use sitescore_scorer::{
    CohortEvaluation, CohortStatisticsBuilder, DEFAULT_RADIUS_M, VenueType, evaluate_cohort,
};

use crate::input::{load_cohort, require_existing};
use crate::services::{GeocoderSettings, ServiceBuilder, SpatialSettings};
use crate::{
    ARG_COHORT, ARG_COUNTRY_CODES, ARG_LANGUAGE, ARG_NOMINATIM_URL, ARG_OVERPASS_URL, ARG_RADIUS,
    ARG_TIMEOUT_SECS, ARG_VENUE_TYPE, CliError, ENV_SCORE_COHORT, write_json,
};

/// CLI arguments for the `score` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Load a JSON array of location records, geocode members \
                 without coordinates, acquire nearby features, derive the \
                 cohort baselines and score every member for the chosen \
                 venue type. Members whose enrichment fails are scored with \
                 empty feature data and listed in the report.",
    about = "Score a cohort of candidate sites"
)]
#[ortho_config(prefix = "SITESCORE")]
pub(crate) struct ScoreArgs {
    /// Path to a JSON file containing an array of location records.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) cohort: Option<Utf8PathBuf>,
    /// Venue profile: `fast_food`, `premium`, `casual` or `standard`.
    #[arg(long = ARG_VENUE_TYPE, value_name = "type")]
    #[serde(default)]
    pub(crate) venue_type: Option<String>,
    /// Feature search radius in metres.
    #[arg(long = ARG_RADIUS, value_name = "metres")]
    #[serde(default)]
    pub(crate) radius: Option<f64>,
    /// Base URL of the Nominatim service.
    #[arg(long = ARG_NOMINATIM_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) nominatim_url: Option<String>,
    /// Overpass interpreter URL.
    #[arg(long = ARG_OVERPASS_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) overpass_url: Option<String>,
    /// Geocoder response language.
    #[arg(long = ARG_LANGUAGE, value_name = "code")]
    #[serde(default)]
    pub(crate) language: Option<String>,
    /// Comma-separated country codes restricting geocoder matches.
    #[arg(long = ARG_COUNTRY_CODES, value_name = "codes")]
    #[serde(default)]
    pub(crate) country_codes: Option<String>,
    /// Request timeout for both services, in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl ScoreArgs {
    pub(crate) fn into_config(self) -> Result<ScoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ScoreConfig::try_from(merged)
    }
}

/// Resolved `score` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScoreConfig {
    /// Path to the cohort JSON file.
    pub(crate) cohort: Utf8PathBuf,
    /// Venue profile used for the composite.
    pub(crate) venue_type: VenueType,
    /// Feature search radius in metres.
    pub(crate) radius_m: f64,
    pub(crate) geocoder: GeocoderSettings,
    pub(crate) spatial: SpatialSettings,
}

impl ScoreConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.cohort, ARG_COHORT)
    }
}

impl TryFrom<ScoreArgs> for ScoreConfig {
    type Error = CliError;

    fn try_from(args: ScoreArgs) -> Result<Self, Self::Error> {
        let cohort = args.cohort.ok_or(CliError::MissingArgument {
            field: ARG_COHORT,
            env: ENV_SCORE_COHORT,
        })?;
        let venue_type = args
            .venue_type
            .as_deref()
            .map_or(Ok(VenueType::default()), str::parse::<VenueType>)?;
        let radius_m = validate_radius(args.radius.unwrap_or(DEFAULT_RADIUS_M))?;

        Ok(Self {
            cohort,
            venue_type,
            radius_m,
            geocoder: GeocoderSettings::from_options(
                args.nominatim_url,
                args.language,
                args.country_codes.as_deref(),
                args.timeout_secs,
            ),
            spatial: SpatialSettings::from_options(args.overpass_url, args.timeout_secs),
        })
    }
}

/// Accept only positive, finite radii.
pub(crate) fn validate_radius(radius_m: f64) -> Result<f64, CliError> {
    if radius_m.is_finite() && radius_m > 0.0 {
        Ok(radius_m)
    } else {
        Err(CliError::InvalidRadius { radius_m })
    }
}

pub(crate) fn run_score_with(
    args: ScoreArgs,
    services: &dyn ServiceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let evaluation = execute_score(&config, services)?;
    write_json(writer, &evaluation)
}

pub(crate) fn execute_score(
    config: &ScoreConfig,
    services: &dyn ServiceBuilder,
) -> Result<CohortEvaluation, CliError> {
    let mut cohort = load_cohort(&config.cohort)?;
    let builder = CohortStatisticsBuilder::new(
        services.geocoder(&config.geocoder)?,
        services.spatial_source(&config.spatial)?,
    )
    .with_radius(config.radius_m)
    .with_locale(config.geocoder.locale.clone());

    let evaluation = evaluate_cohort(&builder, &mut cohort, config.venue_type.as_str())?;
    info!(
        "scored {} member(s) from {}",
        evaluation.members.len(),
        config.cohort
    );
    Ok(evaluation)
}
