//! Nearby command implementation for the Sitescore CLI.

use std::io::Write;

use clap::Parser;
use geo::Coord;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use sitescore_core::{PoiAcquirer, PoiGroups};
use sitescore_scorer::DEFAULT_RADIUS_M;

use crate::score::validate_radius;
use crate::services::{ServiceBuilder, SpatialSettings};
use crate::{
    ARG_LAT, ARG_LON, ARG_OVERPASS_URL, ARG_RADIUS, ARG_TIMEOUT_SECS, CliError, ENV_NEARBY_LAT,
    ENV_NEARBY_LON, write_json,
};

/// CLI arguments for the `nearby` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Query the spatial service around a point and print how \
                 many tagged features fall under each classification label.",
    about = "Count classified features around a point"
)]
#[ortho_config(prefix = "SITESCORE")]
pub(crate) struct NearbyArgs {
    /// Latitude in decimal degrees.
    #[arg(long = ARG_LAT, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude in decimal degrees.
    #[arg(long = ARG_LON, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lon: Option<f64>,
    /// Search radius in metres.
    #[arg(long = ARG_RADIUS, value_name = "metres")]
    #[serde(default)]
    pub(crate) radius: Option<f64>,
    /// Overpass interpreter URL.
    #[arg(long = ARG_OVERPASS_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) overpass_url: Option<String>,
    /// Request timeout in seconds.
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl NearbyArgs {
    pub(crate) fn into_config(self) -> Result<NearbyConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        NearbyConfig::try_from(merged)
    }
}

/// Resolved `nearby` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NearbyConfig {
    /// Search centre, `x = longitude`.
    pub(crate) center: Coord<f64>,
    pub(crate) radius_m: f64,
    pub(crate) spatial: SpatialSettings,
}

impl TryFrom<NearbyArgs> for NearbyConfig {
    type Error = CliError;

    fn try_from(args: NearbyArgs) -> Result<Self, Self::Error> {
        let lat = args.lat.ok_or(CliError::MissingArgument {
            field: ARG_LAT,
            env: ENV_NEARBY_LAT,
        })?;
        let lon = args.lon.ok_or(CliError::MissingArgument {
            field: ARG_LON,
            env: ENV_NEARBY_LON,
        })?;
        Ok(Self {
            center: Coord {
                x: validate_degrees(lon, ARG_LON, 180.0)?,
                y: validate_degrees(lat, ARG_LAT, 90.0)?,
            },
            radius_m: validate_radius(args.radius.unwrap_or(DEFAULT_RADIUS_M))?,
            spatial: SpatialSettings::from_options(args.overpass_url, args.timeout_secs),
        })
    }
}

fn validate_degrees(value: f64, field: &'static str, limit: f64) -> Result<f64, CliError> {
    if value.is_finite() && value.abs() <= limit {
        Ok(value)
    } else {
        Err(CliError::InvalidCoordinate {
            field,
            value,
            limit,
        })
    }
}

/// Feature count for one classification label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct LabelCount {
    pub(crate) label: String,
    pub(crate) count: usize,
}

/// Output of the `nearby` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct NearbyReport {
    pub(crate) lat: f64,
    pub(crate) lon: f64,
    pub(crate) radius_m: f64,
    pub(crate) poi_count: usize,
    /// Labels in first-seen order.
    pub(crate) groups: Vec<LabelCount>,
}

pub(crate) fn run_nearby_with(
    args: NearbyArgs,
    services: &dyn ServiceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let report = execute_nearby(&config, services)?;
    write_json(writer, &report)
}

pub(crate) fn execute_nearby(
    config: &NearbyConfig,
    services: &dyn ServiceBuilder,
) -> Result<NearbyReport, CliError> {
    let acquirer = PoiAcquirer::new(services.spatial_source(&config.spatial)?);
    let pois = acquirer.fetch_nearby(Some(config.center), config.radius_m)?;
    let groups = PoiGroups::from_pois(pois);
    Ok(NearbyReport {
        lat: config.center.y,
        lon: config.center.x,
        radius_m: config.radius_m,
        poi_count: groups.poi_count(),
        groups: groups
            .iter()
            .map(|group| LabelCount {
                label: group.label.clone(),
                count: group.pois.len(),
            })
            .collect(),
    })
}
