//! Command-line interface for scoring candidate sites.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use std::io::Write;

mod error;
mod geocode;
mod input;
mod nearby;
mod score;
mod services;

pub use error::CliError;

use geocode::GeocodeArgs;
use nearby::NearbyArgs;
use score::ScoreArgs;
use services::{HttpServices, ServiceBuilder};

pub(crate) const ARG_COHORT: &str = "cohort";
pub(crate) const ARG_ADDRESS: &str = "address";
pub(crate) const ARG_VENUE_TYPE: &str = "venue-type";
pub(crate) const ARG_RADIUS: &str = "radius";
pub(crate) const ARG_LAT: &str = "lat";
pub(crate) const ARG_LON: &str = "lon";
pub(crate) const ARG_NOMINATIM_URL: &str = "nominatim-url";
pub(crate) const ARG_OVERPASS_URL: &str = "overpass-url";
pub(crate) const ARG_LANGUAGE: &str = "language";
pub(crate) const ARG_COUNTRY_CODES: &str = "country-codes";
pub(crate) const ARG_TIMEOUT_SECS: &str = "timeout-secs";
pub(crate) const ENV_SCORE_COHORT: &str = "SITESCORE_CMDS_SCORE_COHORT";
pub(crate) const ENV_GEOCODE_ADDRESS: &str = "SITESCORE_CMDS_GEOCODE_ADDRESS";
pub(crate) const ENV_NEARBY_LAT: &str = "SITESCORE_CMDS_NEARBY_LAT";
pub(crate) const ENV_NEARBY_LON: &str = "SITESCORE_CMDS_NEARBY_LON";

/// Run the Sitescore CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when argument parsing, configuration, a service
/// call or writing the report fails. Member enrichment failures inside a
/// `score` run are reported in its output instead.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    dispatch(cli.command, &HttpServices, &mut stdout)
}

fn dispatch(
    command: Command,
    services: &dyn ServiceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    match command {
        Command::Score(args) => score::run_score_with(args, services, writer),
        Command::Geocode(args) => geocode::run_geocode_with(args, services, writer),
        Command::Nearby(args) => nearby::run_nearby_with(args, services, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "sitescore",
    about = "Score candidate commercial sites against their cohort",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Enrich a cohort of sites and score every member.
    Score(ScoreArgs),
    /// Resolve one free-text address to coordinates.
    Geocode(GeocodeArgs),
    /// Count the classified features around a point.
    Nearby(NearbyArgs),
}

/// Write `value` as pretty-printed JSON followed by a newline.
pub(crate) fn write_json<T: serde::Serialize>(
    writer: &mut dyn Write,
    value: &T,
) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
