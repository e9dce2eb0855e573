//! Overpass API spatial source.
//!
//! [`OverpassSource`] implements [`sitescore_core::SpatialSource`] by posting
//! an `around` query to an Overpass interpreter and mapping the returned
//! nodes, ways and relations onto [`sitescore_core::RawFeature`].
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use geo::Coord;
//! use sitescore_core::SpatialSource;
//! use sitescore_data::overpass::{OverpassConfig, OverpassSource};
//!
//! let config = OverpassConfig::new("https://overpass.kumi.systems/api/interpreter")
//!     .with_timeout(Duration::from_secs(60));
//! let source = OverpassSource::with_config(config)?;
//! let features = source.features_within(Coord { x: 37.61, y: 55.75 }, 100.0)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod provider;
mod response;

pub use provider::{
    DEFAULT_OVERPASS_URL, DEFAULT_USER_AGENT, OverpassConfig, OverpassSource, build_around_query,
};
