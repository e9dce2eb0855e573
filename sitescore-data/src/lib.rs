//! HTTP adapters for the Sitescore enrichment services.
//!
//! Responsibilities:
//! - Implement [`sitescore_core::Geocoder`] against a Nominatim search
//!   endpoint ([`geocoding::NominatimGeocoder`]).
//! - Implement [`sitescore_core::SpatialSource`] against an Overpass
//!   interpreter endpoint ([`overpass::OverpassSource`]).
//! - Translate transport, status and payload failures into the core error
//!   types.
//!
//! Boundaries:
//! - Do not encode domain rules (live in `sitescore-core`).
//! - Keep the core traits synchronous; block on an owned runtime here.
//!
//! Invariants:
//! - Each adapter issues exactly one HTTP request per trait call.
//! - No global mutable state.

mod blocking;
mod error;
pub mod geocoding;
pub mod overpass;

pub use error::ProviderBuildError;
