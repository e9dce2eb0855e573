//! HTTP geocoding through a Nominatim search endpoint.
//!
//! [`NominatimGeocoder`] implements [`sitescore_core::Geocoder`] with one
//! `GET {base_url}/search` per lookup, asking for at most one `jsonv2` result
//! in the resolver's language and country context.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use sitescore_core::{GeocodingResolver, LocationRecord};
//! use sitescore_data::geocoding::{NominatimConfig, NominatimGeocoder};
//!
//! let config = NominatimConfig::new("https://nominatim.openstreetmap.org")
//!     .with_timeout(Duration::from_secs(10))
//!     .with_user_agent("my-app/1.0");
//! let resolver = GeocodingResolver::new(NominatimGeocoder::with_config(config)?);
//!
//! let mut record = LocationRecord::new("a").with_address("Москва, ул. Тверская, 7");
//! let coords = resolver.resolve(&mut record, false)?;
//! println!("{}, {}", coords.y, coords.x);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod nominatim;
mod provider;

pub use provider::{DEFAULT_NOMINATIM_URL, DEFAULT_USER_AGENT, NominatimConfig, NominatimGeocoder};
