//! Core domain types for the Sitescore engine.
//!
//! The crate models candidate sites ([`LocationRecord`]), the points of
//! interest discovered around them ([`PointOfInterest`]) and the first two
//! enrichment stages:
//!
//! - [`GeocodingResolver`] turns a free-text address into coordinates by
//!   walking the candidate variants produced by [`AddressNormalizer`].
//! - [`PoiAcquirer`] queries a [`SpatialSource`] around a resolved point and
//!   groups the tagged features by [`classification_label`].
//!
//! External services sit behind the [`Geocoder`] and [`SpatialSource`]
//! traits. HTTP implementations live in `sitescore-data`; deterministic
//! doubles live in `test_support` behind the `test-support` feature.

#![forbid(unsafe_code)]

pub mod address;
pub mod classify;
mod failure;
pub mod geocode;
pub mod location;
pub mod poi;
pub mod spatial;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use address::{AddressNormalizer, candidate_variants};
pub use classify::{CLASSIFICATION_KEYS, OTHER_LABEL, PoiGroup, PoiGroups, classification_label};
pub use failure::FailureKind;
pub use geocode::{
    GeocodeLocale, GeocodeQuery, Geocoder, GeocoderError, GeocodingResolver, ResolveError,
};
pub use location::{Attributes, LocationRecord};
pub use poi::{PoiGeometry, PoiKind, PointOfInterest, Tags};
pub use spatial::{AcquireError, PoiAcquirer, RawFeature, SpatialSource, SpatialSourceError};
