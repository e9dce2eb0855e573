//! Facade crate for the Sitescore site evaluation engine.
//!
//! This crate re-exports the core domain types and the cohort scorer, and
//! exposes the HTTP service adapters behind the `http` feature.

#![forbid(unsafe_code)]

pub use sitescore_core::{
    AcquireError, AddressNormalizer, FailureKind, GeocodeLocale, GeocodeQuery, Geocoder,
    GeocoderError, GeocodingResolver, LocationRecord, PoiAcquirer, PoiGroup, PoiGroups,
    PointOfInterest, RawFeature, ResolveError, SpatialSource, SpatialSourceError, Tags,
    candidate_variants, classification_label,
};

pub use sitescore_scorer::{
    CohortBaselines, CohortEvaluation, CohortReport, CohortStatistics, CohortStatisticsBuilder,
    MemberStatus, ScoreError, SiteScores, VenueType, evaluate_cohort, score,
};

#[cfg(feature = "http")]
pub use sitescore_data::{
    ProviderBuildError,
    geocoding::{NominatimConfig, NominatimGeocoder},
    overpass::{OverpassConfig, OverpassSource},
};
