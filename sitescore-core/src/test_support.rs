//! Deterministic in-memory service doubles used by unit and behaviour tests.
//!
//! Compiled for this crate's own tests and for dependents enabling the
//! `test-support` feature.

use std::cell::RefCell;
use std::collections::HashMap;

use geo::Coord;

use crate::{
    GeocodeLocale, GeocodeQuery, Geocoder, GeocoderError, RawFeature, SpatialSource,
    SpatialSourceError,
};

#[derive(Debug, Clone)]
enum GeocodeAnswer {
    Match(Coord<f64>),
    Unavailable(GeocoderError),
}

/// Scripted [`Geocoder`].
///
/// Queries without a scripted answer report no match, unless the stub was
/// built with [`StubGeocoder::failing`]. Every query is recorded.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use sitescore_core::{GeocodeLocale, GeocodeQuery, Geocoder};
/// use sitescore_core::test_support::StubGeocoder;
///
/// let geocoder = StubGeocoder::new().with_match("Казань", Coord { x: 49.1, y: 55.8 });
/// let locale = GeocodeLocale::default();
///
/// let miss = geocoder.geocode(&GeocodeQuery { text: "Уфа", locale: &locale });
/// assert_eq!(miss, Ok(None));
/// assert_eq!(geocoder.queries(), ["Уфа"]);
/// ```
#[derive(Debug, Default)]
pub struct StubGeocoder {
    answers: HashMap<String, GeocodeAnswer>,
    fallback: Option<GeocoderError>,
    calls: RefCell<Vec<(String, GeocodeLocale)>>,
}

impl StubGeocoder {
    /// Create a geocoder that matches nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a geocoder for which every lookup fails with `error`.
    #[must_use]
    pub fn failing(error: GeocoderError) -> Self {
        Self {
            fallback: Some(error),
            ..Self::default()
        }
    }

    /// Answer `query` with `coords`.
    #[must_use]
    pub fn with_match(mut self, query: impl Into<String>, coords: Coord<f64>) -> Self {
        self.answers.insert(query.into(), GeocodeAnswer::Match(coords));
        self
    }

    /// Fail `query` with `error`.
    #[must_use]
    pub fn with_unavailable(mut self, query: impl Into<String>, error: GeocoderError) -> Self {
        self.answers
            .insert(query.into(), GeocodeAnswer::Unavailable(error));
        self
    }

    /// Query texts received so far, in order.
    pub fn queries(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(text, _)| text.clone()).collect()
    }

    /// Locales received so far, in order.
    pub fn locales(&self) -> Vec<GeocodeLocale> {
        self.calls
            .borrow()
            .iter()
            .map(|(_, locale)| locale.clone())
            .collect()
    }

    /// Number of lookups performed.
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl Geocoder for StubGeocoder {
    fn geocode(&self, query: &GeocodeQuery<'_>) -> Result<Option<Coord<f64>>, GeocoderError> {
        self.calls
            .borrow_mut()
            .push((query.text.to_owned(), query.locale.clone()));
        match self.answers.get(query.text) {
            Some(GeocodeAnswer::Match(coords)) => Ok(Some(*coords)),
            Some(GeocodeAnswer::Unavailable(error)) => Err(error.clone()),
            None => self.fallback.clone().map_or(Ok(None), Err),
        }
    }
}

/// Scripted [`SpatialSource`].
///
/// Answers may be pinned to an exact centre with
/// [`StubSpatialSource::with_features_at`] or
/// [`StubSpatialSource::with_error_at`]; other centres receive the default
/// answer. Every request is recorded.
#[derive(Debug)]
pub struct StubSpatialSource {
    default: Result<Vec<RawFeature>, SpatialSourceError>,
    pinned: Vec<(Coord<f64>, Result<Vec<RawFeature>, SpatialSourceError>)>,
    requests: RefCell<Vec<(Coord<f64>, f64)>>,
}

impl StubSpatialSource {
    /// Return `features` for every query.
    #[must_use]
    pub fn with_features(features: Vec<RawFeature>) -> Self {
        Self {
            default: Ok(features),
            pinned: Vec::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Fail every query that has no pinned answer with `error`.
    #[must_use]
    pub fn with_error(error: SpatialSourceError) -> Self {
        Self {
            default: Err(error),
            pinned: Vec::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Return `features` for queries centred exactly on `center`.
    #[must_use]
    pub fn with_features_at(mut self, center: Coord<f64>, features: Vec<RawFeature>) -> Self {
        self.pinned.push((center, Ok(features)));
        self
    }

    /// Fail queries centred exactly on `center` with `error`.
    #[must_use]
    pub fn with_error_at(mut self, center: Coord<f64>, error: SpatialSourceError) -> Self {
        self.pinned.push((center, Err(error)));
        self
    }

    /// Centres and radii received so far, in order.
    pub fn requests(&self) -> Vec<(Coord<f64>, f64)> {
        self.requests.borrow().clone()
    }

    /// Number of queries performed.
    pub fn call_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl SpatialSource for StubSpatialSource {
    fn features_within(
        &self,
        center: Coord<f64>,
        radius_m: f64,
    ) -> Result<Vec<RawFeature>, SpatialSourceError> {
        self.requests.borrow_mut().push((center, radius_m));
        self.pinned
            .iter()
            .find(|(pinned, _)| *pinned == center)
            .map_or_else(|| self.default.clone(), |(_, answer)| answer.clone())
    }
}
