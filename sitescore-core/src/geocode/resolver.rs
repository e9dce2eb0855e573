//! Multi-variant address resolution.

use geo::Coord;
use log::{debug, warn};

use crate::{AddressNormalizer, LocationRecord};

use super::{GeocodeLocale, GeocodeQuery, Geocoder, ResolveError};

/// Resolve location records to coordinates through a [`Geocoder`].
///
/// The resolver owns its geocoder client, the locale sent with every lookup
/// and a memoising [`AddressNormalizer`]. It never retries: a lookup that
/// reports unavailability aborts the remaining variants.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use sitescore_core::{GeocodeQuery, Geocoder, GeocoderError, GeocodingResolver, LocationRecord};
///
/// struct Tverskaya;
///
/// impl Geocoder for Tverskaya {
///     fn geocode(&self, query: &GeocodeQuery<'_>) -> Result<Option<Coord<f64>>, GeocoderError> {
///         Ok((query.text == "Москва, улица Тверская, 7").then_some(Coord { x: 37.61, y: 55.76 }))
///     }
/// }
///
/// let tverskaya = Coord { x: 37.61, y: 55.76 };
/// let resolver = GeocodingResolver::new(Tverskaya);
///
/// let mut record = LocationRecord::new("a").with_address("Москва, ул. Тверская, 7");
/// assert_eq!(resolver.resolve(&mut record, false)?, tverskaya);
/// assert_eq!(record.coords, Some(tverskaya));
/// # Ok::<(), sitescore_core::ResolveError>(())
/// ```
#[derive(Debug)]
pub struct GeocodingResolver<G> {
    geocoder: G,
    locale: GeocodeLocale,
    normalizer: AddressNormalizer,
}

impl<G: Geocoder> GeocodingResolver<G> {
    /// Create a resolver using the default locale.
    #[must_use]
    pub fn new(geocoder: G) -> Self {
        Self {
            geocoder,
            locale: GeocodeLocale::default(),
            normalizer: AddressNormalizer::new(),
        }
    }

    /// Replace the locale sent with every lookup.
    #[must_use]
    pub fn with_locale(mut self, locale: GeocodeLocale) -> Self {
        self.locale = locale;
        self
    }

    /// Borrow the underlying geocoder.
    pub const fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Borrow the locale context.
    pub const fn locale(&self) -> &GeocodeLocale {
        &self.locale
    }

    /// Resolve `record` and store the coordinates on it.
    ///
    /// Existing coordinates are returned untouched unless `force` is set.
    ///
    /// # Errors
    ///
    /// See [`GeocodingResolver::resolve_address`]. On error the record is
    /// left unchanged.
    pub fn resolve(
        &self,
        record: &mut LocationRecord,
        force: bool,
    ) -> Result<Coord<f64>, ResolveError> {
        if let Some(coords) = record.coords.filter(|_| !force) {
            debug!("location {} already resolved; skipping lookup", record.id);
            return Ok(coords);
        }

        let address = record.address.as_deref().unwrap_or_default();
        let coords = self.resolve_address(address).inspect_err(|err| {
            warn!("failed to resolve location {}: {err}", record.id);
        })?;
        record.coords = Some(coords);
        Ok(coords)
    }

    /// Resolve a raw address without touching any record.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::MissingAddress`] when `address` is blank.
    /// - [`ResolveError::ServiceUnavailable`] when a lookup fails.
    /// - [`ResolveError::NoMatch`] when every variant comes back empty.
    pub fn resolve_address(&self, address: &str) -> Result<Coord<f64>, ResolveError> {
        if address.trim().is_empty() {
            return Err(ResolveError::MissingAddress);
        }

        let variants = self.normalizer.variants(address);
        for variant in &variants {
            debug!("geocoding candidate {variant:?}");
            let query = GeocodeQuery {
                text: variant,
                locale: &self.locale,
            };
            match self.geocoder.geocode(&query) {
                Ok(Some(coords)) => {
                    debug!("candidate {variant:?} matched ({}, {})", coords.y, coords.x);
                    return Ok(coords);
                }
                Ok(None) => {}
                Err(source) => {
                    return Err(ResolveError::ServiceUnavailable {
                        query: variant.clone(),
                        source,
                    });
                }
            }
        }

        Err(ResolveError::NoMatch {
            address: address.to_owned(),
            attempts: variants.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubGeocoder;
    use crate::{FailureKind, GeocoderError};
    use rstest::{fixture, rstest};

    const MOSCOW: Coord<f64> = Coord { x: 37.62, y: 55.75 };

    #[fixture]
    fn record() -> LocationRecord {
        LocationRecord::new("flat-1").with_address("Москва, ул. Тверская, д. 7, кв. 12")
    }

    fn unavailable() -> GeocoderError {
        GeocoderError::Network {
            url: "http://geocoder.test/search".into(),
            message: "connection refused".into(),
        }
    }

    #[rstest]
    fn existing_coordinates_skip_lookup(record: LocationRecord) {
        let geocoder = StubGeocoder::new();
        let resolver = GeocodingResolver::new(&geocoder);
        let mut record = record.with_coords(MOSCOW);

        assert_eq!(resolver.resolve(&mut record, false), Ok(MOSCOW));
        assert_eq!(geocoder.call_count(), 0);
    }

    #[rstest]
    fn force_repeats_lookup(record: LocationRecord) {
        let moved = Coord { x: 30.3, y: 59.9 };
        let geocoder = StubGeocoder::new().with_match("Москва, улица Тверская, д. 7, кв. 12", moved);
        let resolver = GeocodingResolver::new(&geocoder);
        let mut record = record.with_coords(MOSCOW);

        assert_eq!(resolver.resolve(&mut record, true), Ok(moved));
        assert_eq!(record.coords, Some(moved));
        assert_eq!(geocoder.call_count(), 1);
    }

    #[rstest]
    fn later_variant_can_match(record: LocationRecord) {
        let geocoder = StubGeocoder::new().with_match("Москва, улица Тверская", MOSCOW);
        let resolver = GeocodingResolver::new(&geocoder);
        let mut record = record;

        assert_eq!(resolver.resolve(&mut record, false), Ok(MOSCOW));
        assert_eq!(
            geocoder.queries(),
            [
                "Москва, улица Тверская, д. 7, кв. 12",
                "Москва, улица Тверская, д. 7",
                "Москва, улица Тверская",
            ]
        );
    }

    #[rstest]
    fn unavailability_aborts_iteration(record: LocationRecord) {
        let geocoder = StubGeocoder::new()
            .with_unavailable("Москва, улица Тверская, д. 7", unavailable())
            .with_match("Москва, улица Тверская", MOSCOW);
        let resolver = GeocodingResolver::new(&geocoder);
        let mut record = record;

        let err = resolver
            .resolve(&mut record, false)
            .expect_err("service failure should abort");
        assert_eq!(err.kind(), FailureKind::ServiceUnavailable);
        assert_eq!(geocoder.call_count(), 2);
        assert!(record.coords.is_none());
    }

    #[rstest]
    fn exhausted_variants_report_no_match(record: LocationRecord) {
        let geocoder = StubGeocoder::new();
        let resolver = GeocodingResolver::new(&geocoder);
        let mut record = record;

        let err = resolver.resolve(&mut record, false).expect_err("nothing matches");
        assert_eq!(
            err,
            ResolveError::NoMatch {
                address: "Москва, ул. Тверская, д. 7, кв. 12".into(),
                attempts: 4,
            }
        );
        assert_eq!(err.kind(), FailureKind::NoMatch);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    fn blank_address_is_invalid_input(#[case] address: Option<&str>) {
        let geocoder = StubGeocoder::new();
        let resolver = GeocodingResolver::new(&geocoder);
        let mut record = LocationRecord::new("x");
        record.address = address.map(str::to_owned);

        let err = resolver.resolve(&mut record, false).expect_err("blank address");
        assert_eq!(err.kind(), FailureKind::InvalidInput);
        assert_eq!(geocoder.call_count(), 0);
    }

    #[rstest]
    fn locale_is_forwarded() {
        let geocoder = StubGeocoder::new().with_match("Minsk", MOSCOW);
        let resolver =
            GeocodingResolver::new(&geocoder).with_locale(GeocodeLocale::new("be", ["by"]));

        assert_eq!(resolver.resolve_address("Minsk"), Ok(MOSCOW));
        assert_eq!(geocoder.locales(), [GeocodeLocale::new("be", ["by"])]);
    }
}
