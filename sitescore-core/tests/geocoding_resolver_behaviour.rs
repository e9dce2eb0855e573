//! Behavioural coverage for multi-variant geocoding.

use std::cell::RefCell;

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use sitescore_core::test_support::StubGeocoder;
use sitescore_core::{FailureKind, GeocoderError, GeocodingResolver, LocationRecord, ResolveError};

const STREET: Coord<f64> = Coord { x: 37.61, y: 55.76 };

#[fixture]
fn geocoder() -> RefCell<StubGeocoder> {
    RefCell::new(StubGeocoder::new())
}

#[fixture]
fn record() -> RefCell<LocationRecord> {
    RefCell::new(LocationRecord::new("listing"))
}

#[fixture]
fn outcome() -> RefCell<Option<Result<Coord<f64>, ResolveError>>> {
    RefCell::new(None)
}

#[given("a geocoder that only knows the street")]
fn street_geocoder(geocoder: &RefCell<StubGeocoder>) {
    *geocoder.borrow_mut() = StubGeocoder::new().with_match("Москва, улица Тверская", STREET);
}

#[given("a geocoder that is unavailable")]
fn unavailable_geocoder(geocoder: &RefCell<StubGeocoder>) {
    *geocoder.borrow_mut() = StubGeocoder::failing(GeocoderError::Timeout {
        url: "http://geocoder.test/search".into(),
        timeout_secs: 10,
    });
}

#[given("a record with a four-part Moscow address")]
fn four_part_record(record: &RefCell<LocationRecord>) {
    record.borrow_mut().address = Some("Москва, ул. Тверская, д. 7, кв. 12".into());
}

#[given("a record without an address")]
fn record_without_address(record: &RefCell<LocationRecord>) {
    record.borrow_mut().address = None;
}

#[when("I resolve the record")]
fn resolve_record(
    geocoder: &RefCell<StubGeocoder>,
    record: &RefCell<LocationRecord>,
    outcome: &RefCell<Option<Result<Coord<f64>, ResolveError>>>,
) {
    let geocoder = geocoder.borrow();
    let resolver = GeocodingResolver::new(&*geocoder);
    let result = resolver.resolve(&mut record.borrow_mut(), false);
    *outcome.borrow_mut() = Some(result);
}

#[then("the record carries the street coordinates")]
fn record_has_street(
    record: &RefCell<LocationRecord>,
    outcome: &RefCell<Option<Result<Coord<f64>, ResolveError>>>,
) {
    assert_eq!(*outcome.borrow(), Some(Ok(STREET)));
    assert_eq!(record.borrow().coords, Some(STREET));
}

#[then("resolution fails as service unavailable")]
fn fails_unavailable(outcome: &RefCell<Option<Result<Coord<f64>, ResolveError>>>) {
    assert_failure(outcome, FailureKind::ServiceUnavailable);
}

#[then("resolution fails as invalid input")]
fn fails_invalid(outcome: &RefCell<Option<Result<Coord<f64>, ResolveError>>>) {
    assert_failure(outcome, FailureKind::InvalidInput);
}

#[then("three lookups were made")]
fn three_lookups(geocoder: &RefCell<StubGeocoder>) {
    assert_eq!(geocoder.borrow().call_count(), 3);
}

#[then("one lookup was made")]
fn one_lookup(geocoder: &RefCell<StubGeocoder>) {
    assert_eq!(geocoder.borrow().call_count(), 1);
}

#[then("no lookup was made")]
fn no_lookup(geocoder: &RefCell<StubGeocoder>) {
    assert_eq!(geocoder.borrow().call_count(), 0);
}

#[then("the record has no coordinates")]
fn no_coordinates(record: &RefCell<LocationRecord>) {
    assert!(record.borrow().coords.is_none());
}

fn assert_failure(
    outcome: &RefCell<Option<Result<Coord<f64>, ResolveError>>>,
    expected: FailureKind,
) {
    match outcome.borrow().as_ref() {
        Some(Err(err)) => assert_eq!(err.kind(), expected, "unexpected error: {err}"),
        other => panic!("expected a {expected} failure, got {other:?}"),
    }
}

#[scenario(path = "tests/features/geocoding_resolver.feature", index = 0)]
fn coarser_variant_matches(
    geocoder: RefCell<StubGeocoder>,
    record: RefCell<LocationRecord>,
    outcome: RefCell<Option<Result<Coord<f64>, ResolveError>>>,
) {
    let _ = (geocoder, record, outcome);
}

#[scenario(path = "tests/features/geocoding_resolver.feature", index = 1)]
fn second_resolution_is_cached(
    geocoder: RefCell<StubGeocoder>,
    record: RefCell<LocationRecord>,
    outcome: RefCell<Option<Result<Coord<f64>, ResolveError>>>,
) {
    let _ = (geocoder, record, outcome);
}

#[scenario(path = "tests/features/geocoding_resolver.feature", index = 2)]
fn unavailable_service_aborts(
    geocoder: RefCell<StubGeocoder>,
    record: RefCell<LocationRecord>,
    outcome: RefCell<Option<Result<Coord<f64>, ResolveError>>>,
) {
    let _ = (geocoder, record, outcome);
}

#[scenario(path = "tests/features/geocoding_resolver.feature", index = 3)]
fn missing_address_rejected(
    geocoder: RefCell<StubGeocoder>,
    record: RefCell<LocationRecord>,
    outcome: RefCell<Option<Result<Coord<f64>, ResolveError>>>,
) {
    let _ = (geocoder, record, outcome);
}
