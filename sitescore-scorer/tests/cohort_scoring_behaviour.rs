//! Behavioural coverage for cohort baselines and composite scoring.

use std::cell::RefCell;

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use sitescore_core::test_support::{StubGeocoder, StubSpatialSource};
use sitescore_core::{FailureKind, LocationRecord, RawFeature, SpatialSourceError, Tags};
use sitescore_scorer::{
    Baseline, CohortStatistics, CohortStatisticsBuilder, Metric, MemberStatus, ScoreError,
    SiteScores, score,
};

const SITE: Coord<f64> = Coord { x: 37.62, y: 55.75 };
const THROTTLED_SITE: Coord<f64> = Coord { x: 30.31, y: 59.94 };

type ScoreOutcome = RefCell<Option<Result<SiteScores, ScoreError>>>;

/// Members evaluated by the scenario.
#[fixture]
fn cohort() -> RefCell<Vec<LocationRecord>> {
    RefCell::new(Vec::new())
}

/// Statistics produced by the builder.
#[fixture]
fn statistics() -> RefCell<Option<CohortStatistics>> {
    RefCell::new(None)
}

/// Outcome of the last scoring call.
#[fixture]
fn outcome() -> ScoreOutcome {
    RefCell::new(None)
}

fn source() -> StubSpatialSource {
    StubSpatialSource::with_features(vec![RawFeature::Node {
        id: 1,
        location: SITE,
        tags: Tags::from([("amenity".to_owned(), "cafe".to_owned())]),
    }])
    .with_error_at(
        THROTTLED_SITE,
        SpatialSourceError::RateLimited {
            url: "https://overpass.test/api/interpreter".to_owned(),
            retry_after_secs: Some(30),
        },
    )
}

fn member<'a>(cohort: &'a [LocationRecord], id: &str) -> &'a LocationRecord {
    cohort
        .iter()
        .find(|member| member.id == id)
        .unwrap_or_else(|| panic!("member {id} must exist"))
}

fn stats_of(statistics: &RefCell<Option<CohortStatistics>>) -> CohortStatistics {
    statistics
        .borrow()
        .clone()
        .unwrap_or_else(|| panic!("baselines must be built first"))
}

#[given("a cohort priced at 100, 200 and 300 over 10 square metres")]
fn priced_cohort(cohort: &RefCell<Vec<LocationRecord>>) {
    *cohort.borrow_mut() = [100.0, 200.0, 300.0]
        .into_iter()
        .enumerate()
        .map(|(index, price)| {
            LocationRecord::new(format!("flat-{index}"))
                .with_coords(SITE)
                .with_price_and_area(price, 10.0)
        })
        .collect();
}

#[given("a cohort with one resolved member")]
fn single_member(cohort: &RefCell<Vec<LocationRecord>>) {
    *cohort.borrow_mut() = vec![
        LocationRecord::new("solo")
            .with_coords(SITE)
            .with_price_and_area(9_000_000.0, 45.0)
            .with_attribute("population_density", 12_000.0)
            .with_attribute("avg_income", 95_000.0),
    ];
}

#[given("a cohort of two resolved members and one without an address")]
fn partially_broken_cohort(cohort: &RefCell<Vec<LocationRecord>>) {
    *cohort.borrow_mut() = vec![
        LocationRecord::new("first").with_coords(SITE),
        LocationRecord::new("broken"),
        LocationRecord::new("third").with_coords(SITE),
    ];
}

#[given("a priced cohort whose middle member is throttled")]
fn throttled_cohort(cohort: &RefCell<Vec<LocationRecord>>) {
    *cohort.borrow_mut() = vec![
        LocationRecord::new("cheap")
            .with_coords(SITE)
            .with_price_and_area(100.0, 10.0),
        LocationRecord::new("throttled").with_coords(THROTTLED_SITE),
        LocationRecord::new("dear")
            .with_coords(SITE)
            .with_price_and_area(300.0, 10.0),
    ];
}

#[when("I build the cohort baselines")]
fn build_baselines(
    cohort: &RefCell<Vec<LocationRecord>>,
    statistics: &RefCell<Option<CohortStatistics>>,
) {
    let builder = CohortStatisticsBuilder::new(StubGeocoder::new(), source());
    *statistics.borrow_mut() = Some(builder.build(&mut cohort.borrow_mut()));
}

#[when("I score a candidate priced at 100 over 10 square metres as \"standard\"")]
fn score_candidate(statistics: &RefCell<Option<CohortStatistics>>, outcome: &ScoreOutcome) {
    let stats = stats_of(statistics);
    let candidate = LocationRecord::new("candidate").with_price_and_area(100.0, 10.0);
    *outcome.borrow_mut() = Some(score(&candidate, &stats.baselines, "standard"));
}

#[when("I score the first member as \"food_truck\"")]
fn score_unknown_venue(
    cohort: &RefCell<Vec<LocationRecord>>,
    statistics: &RefCell<Option<CohortStatistics>>,
    outcome: &ScoreOutcome,
) {
    let stats = stats_of(statistics);
    let cohort = cohort.borrow();
    let member = cohort
        .first()
        .unwrap_or_else(|| panic!("cohort must not be empty"));
    *outcome.borrow_mut() = Some(score(member, &stats.baselines, "food_truck"));
}

#[then("the price baseline has mean 20 and standard deviation 10")]
fn price_baseline(statistics: &RefCell<Option<CohortStatistics>>) {
    let stats = stats_of(statistics);
    assert_eq!(stats.baselines.price_psqm.mean, 20.0);
    assert_eq!(stats.baselines.price_psqm.std_dev, 10.0);
}

#[then("the candidate's price score is 60")]
fn candidate_price_score(outcome: &ScoreOutcome) {
    match outcome.borrow().as_ref() {
        Some(Ok(scores)) => assert_eq!(scores.price_score, 60.0),
        other => panic!("expected scores, got {other:?}"),
    }
}

#[then("every metric has standard deviation 1")]
fn unit_spread(statistics: &RefCell<Option<CohortStatistics>>) {
    let stats = stats_of(statistics);
    for metric in Metric::ALL {
        assert_eq!(stats.baselines.get(metric).std_dev, 1.0, "{metric}");
    }
}

#[then("the member's composite score is 50")]
fn member_scores_fifty(
    cohort: &RefCell<Vec<LocationRecord>>,
    statistics: &RefCell<Option<CohortStatistics>>,
) {
    let stats = stats_of(statistics);
    for member in cohort.borrow().iter() {
        match score(member, &stats.baselines, "premium") {
            Ok(scores) => assert_eq!(scores.composite_score, 50.0),
            Err(err) => panic!("scoring failed: {err}"),
        }
    }
}

#[then("the report lists one invalid input failure")]
fn one_failure(statistics: &RefCell<Option<CohortStatistics>>) {
    let stats = stats_of(statistics);
    assert_eq!(stats.report.failure_count(), 1);
    assert!(matches!(
        stats.report.status("broken"),
        Some(MemberStatus::Failed {
            kind: FailureKind::InvalidInput,
            ..
        })
    ));
}

#[then("the failing member has empty feature groups")]
fn failing_member_empty(cohort: &RefCell<Vec<LocationRecord>>) {
    let cohort = cohort.borrow();
    let broken = cohort
        .iter()
        .find(|member| member.id == "broken")
        .unwrap_or_else(|| panic!("broken member must exist"));
    assert!(broken.poi_groups.is_empty());
}

#[then("the resolved members were enriched")]
fn resolved_enriched(statistics: &RefCell<Option<CohortStatistics>>) {
    let stats = stats_of(statistics);
    for id in ["first", "third"] {
        assert_eq!(
            stats.report.status(id),
            Some(&MemberStatus::Enriched { poi_count: 1 }),
            "{id}"
        );
    }
}

#[then("the report lists one throttled failure")]
fn one_throttled_failure(statistics: &RefCell<Option<CohortStatistics>>) {
    let stats = stats_of(statistics);
    assert_eq!(stats.report.failure_count(), 1);
    assert!(matches!(
        stats.report.status("throttled"),
        Some(MemberStatus::Failed {
            kind: FailureKind::Throttled,
            ..
        })
    ));
    for id in ["cheap", "dear"] {
        assert_eq!(
            stats.report.status(id),
            Some(&MemberStatus::Enriched { poi_count: 1 }),
            "{id}"
        );
    }
}

#[then("the throttled member has empty feature groups")]
fn throttled_member_empty(cohort: &RefCell<Vec<LocationRecord>>) {
    let cohort = cohort.borrow();
    let throttled = member(&cohort, "throttled");
    assert!(throttled.pois.is_empty());
    assert!(throttled.poi_groups.is_empty());
}

#[then("the price baseline comes from the other two members")]
fn price_from_healthy_members(statistics: &RefCell<Option<CohortStatistics>>) {
    let stats = stats_of(statistics);
    assert_eq!(stats.baselines.price_psqm, Baseline::from_samples(&[10.0, 30.0]));
}

#[then("the throttled member contributes no feature counts")]
fn throttled_counts_are_zero(statistics: &RefCell<Option<CohortStatistics>>) {
    let stats = stats_of(statistics);
    let cafes_per_member = Baseline::from_samples(&[1.0, 0.0, 1.0]);
    assert_eq!(stats.baselines.competition, cafes_per_member);
    assert_eq!(stats.baselines.infrastructure, cafes_per_member);
    assert_eq!(stats.baselines.transport, Baseline::from_samples(&[0.0, 0.0, 0.0]));
}

#[then("scoring fails as invalid input")]
fn scoring_invalid(outcome: &ScoreOutcome) {
    match outcome.borrow().as_ref() {
        Some(Err(err)) => assert_eq!(err.kind(), FailureKind::InvalidInput),
        other => panic!("expected an error, got {other:?}"),
    }
}

#[scenario(path = "tests/features/cohort_scoring.feature", index = 0)]
fn cheap_candidate_scores_sixty(
    cohort: RefCell<Vec<LocationRecord>>,
    statistics: RefCell<Option<CohortStatistics>>,
    outcome: ScoreOutcome,
) {
    let _ = (cohort, statistics, outcome);
}

#[scenario(path = "tests/features/cohort_scoring.feature", index = 1)]
fn single_member_cohort(
    cohort: RefCell<Vec<LocationRecord>>,
    statistics: RefCell<Option<CohortStatistics>>,
    outcome: ScoreOutcome,
) {
    let _ = (cohort, statistics, outcome);
}

#[scenario(path = "tests/features/cohort_scoring.feature", index = 2)]
fn partial_failure_tolerated(
    cohort: RefCell<Vec<LocationRecord>>,
    statistics: RefCell<Option<CohortStatistics>>,
    outcome: ScoreOutcome,
) {
    let _ = (cohort, statistics, outcome);
}

#[scenario(path = "tests/features/cohort_scoring.feature", index = 3)]
fn unknown_venue_rejected(
    cohort: RefCell<Vec<LocationRecord>>,
    statistics: RefCell<Option<CohortStatistics>>,
    outcome: ScoreOutcome,
) {
    let _ = (cohort, statistics, outcome);
}

#[scenario(path = "tests/features/cohort_scoring.feature", index = 4)]
fn throttled_member_tolerated(
    cohort: RefCell<Vec<LocationRecord>>,
    statistics: RefCell<Option<CohortStatistics>>,
    outcome: ScoreOutcome,
) {
    let _ = (cohort, statistics, outcome);
}
