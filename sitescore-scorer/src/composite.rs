//! Weighted composite scoring of one location against cohort baselines.

use serde::{Deserialize, Serialize};
use sitescore_core::LocationRecord;

use crate::{CohortBaselines, Metric, MetricValues, ScoreError, VenueType};

/// Centre of the score scale.
pub const SCORE_CENTRE: f64 = 50.0;

/// Points per standard deviation.
pub const POINTS_PER_STD_DEV: f64 = 10.0;

/// Map a z-score onto the 50-centred score scale.
///
/// # Examples
/// ```
/// use sitescore_scorer::to_score;
///
/// assert_eq!(to_score(0.0), 50.0);
/// assert_eq!(to_score(-1.5), 35.0);
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "scores are an affine map of z")]
pub const fn to_score(z: f64) -> f64 {
    SCORE_CENTRE + POINTS_PER_STD_DEV * z
}

/// Signed z-scores of one location.
///
/// Price and competition are negated so that higher is always better.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZScores {
    /// Negated price-per-area z-score.
    pub price: f64,
    /// Transport z-score.
    pub transport: f64,
    /// Negated competition z-score.
    pub competition: f64,
    /// Infrastructure z-score.
    pub infrastructure: f64,
    /// Population density z-score.
    pub demographic: f64,
    /// Average income z-score; informational only.
    pub income: f64,
    /// Sub-weighted location z-score.
    pub location: f64,
    /// Top-weighted composite z-score.
    pub composite: f64,
}

impl ZScores {
    /// Compute the z-scores of `values` under `venue`'s weights.
    ///
    /// A missing price per area is scored as zero.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "weighted sums and negations of z-scores"
    )]
    pub fn compute(values: &MetricValues, baselines: &CohortBaselines, venue: VenueType) -> Self {
        let profile = venue.profile();
        let price = -baselines.z(Metric::PricePsqm, values.price_psqm.unwrap_or(0.0));
        let transport = baselines.z(Metric::Transport, values.transport);
        let competition = -baselines.z(Metric::Competition, values.competition);
        let infrastructure = baselines.z(Metric::Infrastructure, values.infrastructure);
        let demographic = baselines.z(Metric::PopulationDensity, values.population_density);
        let income = baselines.z(Metric::AvgIncome, values.avg_income);

        let location = transport * profile.sub.transport
            + competition * profile.sub.competition
            + infrastructure * profile.sub.infrastructure
            + demographic * profile.sub.demographic;
        let composite = price * profile.top.price + location * profile.top.location;

        Self {
            price,
            transport,
            competition,
            infrastructure,
            demographic,
            income,
            location,
            composite,
        }
    }
}

/// Scores of one location on the 50-centred scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteScores {
    /// Price attractiveness.
    pub price_score: f64,
    /// Transport accessibility.
    pub transport_score: f64,
    /// Inverse competition pressure.
    pub competition_score: f64,
    /// Infrastructure density.
    pub infrastructure_score: f64,
    /// Population density.
    pub demographic_score: f64,
    /// Weighted location quality.
    pub location_score: f64,
    /// Overall desirability.
    pub composite_score: f64,
    /// Average income; not part of the composite.
    pub income_score: f64,
}

impl From<ZScores> for SiteScores {
    fn from(z: ZScores) -> Self {
        Self {
            price_score: to_score(z.price),
            transport_score: to_score(z.transport),
            competition_score: to_score(z.competition),
            infrastructure_score: to_score(z.infrastructure),
            demographic_score: to_score(z.demographic),
            location_score: to_score(z.location),
            composite_score: to_score(z.composite),
            income_score: to_score(z.income),
        }
    }
}

/// Score `record` against `baselines` using the named venue profile.
///
/// # Errors
///
/// Returns [`ScoreError::UnknownVenueType`] when `venue_type` names no
/// profile.
///
/// # Examples
/// ```
/// use sitescore_core::LocationRecord;
/// use sitescore_scorer::{Baseline, CohortBaselines, score};
///
/// let baselines = CohortBaselines {
///     price_psqm: Baseline { mean: 20.0, std_dev: 10.0 },
///     ..CohortBaselines::default()
/// };
/// let record = LocationRecord::new("a").with_price_and_area(100.0, 10.0);
///
/// let scores = score(&record, &baselines, "standard")?;
/// assert_eq!(scores.price_score, 60.0);
/// assert!(score(&record, &baselines, "kiosk").is_err());
/// # Ok::<(), sitescore_scorer::ScoreError>(())
/// ```
pub fn score(
    record: &LocationRecord,
    baselines: &CohortBaselines,
    venue_type: &str,
) -> Result<SiteScores, ScoreError> {
    let venue: VenueType = venue_type.parse()?;
    Ok(score_as(record, baselines, venue))
}

/// Score `record` against `baselines` using `venue`'s profile.
#[must_use]
pub fn score_as(record: &LocationRecord, baselines: &CohortBaselines, venue: VenueType) -> SiteScores {
    let values = MetricValues::from_record(record);
    ZScores::compute(&values, baselines, venue).into()
}
