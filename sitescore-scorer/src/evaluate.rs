//! End-to-end evaluation of a cohort.

use log::info;
use serde::{Deserialize, Serialize};
use sitescore_core::{Geocoder, LocationRecord, SpatialSource};

use crate::{
    CohortBaselines, CohortStatisticsBuilder, MemberStatus, ScoreError, SiteScores, VenueType,
    score_as,
};

/// Scores and enrichment status of one member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberEvaluation {
    /// Identifier of the member.
    pub id: String,
    /// Enrichment outcome.
    #[serde(flatten)]
    pub status: MemberStatus,
    /// Scores against the cohort baselines.
    pub scores: SiteScores,
}

/// Result of evaluating a whole cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortEvaluation {
    /// Venue profile used for the composite.
    pub venue_type: VenueType,
    /// Baselines every member was scored against.
    pub baselines: CohortBaselines,
    /// Members in cohort order.
    pub members: Vec<MemberEvaluation>,
    /// Number of members whose enrichment failed.
    pub failure_count: usize,
}

/// Enrich `cohort`, compute its baselines and score every member.
///
/// The venue type is validated before any service is contacted.
///
/// # Errors
///
/// Returns [`ScoreError::UnknownVenueType`] when `venue_type` names no
/// profile. Member enrichment failures never fail the evaluation.
///
/// # Examples
/// ```
/// use sitescore_core::LocationRecord;
/// use sitescore_core::test_support::{StubGeocoder, StubSpatialSource};
/// use sitescore_scorer::{CohortStatisticsBuilder, evaluate_cohort};
///
/// let builder = CohortStatisticsBuilder::new(
///     StubGeocoder::new(),
///     StubSpatialSource::with_features(Vec::new()),
/// );
/// let mut cohort = vec![LocationRecord::new("only").with_price_and_area(100.0, 10.0)];
///
/// let evaluation = evaluate_cohort(&builder, &mut cohort, "casual")?;
/// assert_eq!(evaluation.members.len(), 1);
/// assert_eq!(evaluation.members[0].scores.price_score, 50.0);
/// # Ok::<(), sitescore_scorer::ScoreError>(())
/// ```
pub fn evaluate_cohort<G, S>(
    builder: &CohortStatisticsBuilder<G, S>,
    cohort: &mut [LocationRecord],
    venue_type: &str,
) -> Result<CohortEvaluation, ScoreError>
where
    G: Geocoder,
    S: SpatialSource,
{
    let venue: VenueType = venue_type.parse()?;
    let statistics = builder.build(cohort);
    let failure_count = statistics.report.failure_count();

    let members = cohort
        .iter()
        .zip(statistics.report.members)
        .map(|(record, member)| MemberEvaluation {
            id: member.id,
            status: member.status,
            scores: score_as(record, &statistics.baselines, venue),
        })
        .collect();

    info!("evaluated cohort as {venue} with {failure_count} enrichment failure(s)");
    Ok(CohortEvaluation {
        venue_type: venue,
        baselines: statistics.baselines,
        members,
        failure_count,
    })
}
