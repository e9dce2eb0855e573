//! Cohort-relative scoring of candidate sites.
//!
//! The crate turns enriched [`LocationRecord`](sitescore_core::LocationRecord)
//! values into comparable scores:
//! - [`CohortStatisticsBuilder`] completes missing feature data for each
//!   member, then computes a [`Baseline`] (mean and sample standard
//!   deviation) per [`Metric`].
//! - [`score`] converts one member's metrics into z-scores, negating price and
//!   competition, and combines them with the weights of a [`VenueType`].
//! - [`evaluate_cohort`] runs both steps for a whole cohort.
//!
//! Scores use `50 + 10 * z`, so a member at the cohort mean scores 50.
//!
//! # Examples
//!
//! ```
//! use sitescore_core::LocationRecord;
//! use sitescore_scorer::{CohortBaselines, MetricValues, score};
//!
//! let cohort: Vec<_> = [100.0, 200.0, 300.0]
//!     .into_iter()
//!     .map(|price| LocationRecord::with_generated_id().with_price_and_area(price, 10.0))
//!     .collect();
//! let values: Vec<_> = cohort.iter().map(MetricValues::from_record).collect();
//! let baselines = CohortBaselines::from_values(&values);
//!
//! let candidate = LocationRecord::new("cheap").with_price_and_area(100.0, 10.0);
//! let scores = score(&candidate, &baselines, "standard")?;
//! assert_eq!(scores.price_score, 60.0);
//! # Ok::<(), sitescore_scorer::ScoreError>(())
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod baseline;
mod cohort;
mod composite;
mod error;
mod evaluate;
mod metric;
mod venue;

pub use baseline::{Baseline, CohortBaselines};
pub use cohort::{
    CohortReport, CohortStatistics, CohortStatisticsBuilder, DEFAULT_RADIUS_M, MemberReport,
    MemberStatus,
};
pub use composite::{
    POINTS_PER_STD_DEV, SCORE_CENTRE, SiteScores, ZScores, score, score_as, to_score,
};
pub use error::ScoreError;
pub use evaluate::{CohortEvaluation, MemberEvaluation, evaluate_cohort};
pub use metric::{
    AVG_INCOME_KEY, COMPETITION_PREFIXES, INFRASTRUCTURE_PREFIXES, Metric, MetricValues,
    POPULATION_DENSITY_KEY, TRANSPORT_PREFIXES,
};
pub use venue::{SubWeights, TopWeights, VenueProfile, VenueType};
