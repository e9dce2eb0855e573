//! Cohort enrichment and baseline computation.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use sitescore_core::{
    AcquireError, FailureKind, GeocodeLocale, Geocoder, GeocodingResolver, LocationRecord,
    PoiAcquirer, ResolveError, SpatialSource,
};
use thiserror::Error;

use crate::{CohortBaselines, MetricValues};

/// Search radius used when none is configured, in metres.
pub const DEFAULT_RADIUS_M: f64 = 100.0;

/// Enrichment outcome of one cohort member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MemberStatus {
    /// The member already carried feature groups; nothing was fetched.
    Ready,
    /// Features were fetched during this build.
    Enriched {
        /// Number of stored features.
        poi_count: usize,
    },
    /// Enrichment failed; the member was scored with empty feature data.
    Failed {
        /// Failure classification.
        kind: FailureKind,
        /// Human-readable cause.
        message: String,
    },
}

impl MemberStatus {
    /// Report whether enrichment failed.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Status of one member, keyed by its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberReport {
    /// Identifier of the member.
    pub id: String,
    /// Enrichment outcome.
    #[serde(flatten)]
    pub status: MemberStatus,
}

/// Per-member enrichment report of one baseline build.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CohortReport {
    /// Members in cohort order.
    pub members: Vec<MemberReport>,
}

impl CohortReport {
    /// Number of members whose enrichment failed.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// Iterate over failed members.
    pub fn failures(&self) -> impl Iterator<Item = &MemberReport> {
        self.members.iter().filter(|member| member.status.is_failure())
    }

    /// Look up the status of member `id`.
    #[must_use]
    pub fn status(&self, id: &str) -> Option<&MemberStatus> {
        self.members
            .iter()
            .find(|member| member.id == id)
            .map(|member| &member.status)
    }
}

/// Baselines of one cohort together with the enrichment report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortStatistics {
    /// Per-metric baselines.
    pub baselines: CohortBaselines,
    /// Per-member enrichment outcomes.
    pub report: CohortReport,
}

/// Failure while enriching one member.
#[derive(Debug, Clone, PartialEq, Error)]
enum EnrichError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Acquire(#[from] AcquireError),
}

impl EnrichError {
    const fn kind(&self) -> FailureKind {
        match self {
            Self::Resolve(err) => err.kind(),
            Self::Acquire(err) => err.kind(),
        }
    }

    fn describe(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}

/// Enrich a cohort and compute its baselines.
///
/// Members without feature groups are geocoded when needed and then
/// acquired, one at a time in cohort order. A member failure leaves that
/// member with empty groups and is recorded in the [`CohortReport`]; the
/// batch always completes.
///
/// # Examples
/// ```
/// use sitescore_core::LocationRecord;
/// use sitescore_core::test_support::{StubGeocoder, StubSpatialSource};
/// use sitescore_scorer::CohortStatisticsBuilder;
///
/// let builder = CohortStatisticsBuilder::new(
///     StubGeocoder::new(),
///     StubSpatialSource::with_features(Vec::new()),
/// );
/// let mut cohort = vec![
///     LocationRecord::new("a").with_price_and_area(100.0, 10.0),
///     LocationRecord::new("b").with_price_and_area(200.0, 10.0),
///     LocationRecord::new("c").with_price_and_area(300.0, 10.0),
/// ];
///
/// let stats = builder.build(&mut cohort);
/// assert_eq!(stats.baselines.price_psqm.mean, 20.0);
/// assert_eq!(stats.report.failure_count(), 3);
/// ```
#[derive(Debug)]
pub struct CohortStatisticsBuilder<G, S> {
    resolver: GeocodingResolver<G>,
    acquirer: PoiAcquirer<S>,
    radius_m: f64,
}

impl<G: Geocoder, S: SpatialSource> CohortStatisticsBuilder<G, S> {
    /// Create a builder over the given services with the default radius.
    #[must_use]
    pub fn new(geocoder: G, source: S) -> Self {
        Self {
            resolver: GeocodingResolver::new(geocoder),
            acquirer: PoiAcquirer::new(source),
            radius_m: DEFAULT_RADIUS_M,
        }
    }

    /// Set the acquisition radius in metres.
    #[must_use]
    pub fn with_radius(mut self, radius_m: f64) -> Self {
        self.radius_m = radius_m;
        self
    }

    /// Set the geocoding locale.
    #[must_use]
    pub fn with_locale(mut self, locale: GeocodeLocale) -> Self {
        self.resolver = self.resolver.with_locale(locale);
        self
    }

    /// Acquisition radius in metres.
    #[must_use]
    pub const fn radius_m(&self) -> f64 {
        self.radius_m
    }

    /// Borrow the geocoding resolver.
    #[must_use]
    pub const fn resolver(&self) -> &GeocodingResolver<G> {
        &self.resolver
    }

    /// Borrow the feature acquirer.
    #[must_use]
    pub const fn acquirer(&self) -> &PoiAcquirer<S> {
        &self.acquirer
    }

    /// Enrich every member lacking feature groups, then compute baselines.
    pub fn build(&self, cohort: &mut [LocationRecord]) -> CohortStatistics {
        let mut report = CohortReport::default();
        let mut values = Vec::with_capacity(cohort.len());
        for record in cohort.iter_mut() {
            let status = self.enrich(record);
            report.members.push(MemberReport {
                id: record.id.clone(),
                status,
            });
            values.push(MetricValues::from_record(record));
        }

        let baselines = CohortBaselines::from_values(&values);
        info!(
            "computed baselines for {} member(s), {} enrichment failure(s)",
            cohort.len(),
            report.failure_count()
        );
        CohortStatistics { baselines, report }
    }

    /// Enrich a single member, downgrading any failure to empty groups.
    pub fn enrich(&self, record: &mut LocationRecord) -> MemberStatus {
        if !record.poi_groups.is_empty() {
            debug!("location {} already has feature groups", record.id);
            return MemberStatus::Ready;
        }

        match self.try_enrich(record) {
            Ok(poi_count) => MemberStatus::Enriched { poi_count },
            Err(err) => {
                warn!("skipping feature data for location {}: {err}", record.id);
                record.clear_pois();
                MemberStatus::Failed {
                    kind: err.kind(),
                    message: err.describe(),
                }
            }
        }
    }

    fn try_enrich(&self, record: &mut LocationRecord) -> Result<usize, EnrichError> {
        if record.coords.is_none() {
            self.resolver.resolve(record, false)?;
        }
        let groups = self.acquirer.acquire(record, self.radius_m)?;
        Ok(groups.poi_count())
    }
}
