//! Per-member raw metrics derived from an enriched location record.

use std::fmt;

use serde::{Deserialize, Serialize};
use sitescore_core::LocationRecord;

/// Label prefixes counted as public transport.
pub const TRANSPORT_PREFIXES: [&str; 1] = ["public_transport"];

/// Label prefixes counted as direct competition.
pub const COMPETITION_PREFIXES: [&str; 3] = ["amenity=restaurant", "amenity=cafe", "amenity=bar"];

/// Label prefixes counted as general infrastructure.
pub const INFRASTRUCTURE_PREFIXES: [&str; 5] =
    ["shop=", "office=", "leisure=", "amenity=", "tourism="];

/// Attribute key read for the demographic metric.
pub const POPULATION_DENSITY_KEY: &str = "population_density";

/// Attribute key read for the income metric.
pub const AVG_INCOME_KEY: &str = "avg_income";

/// Scoring metrics with a cohort baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Price per square metre.
    PricePsqm,
    /// Direct stops plus public transport features.
    Transport,
    /// Restaurants, cafés and bars nearby.
    Competition,
    /// Shops, offices, leisure, amenities and tourism features nearby.
    Infrastructure,
    /// Externally supplied population density.
    PopulationDensity,
    /// Externally supplied average income.
    AvgIncome,
}

impl Metric {
    /// Every metric, in reporting order.
    pub const ALL: [Self; 6] = [
        Self::PricePsqm,
        Self::Transport,
        Self::Competition,
        Self::Infrastructure,
        Self::PopulationDensity,
        Self::AvgIncome,
    ];

    /// Return the metric name used in reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PricePsqm => "price_psqm",
            Self::Transport => "transport",
            Self::Competition => "competition",
            Self::Infrastructure => "infrastructure",
            Self::PopulationDensity => "population_density",
            Self::AvgIncome => "avg_income",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw metric values for one cohort member.
///
/// `price_psqm` is `None` when price or area is missing or zero; such a
/// member does not contribute to the price baseline. Every other metric
/// always contributes, defaulting to zero.
///
/// # Examples
/// ```
/// use sitescore_core::LocationRecord;
/// use sitescore_scorer::MetricValues;
///
/// let record = LocationRecord::new("a")
///     .with_price_and_area(300.0, 10.0)
///     .with_attribute("avg_income", 80_000.0);
/// let values = MetricValues::from_record(&record);
///
/// assert_eq!(values.price_psqm, Some(30.0));
/// assert_eq!(values.avg_income, 80_000.0);
/// assert_eq!(values.transport, 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricValues {
    /// Price per square metre, when derivable.
    pub price_psqm: Option<f64>,
    /// Direct stop count plus public transport features.
    pub transport: f64,
    /// Competing venues nearby.
    pub competition: f64,
    /// Infrastructure features nearby.
    pub infrastructure: f64,
    /// Population density attribute.
    pub population_density: f64,
    /// Average income attribute.
    pub avg_income: f64,
}

impl MetricValues {
    /// Derive the raw metrics of `record` from its current groupings and
    /// attributes.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "transport adds the direct stop count to a feature count"
    )]
    pub fn from_record(record: &LocationRecord) -> Self {
        let groups = &record.poi_groups;
        Self {
            price_psqm: record.price_per_square_metre(),
            transport: record.transport_stops.unwrap_or(0.0)
                + count_as_f64(groups.count_with_prefixes(&TRANSPORT_PREFIXES)),
            competition: count_as_f64(groups.count_with_prefixes(&COMPETITION_PREFIXES)),
            infrastructure: count_as_f64(groups.count_with_prefixes(&INFRASTRUCTURE_PREFIXES)),
            population_density: record.attribute_or_zero(POPULATION_DENSITY_KEY),
            avg_income: record.attribute_or_zero(AVG_INCOME_KEY),
        }
    }

    /// Return the contributing value for `metric`, if any.
    #[must_use]
    pub const fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::PricePsqm => self.price_psqm,
            Metric::Transport => Some(self.transport),
            Metric::Competition => Some(self.competition),
            Metric::Infrastructure => Some(self.infrastructure),
            Metric::PopulationDensity => Some(self.population_density),
            Metric::AvgIncome => Some(self.avg_income),
        }
    }
}

/// Convert a feature count to `f64` without precision loss for realistic
/// counts; counts beyond `u32::MAX` saturate.
pub(crate) fn count_as_f64(count: usize) -> f64 {
    f64::from(u32::try_from(count).unwrap_or(u32::MAX))
}
