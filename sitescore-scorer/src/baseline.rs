//! Cohort mean and standard deviation per metric.

use serde::{Deserialize, Serialize};

use crate::metric::count_as_f64;
use crate::{Metric, MetricValues};

/// Mean and standard deviation of one metric across a cohort.
///
/// Cohorts contributing fewer than two values use a standard deviation of
/// `1.0`; an empty cohort has mean `0.0`. Two or more values without spread
/// keep a standard deviation of `0.0`, and every raw value then scores a
/// z of `0.0`.
///
/// # Examples
/// ```
/// use sitescore_scorer::Baseline;
///
/// let baseline = Baseline::from_samples(&[10.0, 20.0, 30.0]);
/// assert_eq!(baseline.mean, 20.0);
/// assert_eq!(baseline.std_dev, 10.0);
/// assert_eq!(baseline.z(10.0), -1.0);
///
/// assert_eq!(Baseline::from_samples(&[42.0]), Baseline { mean: 42.0, std_dev: 1.0 });
/// assert_eq!(Baseline::from_samples(&[]), Baseline { mean: 0.0, std_dev: 1.0 });
///
/// let flat = Baseline::from_samples(&[5.0, 5.0]);
/// assert_eq!(flat.z(7.0), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    /// Arithmetic mean of the contributing values.
    pub mean: f64,
    /// Sample standard deviation of the contributing values.
    pub std_dev: f64,
}

impl Default for Baseline {
    fn default() -> Self {
        Self {
            mean: 0.0,
            std_dev: 1.0,
        }
    }
}

impl Baseline {
    /// Compute the baseline of `samples` using the sample (n - 1) standard
    /// deviation.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "mean and variance are floating-point statistics"
    )]
    #[expect(clippy::float_cmp, reason = "only exactly equal samples have no spread")]
    pub fn from_samples(samples: &[f64]) -> Self {
        let (first, rest) = match samples {
            [] => return Self::default(),
            [first, rest @ ..] => (*first, rest),
        };
        if rest.is_empty() {
            return Self {
                mean: first,
                std_dev: 1.0,
            };
        }
        if rest.iter().all(|value| *value == first) {
            return Self {
                mean: first,
                std_dev: 0.0,
            };
        }

        let count = count_as_f64(samples.len());
        let mean = samples.iter().sum::<f64>() / count;
        let squares: f64 = samples.iter().map(|value| (value - mean).powi(2)).sum();
        let std_dev = (squares / (count - 1.0)).sqrt();
        Self {
            mean,
            std_dev: if std_dev.is_finite() { std_dev } else { 0.0 },
        }
    }

    /// Standard score of `raw` against this baseline, or `0.0` when the
    /// baseline has no spread.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "z-scores are floating-point")]
    pub const fn z(&self, raw: f64) -> f64 {
        if self.std_dev > 0.0 {
            (raw - self.mean) / self.std_dev
        } else {
            0.0
        }
    }
}

/// Baselines for every [`Metric`] of one cohort.
///
/// Serialises as a map keyed by metric name.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CohortBaselines {
    /// Price per square metre.
    pub price_psqm: Baseline,
    /// Transport accessibility.
    pub transport: Baseline,
    /// Competition density.
    pub competition: Baseline,
    /// Infrastructure density.
    pub infrastructure: Baseline,
    /// Population density.
    pub population_density: Baseline,
    /// Average income.
    pub avg_income: Baseline,
}

impl CohortBaselines {
    /// Compute baselines from per-member metrics. Each metric uses only the
    /// members contributing a value for it.
    ///
    /// # Examples
    /// ```
    /// use sitescore_scorer::{CohortBaselines, MetricValues};
    ///
    /// let members = [10.0, 20.0, 30.0].map(|price| MetricValues {
    ///     price_psqm: Some(price),
    ///     ..MetricValues::default()
    /// });
    /// let baselines = CohortBaselines::from_values(&members);
    /// assert_eq!(baselines.price_psqm.mean, 20.0);
    /// assert_eq!(baselines.transport.std_dev, 0.0);
    /// assert_eq!(baselines.transport.z(3.0), 0.0);
    /// ```
    #[must_use]
    pub fn from_values(values: &[MetricValues]) -> Self {
        let baseline = |metric: Metric| {
            let samples: Vec<f64> = values.iter().filter_map(|value| value.get(metric)).collect();
            Baseline::from_samples(&samples)
        };
        Self {
            price_psqm: baseline(Metric::PricePsqm),
            transport: baseline(Metric::Transport),
            competition: baseline(Metric::Competition),
            infrastructure: baseline(Metric::Infrastructure),
            population_density: baseline(Metric::PopulationDensity),
            avg_income: baseline(Metric::AvgIncome),
        }
    }

    /// Return the baseline for `metric`.
    #[must_use]
    pub const fn get(&self, metric: Metric) -> Baseline {
        match metric {
            Metric::PricePsqm => self.price_psqm,
            Metric::Transport => self.transport,
            Metric::Competition => self.competition,
            Metric::Infrastructure => self.infrastructure,
            Metric::PopulationDensity => self.population_density,
            Metric::AvgIncome => self.avg_income,
        }
    }

    /// Standard score of `raw` for `metric`.
    #[must_use]
    pub const fn z(&self, metric: Metric, raw: f64) -> f64 {
        self.get(metric).z(raw)
    }
}
