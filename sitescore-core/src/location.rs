//! Candidate sites and their enrichment state.

use std::collections::HashMap;

use geo::Coord;
use uuid::Uuid;

use crate::{PoiGroups, PointOfInterest};

/// Auxiliary numeric signals keyed by name (`population_density`,
/// `avg_income`, ...).
pub type Attributes = HashMap<String, f64>;

/// One candidate listing or venue site.
///
/// Records are produced by an upstream parser and mutated in place by the
/// enrichment stages: the geocoding resolver fills `coords`, POI acquisition
/// fills `pois` and `poi_groups`. Coordinates use `x = longitude`,
/// `y = latitude`.
///
/// # Examples
/// ```
/// use sitescore_core::LocationRecord;
///
/// let record = LocationRecord::new("flat-17")
///     .with_address("Москва, ул. Ленина, 5")
///     .with_price_and_area(12_000_000.0, 60.0);
///
/// assert_eq!(record.price_per_square_metre(), Some(200_000.0));
/// assert!(record.coords.is_none());
/// assert!(record.poi_groups.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct LocationRecord {
    /// Caller-assigned or generated identifier.
    pub id: String,
    /// Raw free-text address.
    pub address: Option<String>,
    /// Resolved coordinates; present only after a successful geocode.
    pub coords: Option<Coord<f64>>,
    /// Asking price.
    pub price: Option<f64>,
    /// Total area in square metres.
    pub total_area: Option<f64>,
    /// Direct public transport stop count from auxiliary transport data.
    pub transport_stops: Option<f64>,
    /// Tagged features stored by the last successful acquisition.
    pub pois: Vec<PointOfInterest>,
    /// Features grouped by classification label.
    pub poi_groups: PoiGroups,
    /// Externally supplied numeric signals.
    pub extra_attributes: Attributes,
}

impl LocationRecord {
    /// Create an empty record with the given identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Create an empty record with a random UUID identifier.
    #[must_use]
    pub fn with_generated_id() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    /// Set the raw address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Set already known coordinates.
    #[must_use]
    pub fn with_coords(mut self, coords: Coord<f64>) -> Self {
        self.coords = Some(coords);
        self
    }

    /// Set price and total area.
    #[must_use]
    pub fn with_price_and_area(mut self, price: f64, total_area: f64) -> Self {
        self.price = Some(price);
        self.total_area = Some(total_area);
        self
    }

    /// Set an auxiliary attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: f64) -> Self {
        self.extra_attributes.insert(name.into(), value);
        self
    }

    /// Return `(latitude, longitude)` when resolved.
    #[must_use]
    pub fn lat_lon(&self) -> Option<(f64, f64)> {
        self.coords.map(|coord| (coord.y, coord.x))
    }

    /// Price divided by total area, when both are present and non-zero.
    #[must_use]
    pub fn price_per_square_metre(&self) -> Option<f64> {
        match (self.price, self.total_area) {
            (Some(price), Some(area)) if price != 0.0 && area != 0.0 => Some(price / area),
            _ => None,
        }
    }

    /// Read an auxiliary attribute, defaulting to zero.
    #[must_use]
    pub fn attribute_or_zero(&self, name: &str) -> f64 {
        self.extra_attributes.get(name).copied().unwrap_or(0.0)
    }

    /// Store acquired features and regroup them.
    pub fn set_pois(&mut self, pois: Vec<PointOfInterest>) {
        self.poi_groups = PoiGroups::from_pois(pois.iter().cloned());
        self.pois = pois;
    }

    /// Drop any acquired features, leaving an explicit empty grouping.
    pub fn clear_pois(&mut self) {
        self.pois.clear();
        self.poi_groups = PoiGroups::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tags;
    use rstest::rstest;

    #[rstest]
    #[case(Some(100.0), Some(10.0), Some(10.0))]
    #[case(Some(100.0), None, None)]
    #[case(None, Some(10.0), None)]
    #[case(Some(100.0), Some(0.0), None)]
    #[case(Some(0.0), Some(10.0), None)]
    fn price_per_area_requires_both_values(
        #[case] price: Option<f64>,
        #[case] area: Option<f64>,
        #[case] expected: Option<f64>,
    ) {
        let record = LocationRecord {
            price,
            total_area: area,
            ..LocationRecord::default()
        };
        assert_eq!(record.price_per_square_metre(), expected);
    }

    #[rstest]
    fn generated_ids_are_unique() {
        let first = LocationRecord::with_generated_id();
        let second = LocationRecord::with_generated_id();
        assert_ne!(first.id, second.id);
    }

    #[rstest]
    fn set_pois_regroups() {
        let mut record = LocationRecord::new("a");
        record.set_pois(vec![PointOfInterest::point(
            1,
            Coord { x: 0.0, y: 0.0 },
            Tags::from([("amenity".into(), "cafe".into())]),
        )]);
        assert_eq!(record.poi_groups.labels().collect::<Vec<_>>(), ["amenity=cafe"]);

        record.clear_pois();
        assert!(record.pois.is_empty());
        assert!(record.poi_groups.is_empty());
    }

    #[rstest]
    fn lat_lon_swaps_axes() {
        let record = LocationRecord::new("a").with_coords(Coord { x: 37.6, y: 55.7 });
        assert_eq!(record.lat_lon(), Some((55.7, 37.6)));
    }

    #[rstest]
    fn missing_attribute_defaults_to_zero() {
        let record = LocationRecord::new("a").with_attribute("avg_income", 90_000.0);
        assert_eq!(record.attribute_or_zero("avg_income"), 90_000.0);
        assert_eq!(record.attribute_or_zero("population_density"), 0.0);
    }
}
