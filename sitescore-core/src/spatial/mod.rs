//! Acquire and classify points of interest around a resolved site.
//!
//! The [`SpatialSource`] trait abstracts one radius query against a spatial
//! feature service and yields [`RawFeature`] values. [`PoiAcquirer`] filters
//! those into [`PointOfInterest`] records and stores them, grouped, on a
//! [`LocationRecord`](crate::LocationRecord).

mod acquire;
mod error;

use geo::Coord;

use crate::{PointOfInterest, Tags};

pub use acquire::PoiAcquirer;
pub use error::{AcquireError, SpatialSourceError};

/// A feature as returned by a spatial service, before filtering.
#[derive(Debug, Clone, PartialEq)]
pub enum RawFeature {
    /// A tagged or untagged point.
    Node {
        /// Source identifier.
        id: u64,
        /// Point location.
        location: Coord<f64>,
        /// Source tags.
        tags: Tags,
    },
    /// A vertex chain. Vertices the service could not resolve are `None`.
    Way {
        /// Source identifier.
        id: u64,
        /// Vertices in source order.
        vertices: Vec<Option<Coord<f64>>>,
        /// Source tags.
        tags: Tags,
    },
    /// A relation; geometry is not carried.
    Relation {
        /// Source identifier.
        id: u64,
        /// Source tags.
        tags: Tags,
    },
}

impl RawFeature {
    /// Convert into a point of interest, dropping features that cannot be
    /// classified or located.
    ///
    /// Untagged features are dropped. Ways also need at least one resolved
    /// vertex; unresolved vertices are skipped.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use sitescore_core::{RawFeature, Tags};
    ///
    /// let tags = Tags::from([("building".into(), "yes".into())]);
    /// let unresolved = RawFeature::Way { id: 1, vertices: vec![None, None], tags: tags.clone() };
    /// assert!(unresolved.into_poi().is_none());
    ///
    /// let partial = RawFeature::Way {
    ///     id: 2,
    ///     vertices: vec![None, Some(Coord { x: 1.0, y: 2.0 })],
    ///     tags,
    /// };
    /// assert!(partial.into_poi().is_some());
    /// ```
    #[must_use]
    pub fn into_poi(self) -> Option<PointOfInterest> {
        match self {
            Self::Node { id, location, tags } if !tags.is_empty() => {
                Some(PointOfInterest::point(id, location, tags))
            }
            Self::Way { id, vertices, tags } if !tags.is_empty() => {
                let resolved: Vec<Coord<f64>> = vertices.into_iter().flatten().collect();
                (!resolved.is_empty()).then(|| PointOfInterest::way(id, resolved, tags))
            }
            Self::Relation { id, tags } if !tags.is_empty() => {
                Some(PointOfInterest::relation(id, tags))
            }
            _ => None,
        }
    }
}

/// Query a spatial feature service.
///
/// Implementations issue exactly one query per call and must distinguish a
/// rate-limit response ([`SpatialSourceError::RateLimited`]) from other
/// failures.
pub trait SpatialSource {
    /// Return point, way and relation features within `radius_m` metres of
    /// `center` (`x = longitude`, `y = latitude`).
    fn features_within(
        &self,
        center: Coord<f64>,
        radius_m: f64,
    ) -> Result<Vec<RawFeature>, SpatialSourceError>;
}

impl<T: SpatialSource + ?Sized> SpatialSource for &T {
    fn features_within(
        &self,
        center: Coord<f64>,
        radius_m: f64,
    ) -> Result<Vec<RawFeature>, SpatialSourceError> {
        (**self).features_within(center, radius_m)
    }
}

impl<T: SpatialSource + ?Sized> SpatialSource for Box<T> {
    fn features_within(
        &self,
        center: Coord<f64>,
        radius_m: f64,
    ) -> Result<Vec<RawFeature>, SpatialSourceError> {
        (**self).features_within(center, radius_m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PoiKind;
    use rstest::rstest;

    fn tags() -> Tags {
        Tags::from([("amenity".into(), "cafe".into())])
    }

    #[rstest]
    #[case(RawFeature::Node { id: 1, location: Coord { x: 0.0, y: 0.0 }, tags: Tags::new() })]
    #[case(RawFeature::Way { id: 2, vertices: vec![Some(Coord { x: 0.0, y: 0.0 })], tags: Tags::new() })]
    #[case(RawFeature::Way { id: 3, vertices: Vec::new(), tags: tags() })]
    #[case(RawFeature::Relation { id: 4, tags: Tags::new() })]
    fn unusable_features_are_dropped(#[case] feature: RawFeature) {
        assert!(feature.into_poi().is_none());
    }

    #[rstest]
    fn tagged_relation_is_kept_without_geometry() {
        let poi = RawFeature::Relation { id: 9, tags: tags() }
            .into_poi()
            .expect("tagged relation survives");
        assert_eq!(poi.kind, PoiKind::Relation);
        assert!(poi.location().is_none());
    }

    #[rstest]
    fn way_keeps_only_resolved_vertices() {
        let a = Coord { x: 0.0, y: 0.0 };
        let b = Coord { x: 2.0, y: 0.0 };
        let poi = RawFeature::Way {
            id: 5,
            vertices: vec![Some(a), None, Some(b)],
            tags: tags(),
        }
        .into_poi()
        .expect("way with vertices survives");
        assert_eq!(poi.geometry, crate::PoiGeometry::Path(vec![a, b]));
    }
}
