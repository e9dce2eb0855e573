//! Spatial features discovered around a candidate site.

use std::collections::HashMap;

use geo::{Centroid, Coord, LineString};

/// OpenStreetMap-style key/value tags.
pub type Tags = HashMap<String, String>;

/// Source element type of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum PoiKind {
    /// A single tagged coordinate.
    Point,
    /// An ordered chain of vertices (building outlines, roads, parks).
    Way,
    /// A grouping of other elements; carries no geometry here.
    Relation,
}

/// Geometry attached to a [`PointOfInterest`].
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum PoiGeometry {
    /// Location of a point feature.
    Point(Coord<f64>),
    /// Resolved vertices of a way, in source order.
    Path(Vec<Coord<f64>>),
    /// Relations are kept without geometry.
    None,
}

/// A tagged feature near a candidate site.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use sitescore_core::{PoiKind, PointOfInterest, Tags};
///
/// let poi = PointOfInterest::point(
///     7,
///     Coord { x: 37.61, y: 55.75 },
///     Tags::from([("amenity".into(), "cafe".into())]),
/// );
///
/// assert_eq!(poi.kind, PoiKind::Point);
/// assert_eq!(poi.location(), Some(Coord { x: 37.61, y: 55.75 }));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointOfInterest {
    pub kind: PoiKind,
    pub id: u64,
    pub geometry: PoiGeometry,
    pub tags: Tags,
}

impl PointOfInterest {
    /// Construct a point feature.
    #[must_use]
    pub const fn point(id: u64, location: Coord<f64>, tags: Tags) -> Self {
        Self {
            kind: PoiKind::Point,
            id,
            geometry: PoiGeometry::Point(location),
            tags,
        }
    }

    /// Construct a way feature from its resolved vertices.
    #[must_use]
    pub const fn way(id: u64, vertices: Vec<Coord<f64>>, tags: Tags) -> Self {
        Self {
            kind: PoiKind::Way,
            id,
            geometry: PoiGeometry::Path(vertices),
            tags,
        }
    }

    /// Construct a relation feature.
    #[must_use]
    pub const fn relation(id: u64, tags: Tags) -> Self {
        Self {
            kind: PoiKind::Relation,
            id,
            geometry: PoiGeometry::None,
            tags,
        }
    }

    /// Report whether the feature carries any tags.
    #[must_use]
    pub fn is_tagged(&self) -> bool {
        !self.tags.is_empty()
    }

    /// Return a representative coordinate for the feature.
    ///
    /// Points return their own coordinate and ways the centroid of their
    /// vertices. Relations and empty ways have no location.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use sitescore_core::{PointOfInterest, Tags};
    ///
    /// let way = PointOfInterest::way(
    ///     1,
    ///     vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 2.0, y: 0.0 }],
    ///     Tags::from([("highway".into(), "footway".into())]),
    /// );
    /// assert_eq!(way.location(), Some(Coord { x: 1.0, y: 0.0 }));
    /// ```
    #[must_use]
    pub fn location(&self) -> Option<Coord<f64>> {
        match &self.geometry {
            PoiGeometry::Point(coord) => Some(*coord),
            PoiGeometry::Path(vertices) => match vertices.as_slice() {
                [] => None,
                [only] => Some(*only),
                _ => LineString::from(vertices.clone())
                    .centroid()
                    .map(|centroid| centroid.0),
            },
            PoiGeometry::None => None,
        }
    }
}
