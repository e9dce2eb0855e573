//! Overpass interpreter response types for `[out:json]` with `out geom`.
//!
//! See: <https://wiki.openstreetmap.org/wiki/Overpass_API/Output_Formats#JSON>

use geo::Coord;
use serde::Deserialize;
use sitescore_core::{RawFeature, Tags};

/// Top-level interpreter response.
#[derive(Debug, Deserialize)]
pub struct InterpreterResponse {
    /// Matched elements.
    #[serde(default)]
    pub elements: Vec<Element>,
    /// Diagnostic set when the query failed server-side, e.g.
    /// `"runtime error: Query timed out ..."`.
    #[serde(default)]
    pub remark: Option<String>,
}

impl InterpreterResponse {
    /// Return the server-side failure message, if the remark reports one.
    pub fn runtime_error(&self) -> Option<&str> {
        self.remark
            .as_deref()
            .filter(|remark| remark.trim_start().starts_with("runtime error"))
    }

    /// Convert every recognised element into a raw feature.
    pub fn into_features(self) -> Vec<RawFeature> {
        self.elements
            .into_iter()
            .filter_map(Element::into_feature)
            .collect()
    }
}

/// Latitude/longitude pair as emitted in `geometry` arrays.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLon {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lon: f64,
}

impl From<LatLon> for Coord<f64> {
    fn from(value: LatLon) -> Self {
        Coord {
            x: value.lon,
            y: value.lat,
        }
    }
}

/// One OSM element.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    /// A point.
    Node {
        /// OSM node id.
        id: u64,
        /// Latitude.
        lat: f64,
        /// Longitude.
        lon: f64,
        /// Element tags.
        #[serde(default)]
        tags: Tags,
    },
    /// A vertex chain; vertices outside the server's geometry window are
    /// emitted as `null`.
    Way {
        /// OSM way id.
        id: u64,
        /// Inline vertex geometry.
        #[serde(default)]
        geometry: Vec<Option<LatLon>>,
        /// Element tags.
        #[serde(default)]
        tags: Tags,
    },
    /// A relation. Member geometry is ignored.
    Relation {
        /// OSM relation id.
        id: u64,
        /// Element tags.
        #[serde(default)]
        tags: Tags,
    },
    /// Areas, counts and anything else the query might return.
    #[serde(other)]
    Other,
}

impl Element {
    /// Map onto the core feature type; unrecognised elements yield `None`.
    pub fn into_feature(self) -> Option<RawFeature> {
        match self {
            Self::Node { id, lat, lon, tags } => Some(RawFeature::Node {
                id,
                location: Coord { x: lon, y: lat },
                tags,
            }),
            Self::Way { id, geometry, tags } => Some(RawFeature::Way {
                id,
                vertices: geometry.into_iter().map(|v| v.map(Coord::from)).collect(),
                tags,
            }),
            Self::Relation { id, tags } => Some(RawFeature::Relation { id, tags }),
            Self::Other => None,
        }
    }
}
