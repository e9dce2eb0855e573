//! Priority-based classification of points of interest.
//!
//! A feature is labelled `"<key>=<value>"` using the first key of
//! [`CLASSIFICATION_KEYS`] present in its tags. Features carrying none of the
//! keys fall into [`OTHER_LABEL`]. The key order is policy: a bakery inside a
//! building is a `shop=bakery`, never a `building=yes`.

use crate::poi::{PointOfInterest, Tags};

/// Tag keys consulted when labelling a feature, highest priority first.
pub const CLASSIFICATION_KEYS: [&str; 8] = [
    "amenity",
    "shop",
    "building",
    "highway",
    "leisure",
    "tourism",
    "public_transport",
    "office",
];

/// Label assigned to features without any classifying key.
pub const OTHER_LABEL: &str = "other";

/// Return the classification label for a tag map.
///
/// # Examples
/// ```
/// use sitescore_core::{Tags, classification_label};
///
/// let tags = Tags::from([
///     ("shop".into(), "bakery".into()),
///     ("building".into(), "yes".into()),
/// ]);
/// assert_eq!(classification_label(&tags), "shop=bakery");
/// assert_eq!(classification_label(&Tags::new()), "other");
/// ```
#[must_use]
pub fn classification_label(tags: &Tags) -> String {
    CLASSIFICATION_KEYS
        .iter()
        .find_map(|key| tags.get(*key).map(|value| format!("{key}={value}")))
        .unwrap_or_else(|| OTHER_LABEL.to_owned())
}

/// Features sharing one classification label.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoiGroup {
    /// Label shared by every member of the group.
    pub label: String,
    /// Features in acquisition order.
    pub pois: Vec<PointOfInterest>,
}

/// Features grouped by classification label.
///
/// Groups iterate in the order their label was first seen, not sorted.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use sitescore_core::{PoiGroups, PointOfInterest, Tags};
///
/// let origin = Coord { x: 0.0, y: 0.0 };
/// let groups = PoiGroups::from_pois([
///     PointOfInterest::point(1, origin, Tags::from([("amenity".into(), "cafe".into())])),
///     PointOfInterest::point(2, origin, Tags::from([("shop".into(), "books".into())])),
///     PointOfInterest::point(3, origin, Tags::from([("amenity".into(), "cafe".into())])),
/// ]);
///
/// let labels: Vec<_> = groups.labels().collect();
/// assert_eq!(labels, ["amenity=cafe", "shop=books"]);
/// assert_eq!(groups.get("amenity=cafe").map(<[_]>::len), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct PoiGroups {
    groups: Vec<PoiGroup>,
}

impl PoiGroups {
    /// Construct an empty grouping.
    #[must_use]
    pub const fn new() -> Self {
        Self { groups: Vec::new() }
    }

    /// Group features by label, discarding untagged ones.
    pub fn from_pois<I>(pois: I) -> Self
    where
        I: IntoIterator<Item = PointOfInterest>,
    {
        let mut groups = Self::new();
        for poi in pois.into_iter().filter(PointOfInterest::is_tagged) {
            groups.insert(poi);
        }
        groups
    }

    fn insert(&mut self, poi: PointOfInterest) {
        let label = classification_label(&poi.tags);
        match self.groups.iter_mut().find(|group| group.label == label) {
            Some(group) => group.pois.push(poi),
            None => self.groups.push(PoiGroup {
                label,
                pois: vec![poi],
            }),
        }
    }

    /// Return the features filed under `label`.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<&[PointOfInterest]> {
        self.groups
            .iter()
            .find(|group| group.label == label)
            .map(|group| group.pois.as_slice())
    }

    /// Iterate over labels in first-seen order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.label.as_str())
    }

    /// Iterate over groups in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &PoiGroup> {
        self.groups.iter()
    }

    /// Number of distinct labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Report whether no group is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of grouped features.
    #[must_use]
    pub fn poi_count(&self) -> usize {
        self.groups.iter().map(|group| group.pois.len()).sum()
    }

    /// Count features in groups whose label starts with any of `prefixes`.
    ///
    /// Each group is counted at most once even when several prefixes match.
    #[must_use]
    pub fn count_with_prefixes(&self, prefixes: &[&str]) -> usize {
        self.groups
            .iter()
            .filter(|group| prefixes.iter().any(|prefix| group.label.starts_with(prefix)))
            .map(|group| group.pois.len())
            .sum()
    }
}

impl<'a> IntoIterator for &'a PoiGroups {
    type Item = &'a PoiGroup;
    type IntoIter = std::slice::Iter<'a, PoiGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}
