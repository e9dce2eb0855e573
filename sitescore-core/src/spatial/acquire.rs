//! Radius queries and grouping of the surviving features.

use geo::Coord;
use log::debug;

use crate::{LocationRecord, PoiGroups, PointOfInterest};

use super::{AcquireError, RawFeature, SpatialSource};

/// Fetch nearby features through a [`SpatialSource`] and group them.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use sitescore_core::{
///     LocationRecord, PoiAcquirer, RawFeature, SpatialSource, SpatialSourceError, Tags,
/// };
///
/// struct OneCafe;
///
/// impl SpatialSource for OneCafe {
///     fn features_within(
///         &self,
///         center: Coord<f64>,
///         _radius_m: f64,
///     ) -> Result<Vec<RawFeature>, SpatialSourceError> {
///         Ok(vec![RawFeature::Node {
///             id: 1,
///             location: center,
///             tags: Tags::from([("amenity".into(), "cafe".into())]),
///         }])
///     }
/// }
///
/// let acquirer = PoiAcquirer::new(OneCafe);
///
/// let mut record = LocationRecord::new("a").with_coords(Coord { x: 37.61, y: 55.76 });
/// let groups = acquirer.acquire(&mut record, 500.0)?;
/// assert_eq!(groups.get("amenity=cafe").map(<[_]>::len), Some(1));
/// # Ok::<(), sitescore_core::AcquireError>(())
/// ```
#[derive(Debug)]
pub struct PoiAcquirer<S> {
    source: S,
}

impl<S: SpatialSource> PoiAcquirer<S> {
    /// Wrap a spatial source.
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// Borrow the underlying source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Query features within `radius_m` metres of `coords`.
    ///
    /// Untagged features and ways without a resolvable vertex are dropped.
    ///
    /// # Errors
    ///
    /// - [`AcquireError::MissingCoordinates`] when `coords` is `None`.
    /// - [`AcquireError::InvalidRadius`] for a non-positive or non-finite
    ///   radius.
    /// - [`AcquireError::Throttled`] when the service rate limits.
    /// - [`AcquireError::QueryFailed`] for any other service failure.
    pub fn fetch_nearby(
        &self,
        coords: Option<Coord<f64>>,
        radius_m: f64,
    ) -> Result<Vec<PointOfInterest>, AcquireError> {
        let center = coords.ok_or(AcquireError::MissingCoordinates)?;
        if !radius_m.is_finite() || radius_m <= 0.0 {
            return Err(AcquireError::InvalidRadius { radius_m });
        }

        debug!(
            "querying features within {radius_m}m of ({}, {})",
            center.y, center.x
        );
        let raw = self.source.features_within(center, radius_m)?;
        let raw_count = raw.len();
        let pois: Vec<PointOfInterest> = raw.into_iter().filter_map(RawFeature::into_poi).collect();
        debug!("kept {} of {raw_count} features", pois.len());
        Ok(pois)
    }

    /// Fetch features around `record` and store them, grouped, on it.
    ///
    /// On failure the record's features are cleared so it carries an explicit
    /// empty grouping.
    ///
    /// # Errors
    ///
    /// As for [`PoiAcquirer::fetch_nearby`].
    pub fn acquire<'r>(
        &self,
        record: &'r mut LocationRecord,
        radius_m: f64,
    ) -> Result<&'r PoiGroups, AcquireError> {
        match self.fetch_nearby(record.coords, radius_m) {
            Ok(pois) => {
                record.set_pois(pois);
                Ok(&record.poi_groups)
            }
            Err(err) => {
                debug!("feature acquisition failed for location {}: {err}", record.id);
                record.clear_pois();
                Err(err)
            }
        }
    }
}
