//! Test helpers: scripted services and cohort files on disk.

use std::cell::RefCell;

use camino::Utf8PathBuf;
use geo::Coord;
use sitescore_core::test_support::{StubGeocoder, StubSpatialSource};
use sitescore_core::{Geocoder, RawFeature, SpatialSource, SpatialSourceError, Tags};
use tempfile::TempDir;

use crate::CliError;
use crate::services::{GeocoderSettings, ServiceBuilder, SpatialSettings};

pub(super) const SITE: Coord<f64> = Coord { x: 37.62, y: 55.75 };

/// Service builder handing out fresh in-memory stubs.
#[derive(Debug, Default)]
pub(super) struct StubServices {
    matches: Vec<(String, Coord<f64>)>,
    features: Vec<RawFeature>,
    spatial_error: Option<SpatialSourceError>,
    geocoder_settings: RefCell<Vec<GeocoderSettings>>,
    spatial_settings: RefCell<Vec<SpatialSettings>>,
}

impl StubServices {
    /// Services whose spatial source returns one cafe and whose geocoder
    /// matches nothing.
    pub(super) fn with_cafe() -> Self {
        Self {
            features: vec![RawFeature::Node {
                id: 1,
                location: SITE,
                tags: Tags::from([("amenity".to_owned(), "cafe".to_owned())]),
            }],
            ..Self::default()
        }
    }

    pub(super) fn with_features(mut self, features: Vec<RawFeature>) -> Self {
        self.features = features;
        self
    }

    pub(super) fn with_match(mut self, query: &str, coords: Coord<f64>) -> Self {
        self.matches.push((query.to_owned(), coords));
        self
    }

    pub(super) fn with_spatial_error(mut self, error: SpatialSourceError) -> Self {
        self.spatial_error = Some(error);
        self
    }

    pub(super) fn geocoder_settings(&self) -> Vec<GeocoderSettings> {
        self.geocoder_settings.borrow().clone()
    }

    pub(super) fn spatial_settings(&self) -> Vec<SpatialSettings> {
        self.spatial_settings.borrow().clone()
    }

    pub(super) fn build_count(&self) -> usize {
        self.geocoder_settings.borrow().len() + self.spatial_settings.borrow().len()
    }
}

impl ServiceBuilder for StubServices {
    fn geocoder(&self, settings: &GeocoderSettings) -> Result<Box<dyn Geocoder>, CliError> {
        self.geocoder_settings.borrow_mut().push(settings.clone());
        let stub = self
            .matches
            .iter()
            .fold(StubGeocoder::new(), |stub, (query, coords)| {
                stub.with_match(query.clone(), *coords)
            });
        Ok(Box::new(stub))
    }

    fn spatial_source(
        &self,
        settings: &SpatialSettings,
    ) -> Result<Box<dyn SpatialSource>, CliError> {
        self.spatial_settings.borrow_mut().push(settings.clone());
        let stub = match &self.spatial_error {
            Some(error) => StubSpatialSource::with_error(error.clone()),
            None => StubSpatialSource::with_features(self.features.clone()),
        };
        Ok(Box::new(stub))
    }
}

/// A temporary directory holding cohort files.
#[derive(Debug)]
pub(super) struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub(super) fn new() -> Self {
        Self {
            dir: TempDir::new().expect("tempdir"),
        }
    }

    pub(super) fn root(&self) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.dir.path().to_path_buf()).expect("utf-8 workspace")
    }

    /// Write `contents` to `name` and return its path.
    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.root().join(name);
        std::fs::write(&path, contents).expect("write cohort file");
        path
    }
}

/// JSON for one resolved member priced over 10 square metres.
pub(super) fn resolved_member(id: &str, price: f64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "coords": {"x": SITE.x, "y": SITE.y},
        "price": price,
        "total_area": 10.0,
    })
}

/// Cohort of three resolved members priced 100, 200 and 300.
pub(super) fn priced_cohort_json() -> String {
    serde_json::Value::Array(vec![
        resolved_member("cheap", 100.0),
        resolved_member("middle", 200.0),
        resolved_member("dear", 300.0),
    ])
    .to_string()
}
