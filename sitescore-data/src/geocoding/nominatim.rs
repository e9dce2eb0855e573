//! Nominatim `/search` response types for `format=jsonv2`.
//!
//! See: <https://nominatim.org/release-docs/latest/api/Search/>

use geo::Coord;
use serde::Deserialize;

/// One search hit. Nominatim encodes coordinates as decimal strings.
#[derive(Debug, Deserialize)]
pub struct SearchResult {
    /// Latitude in decimal degrees.
    pub lat: String,
    /// Longitude in decimal degrees.
    pub lon: String,
    /// Full address of the hit.
    #[serde(default)]
    pub display_name: Option<String>,
}

impl SearchResult {
    /// Parse the coordinate strings into a `Coord` (`x = lon`, `y = lat`).
    pub fn coord(&self) -> Result<Coord<f64>, String> {
        let lat = parse_degrees(&self.lat, "lat")?;
        let lon = parse_degrees(&self.lon, "lon")?;
        Ok(Coord { x: lon, y: lat })
    }
}

fn parse_degrees(raw: &str, field: &str) -> Result<f64, String> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| format!("invalid {field} value {raw:?}"))
}
