//! Resolve free-text addresses into coordinates.
//!
//! The [`Geocoder`] trait abstracts a single lookup against a geocoding
//! service. [`GeocodingResolver`] drives it over the candidate variants of an
//! address and classifies the outcome as a [`ResolveError`].

mod error;
mod resolver;

use geo::Coord;

pub use error::{GeocoderError, ResolveError};
pub use resolver::GeocodingResolver;

/// Language and country restriction sent with every lookup.
///
/// # Examples
/// ```
/// use sitescore_core::GeocodeLocale;
///
/// let locale = GeocodeLocale::default();
/// assert_eq!(locale.language, "ru");
/// assert_eq!(locale.country_codes_param(), "ru");
///
/// let locale = GeocodeLocale::new("en", ["gb", "ie"]);
/// assert_eq!(locale.country_codes_param(), "gb,ie");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeocodeLocale {
    /// Preferred response language (`accept-language`).
    pub language: String,
    /// ISO 3166-1 alpha-2 codes restricting the search.
    pub country_codes: Vec<String>,
}

impl GeocodeLocale {
    /// Create a locale from a language tag and country codes.
    #[must_use]
    pub fn new<I, S>(language: impl Into<String>, country_codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            language: language.into(),
            country_codes: country_codes.into_iter().map(Into::into).collect(),
        }
    }

    /// Country codes joined with commas, as query parameters expect them.
    #[must_use]
    pub fn country_codes_param(&self) -> String {
        self.country_codes.join(",")
    }
}

impl Default for GeocodeLocale {
    fn default() -> Self {
        Self::new("ru", ["ru"])
    }
}

/// One lookup issued by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeocodeQuery<'a> {
    /// Address variant to search for.
    pub text: &'a str,
    /// Locale context shared by every lookup of a resolver.
    pub locale: &'a GeocodeLocale,
}

/// Look up a single address string.
///
/// Implementations return `Ok(None)` when the service answered but found
/// nothing, and an error only when the service itself could not be used.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use sitescore_core::{GeocodeLocale, GeocodeQuery, Geocoder, GeocoderError};
///
/// struct Fixed;
///
/// impl Geocoder for Fixed {
///     fn geocode(&self, query: &GeocodeQuery<'_>) -> Result<Option<Coord<f64>>, GeocoderError> {
///         Ok(query.text.starts_with("Москва").then_some(Coord { x: 37.62, y: 55.75 }))
///     }
/// }
///
/// let locale = GeocodeLocale::default();
/// let hit = Fixed.geocode(&GeocodeQuery { text: "Москва, Тверская", locale: &locale })?;
/// assert!(hit.is_some());
/// # Ok::<(), GeocoderError>(())
/// ```
pub trait Geocoder {
    /// Return the coordinates of the best match for `query`, if any.
    fn geocode(&self, query: &GeocodeQuery<'_>) -> Result<Option<Coord<f64>>, GeocoderError>;
}

impl<T: Geocoder + ?Sized> Geocoder for &T {
    fn geocode(&self, query: &GeocodeQuery<'_>) -> Result<Option<Coord<f64>>, GeocoderError> {
        (**self).geocode(query)
    }
}

impl<T: Geocoder + ?Sized> Geocoder for Box<T> {
    fn geocode(&self, query: &GeocodeQuery<'_>) -> Result<Option<Coord<f64>>, GeocoderError> {
        (**self).geocode(query)
    }
}
