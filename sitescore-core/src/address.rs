//! Address cleaning and geocoder query variants.
//!
//! Listing sites append metro stations, districts and travel hints to the
//! postal address. Geocoders match the bare postal form far better, so the
//! normaliser strips those trailers, expands street-type abbreviations and
//! derives progressively coarser variants. The original string is always a
//! candidate, normally the last one.

use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

use regex::Regex;

/// Markers that start trailing metro or landmark hints: a subway marker, the
/// word "метро", a bullet, or an opening parenthesis.
static TRAILING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| static_regex(r"(?i)(?:\bм\.|\bметро\b|[•·]|\()"));

/// A comma-delimited segment naming a district (`р-н`, `рн` or `район`).
static DISTRICT_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| static_regex(r"(?i)[^,]*\b(?:р-?н|район)\b[^,]*"));

/// Street-type abbreviations and their expansions.
static STREET_TYPES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)\bул\.\s*", "улица "),
        (r"(?i)\bпер\.\s*", "переулок "),
        (r"(?i)\bпросп\.\s*", "проспект "),
        (r"(?i)\bпр-к?т\b\.?\s*", "проспект "),
        (r"(?i)\bнаб\.\s*", "набережная "),
        (r"(?i)\bш\.\s*", "шоссе "),
        (r"(?i)\bпл\.\s*", "площадь "),
    ]
    .into_iter()
    .map(|(pattern, expansion)| (static_regex(pattern), expansion))
    .collect()
});

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| static_regex(r"\s+"));
static COMMA_RUN: LazyLock<Regex> = LazyLock::new(|| static_regex(r"\s*,(?:\s*,)*\s*"));

fn static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid built-in pattern {pattern:?}: {err}"))
}

/// Clean an address into its canonical postal form.
///
/// # Examples
/// ```
/// use sitescore_core::address::clean_address;
///
/// assert_eq!(
///     clean_address("Москва, р-н Центральный, ул. Ленина, 5"),
///     "Москва, улица Ленина, 5",
/// );
/// assert_eq!(clean_address("Тверская ул., 7 • м. Пушкинская"), "Тверская улица, 7");
/// ```
#[must_use]
pub fn clean_address(address: &str) -> String {
    let truncated = TRAILING_MARKER
        .find(address)
        .and_then(|marker| address.get(..marker.start()))
        .unwrap_or(address);
    let without_district = DISTRICT_SEGMENT.replace_all(truncated, "");

    let mut expanded = without_district.into_owned();
    for (pattern, expansion) in STREET_TYPES.iter() {
        expanded = pattern.replace_all(&expanded, *expansion).into_owned();
    }

    let single_spaced = WHITESPACE_RUN.replace_all(&expanded, " ");
    let single_commas = COMMA_RUN.replace_all(&single_spaced, ", ");
    single_commas
        .trim_matches(|ch: char| ch == ',' || ch.is_whitespace())
        .to_owned()
}

/// Build the ordered, de-duplicated list of geocoder queries for `address`.
///
/// With at least three comma-separated parts the list holds the cleaned
/// address, the first two parts joined with the third, the first two parts
/// alone, and the original. Otherwise it holds the cleaned address and the
/// original. Empty candidates are skipped.
///
/// # Examples
/// ```
/// use sitescore_core::candidate_variants;
///
/// assert_eq!(
///     candidate_variants("Казань,  ул. Баумана"),
///     ["Казань, улица Баумана", "Казань,  ул. Баумана"],
/// );
/// ```
#[must_use]
pub fn candidate_variants(address: &str) -> Vec<String> {
    let cleaned = clean_address(address);
    let parts: Vec<&str> = cleaned
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    let mut variants = vec![cleaned.clone()];
    if let [first, second, third, ..] = parts.as_slice() {
        variants.push(format!("{first}, {second}, {third}"));
        variants.push(format!("{first}, {second}"));
    }
    variants.push(address.to_owned());

    let mut unique: Vec<String> = Vec::with_capacity(variants.len());
    for variant in variants {
        if !variant.trim().is_empty() && !unique.contains(&variant) {
            unique.push(variant);
        }
    }
    unique
}

/// Memoising wrapper around [`candidate_variants`].
///
/// Each resolver owns one normaliser, so retries for the same address reuse
/// the computed list. The cache is never shared between resolvers.
#[derive(Debug, Default)]
pub struct AddressNormalizer {
    cache: Mutex<HashMap<String, Vec<String>>>,
}

impl AddressNormalizer {
    /// Create a normaliser with an empty memo table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the candidate variants for `address`, computing them once.
    ///
    /// # Examples
    /// ```
    /// use sitescore_core::AddressNormalizer;
    ///
    /// let normalizer = AddressNormalizer::new();
    /// let first = normalizer.variants("Москва, пер. Сивцев Вражек, 3");
    /// let second = normalizer.variants("Москва, пер. Сивцев Вражек, 3");
    /// assert_eq!(first[0], "Москва, переулок Сивцев Вражек, 3");
    /// assert_eq!(first, second);
    /// assert_eq!(normalizer.cached_len(), 1);
    /// ```
    pub fn variants(&self, address: &str) -> Vec<String> {
        // A poisoned cache only loses memoisation; the result stays correct.
        let Ok(mut cache) = self.cache.lock() else {
            return candidate_variants(address);
        };
        cache
            .entry(address.to_owned())
            .or_insert_with(|| candidate_variants(address))
            .clone()
    }

    /// Number of memoised addresses.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.lock().map_or(0, |cache| cache.len())
    }
}
