//! The decoded location record.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Location captures the relevant data from a city database record.
///
/// Decoded straight from the database document; every field defaults to
/// empty so an address with no record decodes to a fully blank location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Location {
    /// City record: names keyed by locale (e.g. `"en"`, `"de"`).
    #[serde(default)]
    pub city: CityRecord,
    /// Country record.
    #[serde(default)]
    pub country: CountryRecord,
    /// Subdivisions, most specific first.
    #[serde(default)]
    pub subdivisions: Vec<SubdivisionRecord>,
}

/// City part of a location record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CityRecord {
    /// Locale-keyed city names.
    #[serde(default)]
    pub names: BTreeMap<String, String>,
}

/// Country part of a location record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CountryRecord {
    /// ISO 3166-1 alpha-2 country code (e.g. `"GB"`).
    #[serde(default)]
    pub iso_code: String,
}

/// One subdivision of a location record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SubdivisionRecord {
    /// ISO 3166-2 subdivision code (e.g. `"WLS"`).
    #[serde(default)]
    pub iso_code: String,
}

impl Location {
    /// Returns the full ISO 3166 code for the location, e.g. `GB-WLS`.
    ///
    /// With no subdivisions this is the bare country code; otherwise the
    /// country code joined to the first (most specific) subdivision code.
    pub fn full_iso(&self) -> String {
        match self.subdivisions.first() {
            // Empty location or country-only record.
            None => self.country.iso_code.clone(),
            Some(subdivision) => format!("{}-{}", self.country.iso_code, subdivision.iso_code),
        }
    }

    /// Returns the city name for a locale, or `""` when the locale is
    /// absent from the record.
    pub fn city_name(&self, locale: &str) -> &str {
        self.city
            .names
            .get(locale)
            .map(String::as_str)
            .unwrap_or_default()
    }
}
