// src/model.rs
//! Typed records that flow through the pipeline. Tables are built as lists of
//! these and only turned into rows at the file boundary (see `dataset`).

use std::collections::BTreeSet;
use std::fmt;

/// WGS84 coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

impl Point {
    pub fn new(lat: f64, lng: f64) -> Self { Self { lat, lng } }

    /// GeoJSON coordinate order.
    pub fn lng_lat(&self) -> [f64; 2] { [self.lng, self.lat] }

    pub fn wkt(&self) -> String { format!("POINT ({} {})", self.lng, self.lat) }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lng)
    }
}

/// One exhibitor item block from a listing page.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExhibitorRecord {
    pub name: String,
    /// Cleaned booth text, possibly several comma-separated booths.
    pub booth: Option<String>,
    pub website: Option<String>,
    /// Taxonomy value of the listing page the item came from.
    pub category_value: Option<String>,
}

impl ExhibitorRecord {
    /// Individual booth assignments, in page order.
    pub fn booth_tokens(&self) -> Vec<String> {
        split_booths(self.booth.as_deref())
    }
}

pub fn split_booths(booth: Option<&str>) -> Vec<String> {
    booth
        .map(|b| {
            b.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Core-shack project, sibling of the exhibitor parsed from the same item.
/// Joined back to its firm only through `firm_name`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectRecord {
    pub project_name: String,
    /// Place name with the trailing country segment removed.
    pub raw_location: String,
    /// Lower-cased ISO-2 code, when the location named a known country.
    pub resolved_country: Option<String>,
    pub firm_name: String,
}

/// Row of the local address book.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddressEntry {
    pub firm_name: String,
    pub raw_address: String,
    pub country_hint: Option<String>,
}

/// Address book row after geocoding (or loaded from the cache).
#[derive(Clone, Debug, PartialEq)]
pub struct GeocodedAddress {
    pub entry: AddressEntry,
    pub point: Option<Point>,
}

/// Outcome of one geocode lookup. `coordinate == None` is a valid result.
#[derive(Clone, Debug, PartialEq)]
pub struct GeocodeResult {
    pub query: String,
    pub country_filter: Option<String>,
    pub coordinate: Option<Point>,
}

/// One taxonomy node and the firms listed under it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaxonomyLink {
    pub category_value: String,
    pub member_firm_names: BTreeSet<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(booth: Option<&str>) -> ExhibitorRecord {
        ExhibitorRecord {
            name: s!("Acme"),
            booth: booth.map(str::to_string),
            website: None,
            category_value: None,
        }
    }

    #[test]
    fn booth_tokens_split_on_commas() {
        assert_eq!(rec(Some("123, 456A")).booth_tokens(), vec!["123", "456A"]);
        assert_eq!(rec(Some("7")).booth_tokens(), vec!["7"]);
        assert!(rec(None).booth_tokens().is_empty());
        assert_eq!(rec(Some("1,,2 ")).booth_tokens(), vec!["1", "2"]);
    }

    #[test]
    fn wkt_is_lng_first() {
        assert_eq!(Point::new(-12.05, -77.04).wkt(), "POINT (-77.04 -12.05)");
    }
}
