// src/countries.rs
//! Country reference and the free-text country resolver.
//!
//! The catalog is loaded once per run and then only read. Its order is the
//! order of the source file, and that order decides ties in `resolve`.

use std::fs;
use std::path::Path;

use crate::dataset::Record;
use crate::error::{Error, Result};
use crate::geojson::FeatureCollection;
use crate::model::Point;

#[derive(Clone, Debug, PartialEq)]
pub struct CountryRef {
    pub short_name: String,
    pub long_name: String,
    pub iso_a2: String,
    pub iso_a3: String,
    pub centroid: Option<Point>,
}

impl CountryRef {
    /// Does `text` mention this country as a space-prefixed long name,
    /// ISO-3 or ISO-2 token?
    fn mentioned_in(&self, text: &str) -> bool {
        [&self.long_name, &self.iso_a3, &self.iso_a2]
            .into_iter()
            .filter(|token| !token.is_empty())
            .any(|token| text.contains(&join!(" ", token.as_str())))
    }
}

#[derive(Clone, Debug, Default)]
pub struct CountryCatalog {
    entries: Vec<CountryRef>,
}

impl CountryCatalog {
    pub fn new(entries: Vec<CountryRef>) -> Self { Self { entries } }

    /// Load from a GeoJSON file with `name`, `name_long`, `iso_a2`, `iso_a3`
    /// properties (any case). Features without a long name are skipped.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let fc: FeatureCollection = serde_json::from_str(&text)
            .map_err(|source| Error::Json { path: path.to_path_buf(), source })?;

        let mut entries = Vec::with_capacity(fc.features.len());
        for (i, f) in fc.features.iter().enumerate() {
            let Some(long_name) = f.prop("name_long").or_else(|| f.prop("name")) else {
                logw!("{}: feature {i} has no name, skipped", path.display());
                continue;
            };
            entries.push(CountryRef {
                short_name: f.prop("name").unwrap_or_else(|| long_name.clone()),
                long_name,
                iso_a2: f.prop("iso_a2").unwrap_or_default(),
                iso_a3: f.prop("iso_a3").unwrap_or_default(),
                centroid: f.point(),
            });
        }
        logd!("Loaded {} countries from {}", entries.len(), path.display());
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CountryRef] { &self.entries }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Map a free-text location to a lower-cased ISO-2 code.
    ///
    /// First entry (in catalog order) whose long name, ISO-3 or ISO-2 appears
    /// space-prefixed in `text` wins. This is a substring test: a two-letter
    /// code can match an unrelated word fragment (" PEI" contains " PE"), and
    /// an earlier entry beats a better later one. `None` when nothing matches,
    /// or when the matching entry has no ISO-2 code.
    pub fn resolve(&self, text: &str) -> Option<String> {
        self.entries
            .iter()
            .find(|c| c.mentioned_in(text))
            .map(|c| c.iso_a2.to_lowercase())
            .filter(|code| !code.is_empty())
    }

    /// Exact name lookup (long name first, then short name), ignoring case.
    pub fn by_name(&self, name: &str) -> Option<&CountryRef> {
        let name = name.trim();
        self.entries
            .iter()
            .find(|c| c.long_name.eq_ignore_ascii_case(name))
            .or_else(|| self.entries.iter().find(|c| c.short_name.eq_ignore_ascii_case(name)))
    }

    pub fn by_iso_a2(&self, code: &str) -> Option<&CountryRef> {
        let code = code.trim();
        self.entries.iter().find(|c| c.iso_a2.eq_ignore_ascii_case(code))
    }
}

impl Record for CountryRef {
    const HEADERS: &'static [&'static str] = &["name", "name_long", "iso_a2", "iso_a3"];

    fn cells(&self) -> Vec<Option<String>> {
        vec![
            Some(self.short_name.clone()),
            Some(self.long_name.clone()),
            Some(self.iso_a2.clone()),
            Some(self.iso_a3.clone()),
        ]
    }

    fn point(&self) -> Option<Point> { self.centroid }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn country(long: &str, a2: &str, a3: &str) -> CountryRef {
        CountryRef {
            short_name: s!(long),
            long_name: s!(long),
            iso_a2: s!(a2),
            iso_a3: s!(a3),
            centroid: None,
        }
    }

    pub(crate) fn sample() -> CountryCatalog {
        CountryCatalog::new(vec![
            country("Canada", "CA", "CAN"),
            country("Peru", "PE", "PER"),
            country("Chile", "CL", "CHL"),
        ])
    }

    #[test]
    fn resolves_long_name_and_codes() {
        let c = sample();
        assert_eq!(c.resolve("10km N of Lima, Peru").as_deref(), Some("pe"));
        assert_eq!(c.resolve("Atacama, CHL").as_deref(), Some("cl"));
        assert_eq!(c.resolve("Yukon, CA").as_deref(), Some("ca"));
    }

    #[test]
    fn token_must_be_space_prefixed() {
        let c = sample();
        assert_eq!(c.resolve("Peru"), None);
        assert_eq!(c.resolve("Superuvian lands"), None);
    }

    #[test]
    fn no_match_is_none() {
        assert_eq!(sample().resolve("somewhere, Atlantis"), None);
        assert_eq!(CountryCatalog::default().resolve(" Peru"), None);
    }

    #[test]
    fn first_entry_in_catalog_order_wins() {
        // Mentions both; Canada comes first in the catalog.
        let c = sample();
        assert_eq!(c.resolve("border of Peru and Canada").as_deref(), Some("ca"));

        let reversed = CountryCatalog::new(sample().entries().iter().rev().cloned().collect());
        assert_eq!(reversed.resolve("border of Peru and Canada").as_deref(), Some("pe"));
    }

    #[test]
    fn two_letter_codes_collide_with_word_fragments() {
        // Known imprecision: " PE" is a prefix of " PEI".
        assert_eq!(sample().resolve("Charlottetown, PEI").as_deref(), Some("pe"));
    }

    #[test]
    fn resolve_is_deterministic() {
        let c = sample();
        let once = c.resolve("Santiago, Chile");
        for _ in 0..5 {
            assert_eq!(c.resolve("Santiago, Chile"), once);
        }
    }

    #[test]
    fn entry_without_iso2_resolves_to_none() {
        let c = CountryCatalog::new(vec![country("Kosovo", "", ""), country("Serbia", "RS", "SRB")]);
        assert_eq!(c.resolve("Pristina, Kosovo"), None);
        assert_eq!(c.resolve("anything at all"), None);
        // The code-less entry still wins the match; it does not fall through.
        assert_eq!(c.resolve("between Kosovo and Serbia"), None);
        assert_eq!(c.resolve("Belgrade, Serbia").as_deref(), Some("rs"));
    }

    #[test]
    fn name_lookup_prefers_long_name() {
        let mut laos = country("Lao PDR", "LA", "LAO");
        laos.short_name = s!("Laos");
        let c = CountryCatalog::new(vec![laos]);
        assert_eq!(c.by_name("lao pdr").map(|r| r.iso_a2.as_str()), Some("LA"));
        assert_eq!(c.by_name("Laos").map(|r| r.iso_a2.as_str()), Some("LA"));
        assert!(c.by_iso_a2("la").is_some());
    }

    #[test]
    fn loads_geojson_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("countries.geojson");
        fs::write(&path, r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"NAME":"Laos","NAME_LONG":"Lao PDR","ISO_A2":"LA","ISO_A3":"LAO"},
             "geometry":{"type":"Point","coordinates":[102.5,19.9]}},
            {"type":"Feature","properties":{"NAME":"Peru","NAME_LONG":"Peru","ISO_A2":"PE","ISO_A3":"PER"},"geometry":null},
            {"type":"Feature","properties":{"ISO_A2":"XX"},"geometry":null}
        ]}"#).unwrap();

        let c = CountryCatalog::load(&path).unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(c.entries()[0].short_name, "Laos");
        assert_eq!(c.entries()[0].centroid, Some(Point::new(19.9, 102.5)));
        assert_eq!(c.entries()[1].centroid, None);
    }
}
