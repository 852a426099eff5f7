// src/reconcile.rs
//! Joins and table shaping.
//!
//! Firm records from different pages share no identifier; the firm's display
//! name is the only join key. Two firms with the same display name cannot be
//! told apart and are merged. `JoinKey` is the hook for a stronger key.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::Hash;

use crate::countries::CountryCatalog;
use crate::dataset::Record;
use crate::model::{ExhibitorRecord, GeocodedAddress, Point, ProjectRecord, TaxonomyLink, split_booths};

/// Keep the first of each equal item, in order.
pub fn dedup_preserving<T: Eq + Hash + Clone>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::with_capacity(items.len());
    items.into_iter().filter(|x| seen.insert(x.clone())).collect()
}

/* ---------------- Firms and booths ---------------- */

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FirmRow {
    pub name: String,
    pub website: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BoothRow {
    pub name: String,
    pub website: Option<String>,
    pub booth: Option<String>,
}

impl Record for BoothRow {
    const HEADERS: &'static [&'static str] = &["name", "booth"];
    fn cells(&self) -> Vec<Option<String>> {
        vec![Some(self.name.clone()), self.booth.clone()]
    }
}

pub fn firms(records: &[ExhibitorRecord]) -> Vec<FirmRow> {
    dedup_preserving(
        records
            .iter()
            .map(|r| FirmRow { name: r.name.clone(), website: r.website.clone() })
            .collect(),
    )
}

/// One row per booth token; the rest of the firm is copied onto each.
/// A firm without a booth keeps one row with a null booth.
pub fn explode_booths(records: &[ExhibitorRecord]) -> Vec<BoothRow> {
    let mut out = Vec::with_capacity(records.len());
    for r in records {
        let tokens = split_booths(r.booth.as_deref());
        if tokens.is_empty() {
            out.push(BoothRow { name: r.name.clone(), website: r.website.clone(), booth: None });
        }
        for t in tokens {
            out.push(BoothRow { name: r.name.clone(), website: r.website.clone(), booth: Some(t) });
        }
    }
    dedup_preserving(out)
}

/* ---------------- Taxonomy ---------------- */

/// `(firm, category value)` relation row.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TaxonomyRow {
    pub name: String,
    pub value: String,
}

impl Record for TaxonomyRow {
    const HEADERS: &'static [&'static str] = &["name", "value"];
    fn cells(&self) -> Vec<Option<String>> {
        vec![Some(self.name.clone()), Some(self.value.clone())]
    }
}

/// Value table row: the value and how many distinct firms are listed under it.
impl Record for TaxonomyLink {
    const HEADERS: &'static [&'static str] = &["value", "firms"];
    fn cells(&self) -> Vec<Option<String>> {
        vec![Some(self.category_value.clone()), Some(self.member_firm_names.len().to_string())]
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Taxonomy {
    /// Distinct values, first-seen order.
    pub values: Vec<String>,
    /// Firm ↔ value rows, page order.
    pub relation: Vec<TaxonomyRow>,
}

impl Taxonomy {
    pub fn from_rows(relation: Vec<TaxonomyRow>) -> Self {
        let values = dedup_preserving(relation.iter().map(|r| r.value.clone()).collect());
        Self { values, relation }
    }

    /// One node per value, first-seen order, with every firm listed under it.
    pub fn links(&self) -> Vec<TaxonomyLink> {
        let mut members: HashMap<&str, BTreeSet<String>> = HashMap::new();
        for r in &self.relation {
            members.entry(r.value.as_str()).or_default().insert(r.name.clone());
        }
        self.values
            .iter()
            .map(|v| TaxonomyLink {
                category_value: v.clone(),
                member_firm_names: members.remove(v.as_str()).unwrap_or_default(),
            })
            .collect()
    }
}

/// Flatten the category value carried by each record. Records without one
/// are left out.
pub fn flatten_taxonomy(records: &[ExhibitorRecord]) -> Taxonomy {
    let relation = records
        .iter()
        .filter_map(|r| {
            let value = r.category_value.as_deref()?.trim();
            (!value.is_empty()).then(|| TaxonomyRow { name: r.name.clone(), value: s!(value) })
        })
        .collect();
    Taxonomy::from_rows(relation)
}

/* ---------------- Country taxonomy ---------------- */

/// Directory spellings → reference spellings.
pub const COUNTRY_FIXES: &[(&str, &str)] = &[
    ("Cote D'ivoire", "Côte d'Ivoire"),
    ("Bosnia And Herzegowina", "Bosnia and Herzegovina"),
    ("Laos", "Lao PDR"),
    ("Viet Nam", "Vietnam"),
    ("Congo, Democratic Republic Of", "Democratic Republic of the Congo"),
    ("Myanmar (Burma)", "Myanmar"),
    ("Tanzania, United Republic Of", "Tanzania"),
];

/// Values that name no single country.
pub const COUNTRY_SENTINELS: &[&str] = &["NULL", "Africa", "West Africa"];

pub fn clean_country_name(value: &str) -> String {
    let value = value.trim();
    COUNTRY_FIXES
        .iter()
        .find(|(from, _)| *from == value)
        .map(|(_, to)| s!(*to))
        .unwrap_or_else(|| s!(value))
}

/// Apply the spelling fixes and drop sentinel rows.
pub fn clean_countries(taxonomy: Taxonomy) -> Taxonomy {
    let relation = taxonomy
        .relation
        .into_iter()
        .map(|r| TaxonomyRow { value: clean_country_name(&r.value), ..r })
        .filter(|r| !COUNTRY_SENTINELS.contains(&r.value.as_str()))
        .collect();
    Taxonomy::from_rows(relation)
}

/// A taxonomy country matched to the reference.
#[derive(Clone, Debug, PartialEq)]
pub struct TaxonomyCountry {
    pub value: String,
    pub iso_a2: Option<String>,
    pub iso_a3: Option<String>,
    pub point: Option<Point>,
}

impl Record for TaxonomyCountry {
    const HEADERS: &'static [&'static str] = &["country", "iso_a2", "iso_a3"];
    fn cells(&self) -> Vec<Option<String>> {
        vec![Some(self.value.clone()), self.iso_a2.clone(), self.iso_a3.clone()]
    }
    fn point(&self) -> Option<Point> { self.point }
}

pub fn resolve_taxonomy_countries(values: &[String], countries: &CountryCatalog) -> Vec<TaxonomyCountry> {
    values
        .iter()
        .map(|v| match countries.by_name(v) {
            Some(c) => TaxonomyCountry {
                value: v.clone(),
                iso_a2: Some(c.iso_a2.clone()),
                iso_a3: Some(c.iso_a3.clone()),
                point: c.centroid,
            },
            None => {
                logd!("Country `{v}` not in reference");
                TaxonomyCountry { value: v.clone(), iso_a2: None, iso_a3: None, point: None }
            }
        })
        .collect()
}

/* ---------------- Address join ---------------- */

/// Which side's unmatched rows survive the join.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JoinHow {
    /// Every scraped firm, address or not.
    #[default]
    Right,
    /// Every address-book row, scraped or not.
    Left,
    /// Only firms present on both sides.
    Inner,
    /// Everything: left-join rows, then scraped firms with no address.
    Outer,
}

/// Join key for firms against the address book.
pub trait JoinKey {
    fn firm_key(&self, firm: &FirmRow) -> String;
    fn address_key(&self, address: &GeocodedAddress) -> String;
}

/// Exact display name.
#[derive(Clone, Copy, Debug, Default)]
pub struct ByName;

impl JoinKey for ByName {
    fn firm_key(&self, firm: &FirmRow) -> String { firm.name.clone() }
    fn address_key(&self, address: &GeocodedAddress) -> String { address.entry.firm_name.clone() }
}

/// Display name, ignoring case and whitespace runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct ByNormalizedName;

impl ByNormalizedName {
    fn norm(s: &str) -> String {
        s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
    }
}

impl JoinKey for ByNormalizedName {
    fn firm_key(&self, firm: &FirmRow) -> String { Self::norm(&firm.name) }
    fn address_key(&self, address: &GeocodedAddress) -> String { Self::norm(&address.entry.firm_name) }
}

/// A firm with whatever address and location the address book had for it.
#[derive(Clone, Debug, PartialEq)]
pub struct FirmLocation {
    pub name: String,
    pub website: Option<String>,
    pub address: Option<String>,
    pub country: Option<String>,
    pub point: Option<Point>,
}

impl Record for FirmLocation {
    const HEADERS: &'static [&'static str] = &["name", "add", "country", "website"];
    fn cells(&self) -> Vec<Option<String>> {
        vec![Some(self.name.clone()), self.address.clone(), self.country.clone(), self.website.clone()]
    }
    fn point(&self) -> Option<Point> { self.point }
}

fn located(firm: Option<&FirmRow>, addr: Option<&GeocodedAddress>) -> FirmLocation {
    let name = firm
        .map(|f| f.name.clone())
        .or_else(|| addr.map(|a| a.entry.firm_name.clone()))
        .unwrap_or_default();
    FirmLocation {
        name,
        website: firm.and_then(|f| f.website.clone()),
        address: addr.map(|a| a.entry.raw_address.clone()),
        country: addr.and_then(|a| a.entry.country_hint.clone()),
        point: addr.and_then(|a| a.point),
    }
}

pub fn join_addresses(
    addresses: &[GeocodedAddress],
    firms: &[FirmRow],
    how: JoinHow,
    key: &dyn JoinKey,
) -> Vec<FirmLocation> {
    let mut by_key: HashMap<String, Vec<&GeocodedAddress>> = HashMap::new();
    for a in addresses {
        by_key.entry(key.address_key(a)).or_default().push(a);
    }
    let mut firms_by_key: HashMap<String, Vec<&FirmRow>> = HashMap::new();
    for f in firms {
        firms_by_key.entry(key.firm_key(f)).or_default().push(f);
    }

    let right = |out: &mut Vec<FirmLocation>, keep_unmatched: bool| {
        for f in firms {
            match by_key.get(&key.firm_key(f)) {
                Some(found) => out.extend(found.iter().map(|a| located(Some(f), Some(a)))),
                None if keep_unmatched => out.push(located(Some(f), None)),
                None => {}
            }
        }
    };
    let left = |out: &mut Vec<FirmLocation>, keep_unmatched: bool| {
        for a in addresses {
            match firms_by_key.get(&key.address_key(a)) {
                Some(found) => out.extend(found.iter().map(|f| located(Some(f), Some(a)))),
                None if keep_unmatched => out.push(located(None, Some(a))),
                None => {}
            }
        }
    };

    let mut out = Vec::new();
    match how {
        JoinHow::Right => right(&mut out, true),
        JoinHow::Left => left(&mut out, true),
        JoinHow::Inner => left(&mut out, false),
        JoinHow::Outer => {
            left(&mut out, true);
            out.extend(
                firms
                    .iter()
                    .filter(|f| !by_key.contains_key(&key.firm_key(f)))
                    .map(|f| located(Some(f), None)),
            );
        }
    }
    out
}

/* ---------------- Projects ---------------- */

/// Core-shack project with its geocoded location.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectLocation {
    pub project: ProjectRecord,
    pub point: Option<Point>,
}

impl Record for ProjectLocation {
    const HEADERS: &'static [&'static str] = &["proj", "loc", "country", "name"];
    fn cells(&self) -> Vec<Option<String>> {
        let p = &self.project;
        vec![
            Some(p.project_name.clone()),
            Some(p.raw_location.clone()),
            p.resolved_country.clone(),
            Some(p.firm_name.clone()),
        ]
    }
    fn point(&self) -> Option<Point> { self.point }
}
