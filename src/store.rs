// src/store.rs
//! Local address book (`addresses.csv`), its geocoded cache
//! (`addresses.geojson`), and the booth floor plan (`booths.geojson`).
//!
//! Geocoding the whole book is slow and costs provider quota, so it only
//! happens on request; every other run reads the cache back.

use std::fs;
use std::path::Path;

use crate::core::sanitize::normalize_ws;
use crate::csv::HeadedRows;
use crate::dataset::{DataSet, Record};
use crate::error::{Error, Result};
use crate::file::write_geojson;
use crate::geocode::{GeocodeResolver, Geocoder};
use crate::geojson::{FeatureCollection, to_dataset};
use crate::model::{AddressEntry, GeocodedAddress, Point};

impl Record for GeocodedAddress {
    const HEADERS: &'static [&'static str] = &["name", "add", "country"];
    fn cells(&self) -> Vec<Option<String>> {
        vec![
            Some(self.entry.firm_name.clone()),
            Some(self.entry.raw_address.clone()),
            self.entry.country_hint.clone(),
        ]
    }
    fn point(&self) -> Option<Point> { self.point }
}

/// Read `name`, `add` and (optional) `country` columns. Rows without a name
/// are skipped. Names are whitespace-collapsed like scraped titles so the
/// two sides join on the same key.
pub fn load_address_book(path: &Path) -> Result<Vec<AddressEntry>> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let table = HeadedRows::parse(&text);

    let name = table.column("name").ok_or_else(|| Error::data(path, "missing `name` column"))?;
    let add = table.column("add").ok_or_else(|| Error::data(path, "missing `add` column"))?;
    let country = table.column("country");

    let mut out = Vec::with_capacity(table.rows.len());
    for (i, row) in table.rows.iter().enumerate() {
        let Some(firm_name) = HeadedRows::cell(row, Some(name)) else {
            logd!("{}: row {} has no name, skipped", path.display(), i + 1);
            continue;
        };
        out.push(AddressEntry {
            firm_name: normalize_ws(firm_name),
            raw_address: HeadedRows::cell(row, Some(add)).map(str::to_string).unwrap_or_default(),
            country_hint: HeadedRows::cell(row, country).map(str::to_lowercase),
        });
    }
    logd!("Loaded {} addresses from {}", out.len(), path.display());
    Ok(out)
}

/// Geocode each entry on (address, country hint). A miss is a null point.
pub fn geocode_addresses<G: Geocoder>(
    entries: Vec<AddressEntry>,
    resolver: &mut GeocodeResolver<'_, G>,
) -> Result<Vec<GeocodedAddress>> {
    let mut out = Vec::with_capacity(entries.len());
    for entry in entries {
        let found = resolver.resolve(Some(&entry.raw_address), entry.country_hint.as_deref())?;
        if found.coordinate.is_none() {
            logd!("No location for {} ({})", entry.firm_name, entry.raw_address);
        }
        out.push(GeocodedAddress { entry, point: found.coordinate });
    }
    Ok(out)
}

pub fn save_address_cache(path: &Path, addresses: &[GeocodedAddress]) -> Result<()> {
    write_geojson(path, &DataSet::layer(addresses))
}

pub fn load_address_cache(path: &Path) -> Result<Vec<GeocodedAddress>> {
    if !path.exists() {
        return Err(Error::data(path, "geocoded address cache not found; run with --regeocode"));
    }
    let fc = read_collection(path)?;

    Ok(fc
        .features
        .iter()
        .filter_map(|f| {
            let entry = AddressEntry {
                firm_name: f.prop("name")?,
                raw_address: f.prop("add").unwrap_or_default(),
                country_hint: f.prop("country"),
            };
            Some(GeocodedAddress { entry, point: f.point() })
        })
        .collect())
}

fn read_collection(path: &Path) -> Result<FeatureCollection> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&text).map_err(|source| Error::Json { path: path.to_path_buf(), source })
}

/// Booth floor plan, passed through as is. `None` when the file is absent.
pub fn load_booths(path: &Path) -> Result<Option<DataSet>> {
    if !path.exists() {
        logw!("{} not found; booths table skipped", path.display());
        return Ok(None);
    }
    let ds = to_dataset(&read_collection(path)?);
    logd!("Loaded {} booths from {}", ds.len(), path.display());
    Ok(Some(ds))
}
