// src/geocode.rs
//! Geocode resolution.
//!
//! `Geocoder` is the provider boundary: free-text query plus optional ISO-2
//! filter in, candidates in relevance order out. `GeocodeResolver` adds the
//! run-level contract on top: no call for empty queries, first candidate
//! wins, zero candidates is a null coordinate, and every (query, filter)
//! pair is asked at most once per run.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::config::consts::{OPENCAGE_URL, TIMEOUT_SECS, USER_AGENT};
use crate::countries::CountryCatalog;
use crate::error::{Error, Result};
use crate::model::{GeocodeResult, Point};

pub trait Geocoder {
    fn geocode(&self, query: &str, country: Option<&str>) -> Result<Vec<Point>>;
}

impl<G: Geocoder + ?Sized> Geocoder for &G {
    fn geocode(&self, query: &str, country: Option<&str>) -> Result<Vec<Point>> {
        (**self).geocode(query, country)
    }
}

/* ---------------- OpenCage ---------------- */

pub struct OpenCage {
    client: reqwest::blocking::Client,
    key: String,
}

#[derive(Deserialize)]
struct OcResponse {
    #[serde(default)]
    results: Vec<OcResult>,
    status: Option<OcStatus>,
}

#[derive(Deserialize)]
struct OcStatus {
    code: u16,
    message: String,
}

#[derive(Deserialize)]
struct OcResult {
    geometry: OcGeometry,
}

#[derive(Deserialize)]
struct OcGeometry {
    lat: f64,
    lng: f64,
}

impl OpenCage {
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .map_err(|source| Error::Fetch { url: s!(OPENCAGE_URL), source })?;
        Ok(Self { client, key: key.into() })
    }
}

impl Geocoder for OpenCage {
    fn geocode(&self, query: &str, country: Option<&str>) -> Result<Vec<Point>> {
        let mut params = vec![("q", query), ("key", self.key.as_str()), ("no_annotations", "1")];
        if let Some(cc) = country {
            params.push(("countrycode", cc));
        }

        let fail = |message: String| Error::Geocode { query: s!(query), message };

        let resp = self
            .client
            .get(OPENCAGE_URL)
            .query(&params)
            .send()
            .map_err(|e| fail(e.to_string()))?;
        let http = resp.status();
        let body: OcResponse = resp.json().map_err(|e| fail(format!("HTTP {http}: {e}")))?;

        if let Some(st) = &body.status {
            if st.code != 200 {
                return Err(fail(format!("{} {}", st.code, st.message)));
            }
        } else if !http.is_success() {
            return Err(fail(format!("HTTP {http}")));
        }

        Ok(body.results.iter().map(|r| Point::new(r.geometry.lat, r.geometry.lng)).collect())
    }
}

/* ---------------- Resolver ---------------- */

type CacheKey = (String, Option<String>);

pub struct GeocodeResolver<'a, G: Geocoder> {
    geocoder: G,
    cache: HashMap<CacheKey, Option<Point>>,
    /// Second tier: country centroid when a filtered query finds nothing.
    centroids: Option<&'a CountryCatalog>,
    calls: usize,
}

impl<'a, G: Geocoder> GeocodeResolver<'a, G> {
    pub fn new(geocoder: G) -> Self {
        Self { geocoder, cache: HashMap::new(), centroids: None, calls: 0 }
    }

    pub fn with_centroid_fallback(mut self, countries: &'a CountryCatalog) -> Self {
        self.centroids = Some(countries);
        self
    }

    /// Provider calls made so far (cache hits excluded).
    pub fn calls(&self) -> usize { self.calls }

    pub fn resolve(&mut self, query: Option<&str>, country: Option<&str>) -> Result<GeocodeResult> {
        let query = query.map(str::trim).unwrap_or_default();
        let filter = country
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_lowercase);

        let coordinate = if query.is_empty() {
            None
        } else {
            self.lookup(query, filter.as_deref())?
        };

        Ok(GeocodeResult { query: s!(query), country_filter: filter, coordinate })
    }

    fn lookup(&mut self, query: &str, filter: Option<&str>) -> Result<Option<Point>> {
        let key: CacheKey = (s!(query), filter.map(str::to_string));
        if let Some(hit) = self.cache.get(&key) {
            logd!("Geocode cache hit: {query}");
            return Ok(*hit);
        }

        logd!("Geocoding {query}...");
        self.calls += 1;
        let mut found = self.geocoder.geocode(query, filter)?.into_iter().next();

        if found.is_none() {
            if let (Some(countries), Some(cc)) = (self.centroids, filter) {
                found = countries.by_iso_a2(cc).and_then(|c| c.centroid);
                if found.is_some() {
                    logd!("No match for {query}; using {cc} centroid");
                }
            }
        }

        self.cache.insert(key, found);
        Ok(found)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::countries::{CountryRef, CountryCatalog};

    /// Answers from a fixed table; records every call.
    #[derive(Default)]
    pub(crate) struct Scripted {
        pub answers: HashMap<(String, Option<String>), Vec<Point>>,
        pub log: RefCell<Vec<(String, Option<String>)>>,
    }

    impl Scripted {
        pub fn answer(mut self, q: &str, cc: Option<&str>, pts: Vec<Point>) -> Self {
            self.answers.insert((s!(q), cc.map(str::to_string)), pts);
            self
        }
    }

    impl Geocoder for Scripted {
        fn geocode(&self, query: &str, country: Option<&str>) -> Result<Vec<Point>> {
            let key = (s!(query), country.map(str::to_string));
            self.log.borrow_mut().push(key.clone());
            Ok(self.answers.get(&key).cloned().unwrap_or_default())
        }
    }

    struct Down;
    impl Geocoder for Down {
        fn geocode(&self, query: &str, _: Option<&str>) -> Result<Vec<Point>> {
            Err(Error::Geocode { query: s!(query), message: s!("503") })
        }
    }

    const LIMA: Point = Point { lat: -12.05, lng: -77.04 };

    #[test]
    fn first_candidate_wins() {
        let g = Scripted::default()
            .answer("Lima, Peru", Some("pe"), vec![LIMA, Point::new(0.0, 0.0)]);
        let mut r = GeocodeResolver::new(&g);
        let out = r.resolve(Some("Lima, Peru"), Some("pe")).unwrap();
        assert_eq!(out.coordinate, Some(LIMA));
        assert_eq!(out.country_filter.as_deref(), Some("pe"));
    }

    #[test]
    fn zero_candidates_is_null_not_error() {
        let g = Scripted::default();
        let mut r = GeocodeResolver::new(&g);
        let out = r.resolve(Some("Lima, Peru"), Some("pe")).unwrap();
        assert_eq!(out.coordinate, None);
    }

    #[test]
    fn empty_query_makes_no_call() {
        let g = Scripted::default();
        let mut r = GeocodeResolver::new(&g);
        assert_eq!(r.resolve(None, Some("pe")).unwrap().coordinate, None);
        assert_eq!(r.resolve(Some("   "), None).unwrap().coordinate, None);
        assert!(g.log.borrow().is_empty());
        assert_eq!(r.calls(), 0);
    }

    #[test]
    fn filter_is_passed_only_when_present() {
        let g = Scripted::default();
        let mut r = GeocodeResolver::new(&g);
        r.resolve(Some(" 1 Main St "), Some(" CA ")).unwrap();
        r.resolve(Some("1 Main St"), Some("")).unwrap();
        let log = g.log.borrow();
        assert_eq!(log[0], (s!("1 Main St"), Some(s!("ca"))));
        assert_eq!(log[1], (s!("1 Main St"), None));
    }

    #[test]
    fn repeated_queries_hit_the_cache() {
        let g = Scripted::default().answer("Toronto", None, vec![Point::new(43.7, -79.4)]);
        let mut r = GeocodeResolver::new(&g);
        for _ in 0..3 {
            assert!(r.resolve(Some("Toronto"), None).unwrap().coordinate.is_some());
            r.resolve(Some("Nowhere"), None).unwrap();
        }
        assert_eq!(g.log.borrow().len(), 2);
        assert_eq!(r.calls(), 2);
    }

    #[test]
    fn provider_errors_propagate_and_are_not_cached() {
        let mut r = GeocodeResolver::new(Down);
        assert!(r.resolve(Some("x"), None).is_err());
        assert!(r.resolve(Some("x"), None).is_err());
        assert_eq!(r.calls(), 2);
    }

    #[test]
    fn centroid_tier_is_opt_in() {
        let peru = CountryRef {
            short_name: s!("Peru"),
            long_name: s!("Peru"),
            iso_a2: s!("PE"),
            iso_a3: s!("PER"),
            centroid: Some(Point::new(-9.2, -75.0)),
        };
        let countries = CountryCatalog::new(vec![peru]);
        let g = Scripted::default();

        let mut plain = GeocodeResolver::new(&g);
        assert_eq!(plain.resolve(Some("Cerro X"), Some("pe")).unwrap().coordinate, None);

        let mut tiered = GeocodeResolver::new(&g).with_centroid_fallback(&countries);
        let out = tiered.resolve(Some("Cerro X"), Some("pe")).unwrap();
        assert_eq!(out.coordinate, Some(Point::new(-9.2, -75.0)));
        // No filter, no second tier.
        assert_eq!(tiered.resolve(Some("Cerro X"), None).unwrap().coordinate, None);
    }
}
