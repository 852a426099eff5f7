// src/specs/listing.rs
//! Scraping *spec* for one exhibitor listing page.
//!
//! Every exhibitor sits in its own item block:
//! ```text
//! <div class="sfitem">
//!   <p class="sfitemTitle">Acme Mining, <strong>Rocky Creek Project:</strong> 10km N of Lima, Peru</p>
//!   <div class="sfitemBoothNumbers">corpmember, 123, 456A</div>
//!   <div class="sfitemRichText"><a href="https://acme.example">acme.example</a></div>
//! </div>
//! ```
//! The title is required; booth and website may be missing. The bolded lead
//! segment of the title is the firm name on the prospectors page and the
//! project name on the core-shack pages.
//!
//! Extraction is lazy and restartable: each call to `exhibitors` / `projects`
//! walks the parsed page again from the top and yields the same sequence.

use scraper::{ElementRef, Html, Selector};

use crate::config::consts::{BOOTH_SEL, ITEM_SEL, LEAD_SEL, TITLE_SEL, WEBSITE_SEL};
use crate::core::html::{attr, first, following_text, selector, text_of};
use crate::core::sanitize::{fold_diacritics, normalize_ws, strip_membership_marker};
use crate::countries::CountryCatalog;
use crate::error::{Error, Result};
use crate::model::{ExhibitorRecord, ProjectRecord};

/// Where an exhibitor's name comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameSource {
    /// Whole title text.
    Title,
    /// Bolded lead segment of the title.
    Lead,
}

struct Selectors {
    item: Selector,
    title: Selector,
    booth: Selector,
    website: Selector,
    lead: Selector,
}

impl Selectors {
    fn new() -> Result<Self> {
        Ok(Self {
            item: selector(ITEM_SEL)?,
            title: selector(TITLE_SEL)?,
            booth: selector(BOOTH_SEL)?,
            website: selector(WEBSITE_SEL)?,
            lead: selector(LEAD_SEL)?,
        })
    }
}

pub struct ListingPage {
    url: String,
    doc: Html,
    sel: Selectors,
    category: Option<String>,
}

impl ListingPage {
    pub fn parse(url: &str, markup: &str) -> Result<Self> {
        Ok(Self {
            url: s!(url),
            doc: Html::parse_document(markup),
            sel: Selectors::new()?,
            category: None,
        })
    }

    /// Taxonomy value this page lists (letter, commodity, country, ...).
    pub fn with_category(mut self, value: impl Into<String>) -> Self {
        self.category = Some(value.into());
        self
    }

    pub fn url(&self) -> &str { &self.url }

    /// Number of item blocks on the page.
    pub fn item_count(&self) -> usize {
        self.doc.select(&self.sel.item).count()
    }

    pub fn exhibitors(&self, names: NameSource) -> impl Iterator<Item = Result<ExhibitorRecord>> + '_ {
        self.doc
            .select(&self.sel.item)
            .enumerate()
            .map(move |(i, item)| self.exhibitor(i, item, names))
    }

    /// Core-shack items: each yields a firm and the project it presents.
    pub fn projects<'a>(
        &'a self,
        countries: &'a CountryCatalog,
    ) -> impl Iterator<Item = Result<(ExhibitorRecord, ProjectRecord)>> + 'a {
        self.doc
            .select(&self.sel.item)
            .enumerate()
            .map(move |(i, item)| self.project(i, item, countries))
    }

    /* ---------- per item ---------- */

    fn exhibitor(&self, index: usize, item: ElementRef<'_>, names: NameSource) -> Result<ExhibitorRecord> {
        let title = self.title(index, item)?;
        let name = match names {
            NameSource::Title => text_of(title),
            NameSource::Lead => text_of(self.lead(index, title)?),
        };
        if name.is_empty() {
            return Err(self.missing(index, "name"));
        }
        Ok(self.record(name, item))
    }

    fn project(
        &self,
        index: usize,
        item: ElementRef<'_>,
        countries: &CountryCatalog,
    ) -> Result<(ExhibitorRecord, ProjectRecord)> {
        let title = self.title(index, item)?;
        let lead = self.lead(index, title)?;

        let full = text_of(title);
        let firm_name = full.split(',').next().unwrap_or_default().trim().to_string();
        if firm_name.is_empty() {
            return Err(self.missing(index, "name"));
        }

        let project_name = text_of(lead).trim_end_matches(':').trim().to_string();
        let location = following_text(lead)
            .map(|t| normalize_ws(&fold_diacritics(&t)))
            .unwrap_or_default();
        let resolved_country = countries.resolve(&location);

        let project = ProjectRecord {
            project_name,
            raw_location: strip_country_segment(&location),
            resolved_country,
            firm_name: firm_name.clone(),
        };
        Ok((self.record(firm_name, item), project))
    }

    fn record(&self, name: String, item: ElementRef<'_>) -> ExhibitorRecord {
        let booth = first(item, &self.sel.booth)
            .map(|b| strip_membership_marker(&text_of(b)))
            .filter(|b| !b.is_empty());
        let website = first(item, &self.sel.website).and_then(|a| attr(a, "href"));

        ExhibitorRecord { name, booth, website, category_value: self.category.clone() }
    }

    fn title<'b>(&self, index: usize, item: ElementRef<'b>) -> Result<ElementRef<'b>> {
        first(item, &self.sel.title).ok_or_else(|| self.missing(index, "title"))
    }

    fn lead<'b>(&self, index: usize, title: ElementRef<'b>) -> Result<ElementRef<'b>> {
        first(title, &self.sel.lead).ok_or_else(|| self.missing(index, "bold title segment"))
    }

    fn missing(&self, index: usize, field: &'static str) -> Error {
        Error::MissingField { page: self.url.clone(), index, field }
    }
}

/// Drop the last comma-separated segment (the country) from a location.
/// A location without a comma is kept whole.
pub fn strip_country_segment(location: &str) -> String {
    match location.rsplit_once(',') {
        Some((place, _country)) => place.trim().to_string(),
        None => location.trim().to_string(),
    }
}
