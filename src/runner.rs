// src/runner.rs
use std::path::{Path, PathBuf};

use url::Url;

use crate::{
    config::{
        consts::*,
        options::{Category, RunOptions, Section},
    },
    core::net::{Fetch, HttpFetcher, parse_url},
    countries::CountryCatalog,
    dataset::DataSet,
    error::{Error, Result},
    file::{ensure_directory, write_layer, write_table},
    geocode::{GeocodeResolver, Geocoder, OpenCage},
    model::{ExhibitorRecord, GeocodedAddress, ProjectRecord},
    progress::Progress,
    reconcile::{self, ByName, JoinHow, ProjectLocation},
    specs::{ListingPage, NameSource, extract_categories},
    store,
};

/// Summary of what was produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub files_written: Vec<PathBuf>,
    /// Categories that failed, with the reason. The rest of their section
    /// still ran.
    pub failures: Vec<(Section, Category, String)>,
    pub geocode_calls: usize,
}

impl RunSummary {
    pub fn is_success(&self) -> bool { self.failures.is_empty() }
}

/// Everything one scrape needs, with the network and geocoder swappable.
pub struct Pipeline<'a, F: Fetch, G: Geocoder> {
    fetch: &'a F,
    geocoder: GeocodeResolver<'a, G>,
    countries: &'a CountryCatalog,
    addresses: &'a [GeocodedAddress],
    out_dir: &'a Path,
    written: Vec<PathBuf>,
}

impl<'a, F: Fetch, G: Geocoder> Pipeline<'a, F, G> {
    pub fn new(
        fetch: &'a F,
        geocoder: GeocodeResolver<'a, G>,
        countries: &'a CountryCatalog,
        addresses: &'a [GeocodedAddress],
        out_dir: &'a Path,
    ) -> Self {
        Self { fetch, geocoder, countries, addresses, out_dir, written: Vec::new() }
    }

    /// Run `sections` in order, category by category. A failing category is
    /// logged and recorded; the next one still runs.
    pub fn run(mut self, sections: &[Section], progress: &mut dyn Progress) -> RunSummary {
        let mut failures = Vec::new();
        progress.begin(sections.len());

        for &section in sections {
            let before = self.written.len();
            let mut ok = true;
            for &category in section.categories() {
                if let Err(e) = self.run_category(category, progress) {
                    loge!("{} [{category}] aborted: {e}", section.title());
                    failures.push((section, category, e.to_string()));
                    ok = false;
                }
            }
            for p in &self.written[before..] {
                progress.file_written(p);
            }
            progress.section_done(section, ok);
        }

        progress.finish();
        RunSummary { files_written: self.written, failures, geocode_calls: self.geocoder.calls() }
    }

    fn run_category(&mut self, category: Category, progress: &mut dyn Progress) -> Result<()> {
        match category {
            Category::IxAlphabetical => {
                progress.log("Scraping Investors Exchange (IX) exhibitors alphabetically...");
                self.alphabetical(IX_BASE, "firms_ix")
            }
            Category::IxCommodity => self.ix_commodity(progress),
            Category::IxCountry => self.ix_country(progress),
            Category::TsAlphabetical => {
                progress.log("Scraping Trade Show (TS) exhibitors alphabetically...");
                self.alphabetical(TS_BASE, "firms_ts")
            }
            Category::TsBusinessType => self.ts_biztype(progress),
            Category::CoreShack => self.core_shack(progress),
            Category::ProspectorsTent => self.prospectors_tent(progress),
        }
    }

    /* ---------------- Categories ---------------- */

    fn alphabetical(&mut self, base: &str, stem: &str) -> Result<()> {
        let base = parse_url(base)?;
        let firms = self.scrape_directory(&base, ALPHA_PAGE, ALPHA_CONTAINER, NameSource::Title)?;
        self.write_firms(stem, &firms)
    }

    fn ix_commodity(&mut self, progress: &mut dyn Progress) -> Result<()> {
        progress.log("Scraping IX exhibitors by commodity...");
        let base = parse_url(IX_BASE)?;
        let by_commodity = self.scrape_directory(&base, COMMODITY_PAGE, COMMODITY_CONTAINER, NameSource::Title)?;
        let commodities = reconcile::flatten_taxonomy(&by_commodity);
        self.table("firms_ix_by_commodity", DataSet::table(&commodities.relation).renamed("value", "commodity"))?;
        self.table("ix_commodities", DataSet::table(&commodities.links()).renamed("value", "commodity"))
    }

    fn ix_country(&mut self, progress: &mut dyn Progress) -> Result<()> {
        progress.log("Scraping IX exhibitors by country of exploration...");
        let base = parse_url(IX_BASE)?;
        let by_country = self.scrape_directory(&base, COUNTRY_PAGE, COUNTRY_CONTAINER, NameSource::Title)?;
        let countries = reconcile::clean_countries(reconcile::flatten_taxonomy(&by_country));
        self.table("firms_ix_by_country", DataSet::table(&countries.relation).renamed("value", "country"))?;
        let layer = reconcile::resolve_taxonomy_countries(&countries.values, self.countries);
        self.layer("ix_countries", DataSet::layer(&layer))
    }

    fn ts_biztype(&mut self, progress: &mut dyn Progress) -> Result<()> {
        progress.log("Scraping TS exhibitors by business type...");
        let base = parse_url(TS_BASE)?;
        let by_type = self.scrape_directory(&base, BIZTYPE_PAGE, BIZTYPE_CONTAINER, NameSource::Title)?;
        let types = reconcile::flatten_taxonomy(&by_type);
        self.table("firms_ts_by_biztype", DataSet::table(&types.relation).renamed("value", "biztype"))?;
        self.table("ts_biztypes", DataSet::table(&types.links()).renamed("value", "biztype"))
    }

    fn core_shack(&mut self, progress: &mut dyn Progress) -> Result<()> {
        let mut firms = Vec::new();
        let mut projects: Vec<ProjectRecord> = Vec::new();

        for (session, raw) in ['A', 'B'].into_iter().zip(CS_SESSIONS) {
            progress.log(&format!("Scraping Core Shack (CS) session {session} exhibitors..."));
            let url = parse_url(raw)?;
            let page = ListingPage::parse(url.as_str(), &self.fetch.get(&url)?)?;
            for item in page.projects(self.countries) {
                match item {
                    Ok((firm, project)) => {
                        firms.push(firm);
                        projects.push(project);
                    }
                    Err(e) if e.is_item_level() => logw!("{e}; item skipped"),
                    Err(e) => return Err(e),
                }
            }
        }
        self.write_firms("firms_cs", &firms)?;

        progress.log("Geocoding CS project locations...");
        let mut located = Vec::with_capacity(projects.len());
        for project in projects {
            let found = self
                .geocoder
                .resolve(Some(&project.raw_location), project.resolved_country.as_deref())?;
            located.push(ProjectLocation { project, point: found.coordinate });
        }
        self.layer("firms_cs_by_projects", DataSet::layer(&located))
    }

    fn prospectors_tent(&mut self, progress: &mut dyn Progress) -> Result<()> {
        progress.log("Scraping Prospectors Tent (PT) exhibitors...");
        let url = parse_url(PT_URL)?;
        let page = ListingPage::parse(url.as_str(), &self.fetch.get(&url)?)?;
        let firms = collect_items(page.exhibitors(NameSource::Lead))?;
        self.table("prospectors", DataSet::table(&reconcile::explode_booths(&firms)))
    }

    /* ---------------- Shared steps ---------------- */

    /// Landing page → category links → every listing page, in link order.
    /// Each record carries the value of the link it was listed under.
    pub fn scrape_directory(
        &self,
        base: &Url,
        landing: &str,
        container: &str,
        names: NameSource,
    ) -> Result<Vec<ExhibitorRecord>> {
        let landing = base
            .join(landing)
            .map_err(|source| Error::Url { url: s!(landing), source })?;
        let links = extract_categories(&landing, &self.fetch.get(&landing)?, container)?;
        logd!("{landing}: {} category links", links.len());

        let mut out = Vec::new();
        for link in links {
            let body = self.fetch.get(&link.url)?;
            let page = ListingPage::parse(link.url.as_str(), &body)?.with_category(link.value);
            out.extend(collect_items(page.exhibitors(names))?);
        }
        Ok(out)
    }

    /// Firm layer (address join) and booth table.
    fn write_firms(&mut self, stem: &str, records: &[ExhibitorRecord]) -> Result<()> {
        let firms = reconcile::firms(records);
        let joined = reconcile::join_addresses(self.addresses, &firms, JoinHow::default(), &ByName);
        self.layer(stem, DataSet::layer(&joined))?;

        let booths = reconcile::explode_booths(records);
        self.table(&join!(stem, "_by_booth"), DataSet::table(&booths))
    }

    fn table(&mut self, stem: &str, ds: DataSet) -> Result<()> {
        let path = write_table(self.out_dir, stem, &ds)?;
        self.written.push(path);
        Ok(())
    }

    fn layer(&mut self, stem: &str, ds: DataSet) -> Result<()> {
        let paths = write_layer(self.out_dir, stem, &ds)?;
        self.written.extend(paths);
        Ok(())
    }
}

/// Keep good items; log and skip item-level failures; stop on anything else.
fn collect_items<I>(items: I) -> Result<Vec<ExhibitorRecord>>
where
    I: Iterator<Item = Result<ExhibitorRecord>>,
{
    let mut out = Vec::new();
    for item in items {
        match item {
            Ok(rec) => out.push(rec),
            Err(e) if e.is_item_level() => logw!("{e}; item skipped"),
            Err(e) => return Err(e),
        }
    }
    Ok(out)
}

/* ---------------- Inputs ---------------- */

/// Geocode the address book and refresh the cache, or read the cache back.
pub fn prepare_addresses<G: Geocoder>(
    opts: &RunOptions,
    resolver: &mut GeocodeResolver<'_, G>,
    progress: &mut dyn Progress,
) -> Result<Vec<GeocodedAddress>> {
    if opts.regeocode {
        progress.log("Geocoding address book...");
        let book = store::load_address_book(&opts.addresses_csv)?;
        let coded = store::geocode_addresses(book, resolver)?;
        store::save_address_cache(&opts.addresses_cache, &coded)?;
        progress.file_written(&opts.addresses_cache);
        Ok(coded)
    } else {
        store::load_address_cache(&opts.addresses_cache)
    }
}

/// Top-level entry: live site, OpenCage geocoder.
pub fn run(opts: &RunOptions, progress: &mut dyn Progress) -> Result<RunSummary> {
    let fetch = HttpFetcher::new()?;
    let geocoder = OpenCage::new(opts.api_key.clone())?;
    run_with(opts, &fetch, geocoder, progress)
}

/// Same as `run` with the collaborators supplied.
pub fn run_with<F: Fetch, G: Geocoder>(
    opts: &RunOptions,
    fetch: &F,
    geocoder: G,
    progress: &mut dyn Progress,
) -> Result<RunSummary> {
    ensure_directory(&opts.out_dir)?;
    let countries = CountryCatalog::load(&opts.countries)?;
    let mut inputs = vec![write_table(&opts.out_dir, "countries", &DataSet::layer(countries.entries()))?];
    if let Some(booths) = store::load_booths(&opts.booths)? {
        inputs.push(write_table(&opts.out_dir, "booths", &booths)?);
    }
    for p in &inputs {
        progress.file_written(p);
    }

    let mut resolver = GeocodeResolver::new(geocoder);
    if opts.centroid_fallback {
        resolver = resolver.with_centroid_fallback(&countries);
    }
    let addresses = prepare_addresses(opts, &mut resolver, progress)?;

    let mut summary =
        Pipeline::new(fetch, resolver, &countries, &addresses, &opts.out_dir).run(&opts.sections, progress);
    inputs.append(&mut summary.files_written);
    summary.files_written = inputs;
    Ok(summary)
}
