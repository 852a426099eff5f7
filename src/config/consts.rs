// src/config/consts.rs

// Site
pub const IX_BASE: &str = "https://www.pdac.ca/convention/exhibits/investors-exchange/";
pub const TS_BASE: &str = "https://www.pdac.ca/convention/exhibits/trade-show/";
pub const CS_SESSIONS: [&str; 2] = [
    "https://www.pdac.ca/convention/exhibits/core-shack/session-a-exhibitors",
    "https://www.pdac.ca/convention/exhibits/core-shack/session-b-exhibitors",
];
pub const PT_URL: &str = "https://www.pdac.ca/convention/exhibits/prospectors-tent/exhibitors";

// Listing pages relative to a section base, with the id of the link container
pub const ALPHA_PAGE: &str = "exhibitors";
pub const ALPHA_CONTAINER: &str = "alphaChars";
pub const COMMODITY_PAGE: &str = "exhibitor-list-by-commodity";
pub const COMMODITY_CONTAINER: &str = "commodityTypes";
pub const COUNTRY_PAGE: &str = "exhibitor-list-by-country-of-exploration";
pub const COUNTRY_CONTAINER: &str = "countries";
pub const BIZTYPE_PAGE: &str = "exhibitor-list-by-business-type";
pub const BIZTYPE_CONTAINER: &str = "businessTypes";

// Item block markup
pub const ITEM_SEL: &str = "div.sfitem";
pub const TITLE_SEL: &str = "p.sfitemTitle";
pub const BOOTH_SEL: &str = "div.sfitemBoothNumbers";
pub const WEBSITE_SEL: &str = "div.sfitemRichText a";
pub const LEAD_SEL: &str = "strong";

/// Prefixed to booth text for corporate members.
pub const MEMBERSHIP_MARKER: &str = "corpmember";

// Net
pub const USER_AGENT: &str = concat!("pdac_scrape/", env!("CARGO_PKG_VERSION"));
pub const TIMEOUT_SECS: u64 = 30;
pub const REQUEST_PAUSE_MS: u64 = 75; // be polite

// Geocoder
pub const OPENCAGE_URL: &str = "https://api.opencagedata.com/geocode/v1/json";
pub const CREDENTIAL_VAR: &str = "OPENCAGE";

// Local inputs (default: inside the data dir)
pub const ADDRESSES_CSV: &str = "addresses.csv";
pub const ADDRESSES_CACHE: &str = "addresses.geojson";
pub const COUNTRIES_GEOJSON: &str = "countries.geojson";
pub const BOOTHS_GEOJSON: &str = "booths.geojson";
