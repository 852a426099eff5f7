// src/error.rs
//! Error taxonomy for the scrape pipeline.
//!
//! - `Structure`: an expected container is gone from a page. The directory
//!   layout has drifted; the affected category is aborted.
//! - `MissingField`: one item block lacks its title. The item is skipped and
//!   logged, the rest of the page continues.
//! - `Config`: bad startup configuration, reported before any network call.
//! - `Fetch` / `HttpStatus` / `Geocode`: collaborator failures, surfaced as-is.
//!
//! A country or geocode lookup that finds nothing is *not* an error; it is a
//! `None` that flows through the joins.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("page layout changed: container `{container}` not found on {page}")]
    Structure { page: String, container: String },

    #[error("item {index} on {page}: missing {field}")]
    MissingField { page: String, index: usize, field: &'static str },

    #[error("invalid CSS selector `{0}`")]
    Selector(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("request failed for {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("invalid URL `{url}`: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("geocoder failed for `{query}`: {message}")]
    Geocode { query: String, message: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: {message}", path.display())]
    Data { path: PathBuf, message: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }

    pub fn data(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Data { path: path.into(), message: message.into() }
    }

    /// Errors that only cost one item, not the page.
    pub fn is_item_level(&self) -> bool {
        matches!(self, Error::MissingField { .. })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no output directory given; pass --out <DIR>")]
    MissingOutputDir,

    #[error("path exists but is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("geocoding credential missing: set the {0} environment variable")]
    MissingCredential(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_missing_field_is_item_level() {
        let miss = Error::MissingField { page: s!("p"), index: 3, field: "title" };
        let drift = Error::Structure { page: s!("p"), container: s!("alphaChars") };
        assert!(miss.is_item_level());
        assert!(!drift.is_item_level());
        assert!(drift.to_string().contains("alphaChars"));
    }

    #[test]
    fn config_errors_convert() {
        let e: Error = ConfigError::MissingCredential("OPENCAGE").into();
        assert!(e.to_string().contains("OPENCAGE"));
    }
}
