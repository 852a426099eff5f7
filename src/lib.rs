// src/lib.rs

#[macro_use]
pub mod macros;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod countries;
pub mod csv;
pub mod dataset;
pub mod error;
pub mod file;
pub mod geocode;
pub mod geojson;
pub mod log;
pub mod model;
pub mod progress;
pub mod reconcile;
pub mod runner;
pub mod specs;
pub mod store;

pub use error::{ConfigError, Error, Result};
