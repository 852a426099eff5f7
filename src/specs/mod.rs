// src/specs/mod.rs
//! # Scraping “specs” module
//!
//! Page-specific knowledge of the exhibitor directory: *where the ground
//! truth lives in the HTML* and *how to read it into typed records*.
//!
//! ## What lives here
//! - `index`: landing pages → ordered `(category value, listing URL)` links.
//! - `listing`: listing pages → `ExhibitorRecord`s (and, for the core shack,
//!   paired `ProjectRecord`s with a resolved country).
//!
//! ## What does **not** live here
//! - **Fetching** (`core::net`), **geocoding** (`geocode`), **joins and table
//!   shaping** (`reconcile`), **file output** (`file`).
//!
//! ## Typical call chain
//! ```text
//! runner → core::net::Fetch::get(landing) → specs::index::extract_categories
//!        → for each link: Fetch::get(listing) → specs::listing::ListingPage
//!        → reconcile::* → file::write_*
//! ```
//!
//! ## Conventions & invariants
//! - A missing link container is a `Structure` error: the page is not used.
//! - A missing item title is a `MissingField` error for that item only.
//! - Missing booth / website elements are `None`, never errors.
//! - Specs are testable **offline** against inline fixtures.
pub mod index;
pub mod listing;

pub use index::{CategoryLink, extract_categories};
pub use listing::{ListingPage, NameSource};
