// src/specs/index.rs
//! Scraping *spec* for a directory landing page.
//!
//! Purpose:
//! - Find the container (`<div id=...>`) that holds the category links:
//!   letters, commodities, countries, business types.
//! - Return one `(category_value, listing_url)` per anchor, in document order,
//!   with hrefs resolved against the landing page URL.
//!
//! A missing container means the directory layout has changed. That is a
//! `Structure` error and must reach the caller.

use scraper::Html;
use url::Url;

use crate::core::html::{attr, element_by_id, selector, text_of};
use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryLink {
    pub value: String,
    pub url: Url,
}

pub fn extract_categories(base: &Url, markup: &str, container_id: &str) -> Result<Vec<CategoryLink>> {
    let doc = Html::parse_document(markup);
    let container = element_by_id(&doc, "div", container_id)?.ok_or_else(|| Error::Structure {
        page: base.to_string(),
        container: s!(container_id),
    })?;

    let anchors = selector("a")?;
    let mut out = Vec::new();
    for a in container.select(&anchors) {
        let value = text_of(a);
        let Some(href) = attr(a, "href") else {
            logd!("{base}: link `{value}` in #{container_id} has no href, skipped");
            continue;
        };
        let url = base.join(&href).map_err(|source| Error::Url { url: href.clone(), source })?;
        out.push(CategoryLink { value, url });
    }

    if out.is_empty() {
        logw!("{base}: #{container_id} holds no category links");
    }
    Ok(out)
}
