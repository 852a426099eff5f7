// src/core/html.rs
// Thin helpers over `scraper` for the handful of lookups the specs need.

use scraper::{ElementRef, Html, Selector};

use super::sanitize::normalize_ws;
use crate::error::{Error, Result};

pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|_| Error::Selector(s!(css)))
}

/// Visible text of an element, whitespace-collapsed.
pub fn text_of(el: ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<String>())
}

pub fn first<'a>(scope: ElementRef<'a>, sel: &Selector) -> Option<ElementRef<'a>> {
    scope.select(sel).next()
}

/// Trimmed attribute value; empty counts as absent.
pub fn attr(el: ElementRef<'_>, name: &str) -> Option<String> {
    el.value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// The text node right after `el`, if the next sibling is text.
pub fn following_text(el: ElementRef<'_>) -> Option<String> {
    let next = el.next_sibling()?;
    next.value().as_text().map(|t| s!(&**t))
}

/// `<tag id="...">` lookup. The id is matched exactly, so ids that would need
/// escaping in CSS still work.
pub fn element_by_id<'a>(doc: &'a Html, tag: &str, id: &str) -> Result<Option<ElementRef<'a>>> {
    let sel = selector(tag)?;
    Ok(doc.select(&sel).find(|el| el.value().id() == Some(id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
        <div id="box">
          <p class="t"><strong>Lead:</strong> tail text, here</p>
          <a href="  /x  ">Go</a>
          <a href="">Empty</a>
        </div>"#;

    #[test]
    fn finds_container_by_exact_id() {
        let doc = Html::parse_document(DOC);
        assert!(element_by_id(&doc, "div", "box").unwrap().is_some());
        assert!(element_by_id(&doc, "div", "nope").unwrap().is_none());
    }

    #[test]
    fn text_after_lead_element() {
        let doc = Html::parse_document(DOC);
        let strong = doc.select(&selector("p.t strong").unwrap()).next().unwrap();
        assert_eq!(text_of(strong), "Lead:");
        assert_eq!(following_text(strong).as_deref(), Some(" tail text, here"));
    }

    #[test]
    fn attr_trims_and_drops_empty() {
        let doc = Html::parse_document(DOC);
        let links: Vec<_> = doc.select(&selector("a").unwrap()).collect();
        assert_eq!(attr(links[0], "href").as_deref(), Some("/x"));
        assert_eq!(attr(links[1], "href"), None);
    }

    #[test]
    fn bad_selector_is_an_error() {
        assert!(matches!(selector("div[["), Err(Error::Selector(_))));
    }
}
