//! HTML extraction for the root page
//!
//! Pulls the structural metadata the analyzer reports: the first title,
//! heading counts by level, the number of password input fields, and every
//! outbound anchor resolved to an absolute URL.
//!
//! All `scraper::Html` values stay inside this module's sync functions: the
//! parsed document is not `Send` and must never be held across an await.

use scraper::{Html, Selector};
use std::collections::BTreeMap;
use url::Url;

/// Structural metadata extracted from the root page
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    /// Trimmed text of the first `<title>` element, if any
    pub title: Option<String>,

    /// Heading tag name (`h1`..`h6`) to occurrence count
    pub headings: BTreeMap<String, u32>,

    /// Number of `input[type=password]` elements on the page
    pub password_fields: u32,

    /// Outbound anchors resolved to absolute URLs, in document order.
    /// Duplicate hrefs each keep their own entry.
    pub links: Vec<Url>,
}

/// Parses the root page body and extracts all reported metadata
///
/// # Link Extraction Rules
///
/// **Include:** every `<a href="...">` whose href resolves to a non-empty
/// absolute HTTP(S) URL against `base_url`.
///
/// **Exclude:** empty hrefs, `javascript:`, `mailto:`, `tel:`, `data:`,
/// fragment-only anchors, and anything that resolves to a non-HTTP(S) scheme.
///
/// Duplicates are deliberately kept: each occurrence on the page is probed
/// separately.
///
/// # Arguments
///
/// * `html` - The raw HTML body
/// * `base_url` - The root URL, used to resolve relative hrefs
pub fn extract_page(html: &str, base_url: &Url) -> ExtractedPage {
    let document = Html::parse_document(html);

    ExtractedPage {
        title: extract_title(&document),
        headings: count_headings(&document),
        password_fields: count_password_fields(&document),
        links: extract_links(&document, base_url),
    }
}

/// Extracts the trimmed text of the first `<title>` element
fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
}

/// Counts heading elements by tag name
fn count_headings(document: &Html) -> BTreeMap<String, u32> {
    let mut headings = BTreeMap::new();

    if let Ok(selector) = Selector::parse("h1,h2,h3,h4,h5,h6") {
        for element in document.select(&selector) {
            let name = element.value().name().to_string();
            *headings.entry(name).or_insert(0) += 1;
        }
    }

    headings
}

/// Counts password input fields
fn count_password_fields(document: &Html) -> u32 {
    Selector::parse(r#"input[type="password"]"#)
        .map(|selector| document.select(&selector).count() as u32)
        .unwrap_or(0)
}

/// Extracts anchor hrefs resolved to absolute URLs, duplicates included
fn extract_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(resolved) = resolve_link(href, base_url) {
                    links.push(resolved);
                }
            }
        }
    }

    links
}

/// Resolves an href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel:, data: schemes
/// - invalid URLs
/// - non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(resolved) if resolved.scheme() == "http" || resolved.scheme() == "https" => {
            Some(resolved)
        }
        _ => None,
    }
}
