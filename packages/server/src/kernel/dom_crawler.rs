//! Discovers resource URLs referenced by rendered HTML.

use scraper::{Html, Selector};

/// Elements whose `src` or `href` may name a pushable resource
const LINKABLE_ELEMENTS: &str = "link[href], script[src], img[src]";

/// Collect `src` and `href` values in document order, skipping empty ones.
///
/// No filtering by type happens here; the push builder drops anything it
/// cannot push.
pub fn linkable_resources(html: &str) -> Vec<String> {
    let selector = match Selector::parse(LINKABLE_ELEMENTS) {
        Ok(s) => s,
        Err(_) => return vec![],
    };

    let document = Html::parse_document(html);

    document
        .select(&selector)
        .flat_map(|el| {
            ["src", "href"]
                .into_iter()
                .filter_map(move |attr| el.value().attr(attr))
        })
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from)
        .collect()
}
