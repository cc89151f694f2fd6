//! URL handling module for Stock-Scout
//!
//! Category menus and product listings carry relative and absolute hrefs;
//! this module turns them into absolute URLs and builds the parameterised
//! listing URLs behind a "show all" gate.

use url::Url;

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
///
/// # Examples
///
/// ```
/// use stock_scout::url::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("https://shop.example.com/shoes/").unwrap();
/// let link = resolve_link("sneakers", &base).unwrap();
/// assert_eq!(link.as_str(), "https://shop.example.com/shoes/sneakers");
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
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
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url)
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

/// Appends query parameters to a URL, keeping any it already carries
///
/// # Examples
///
/// ```
/// use stock_scout::url::with_query_pairs;
/// use url::Url;
///
/// let base = Url::parse("https://shop.example.com/12-sneakers").unwrap();
/// let full = with_query_pairs(&base, &[("id_category", "12"), ("n", "48")]);
/// assert_eq!(full.as_str(), "https://shop.example.com/12-sneakers?id_category=12&n=48");
/// ```
pub fn with_query_pairs(base_url: &Url, pairs: &[(&str, &str)]) -> Url {
    let mut url = base_url.clone();
    {
        let mut query = url.query_pairs_mut();
        for (name, value) in pairs {
            query.append_pair(name, value);
        }
    }
    url
}
