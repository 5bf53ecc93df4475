//! Link helpers shared by every site adapter
//!
//! Result pages mix absolute, protocol-relative and root-relative links. These
//! helpers resolve them against a site origin and rewrite pagination
//! parameters without disturbing the rest of a query string.

use url::Url;

/// Resolves an attribute value to an absolute http(s) URL
///
/// Returns None if the value should be ignored:
/// - empty or fragment-only values
/// - javascript:, mailto:, tel: and data: URIs
/// - values that fail to resolve or resolve to a non-HTTP scheme
///
/// # Examples
///
/// ```
/// use stock_scraper::sites::resolve_link;
/// use url::Url;
///
/// let origin = Url::parse("https://www.gettyimages.com").unwrap();
/// assert_eq!(
///     resolve_link(&origin, "/photos/brazilian?page=2").as_deref(),
///     Some("https://www.gettyimages.com/photos/brazilian?page=2")
/// );
/// assert_eq!(resolve_link(&origin, "javascript:void(0)"), None);
/// ```
pub fn resolve_link(origin: &Url, href: &str) -> Option<String> {
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

    match origin.join(href) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute.to_string())
        }
        _ => None,
    }
}

/// Returns a copy of `url` with the query parameter `name` set to `value`
///
/// Every other parameter keeps its position and value. If `name` is not
/// present it is appended to the end of the query string. Repeated
/// occurrences of `name` collapse into the first one.
///
/// The query is re-serialized as `application/x-www-form-urlencoded`, so
/// decoded values survive but their spelling may not: `%20` comes back as
/// `+` and a bare `flag` becomes `flag=`. URLs built by the site adapters are
/// already in that form and pass through byte for byte.
///
/// # Examples
///
/// ```
/// use stock_scraper::sites::with_query_param;
/// use url::Url;
///
/// let url = Url::parse("https://example.com/search?k=cat&search_page=1&order=relevance").unwrap();
/// let next = with_query_param(&url, "search_page", "2");
/// assert_eq!(
///     next.as_str(),
///     "https://example.com/search?k=cat&search_page=2&order=relevance"
/// );
/// ```
pub fn with_query_param(url: &Url, name: &str, value: &str) -> Url {
    let mut replaced = false;
    let params: Vec<(String, String)> = url
        .query_pairs()
        .filter_map(|(k, v)| {
            if k == name {
                if replaced {
                    return None;
                }
                replaced = true;
                Some((k.into_owned(), value.to_string()))
            } else {
                Some((k.into_owned(), v.into_owned()))
            }
        })
        .collect();

    let mut next = url.clone();
    {
        let mut pairs = next.query_pairs_mut();
        pairs.clear();
        for (k, v) in &params {
            pairs.append_pair(k, v);
        }
        if !replaced {
            pairs.append_pair(name, value);
        }
    }
    next
}
