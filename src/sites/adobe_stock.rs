//! Adobe Stock search results
//!
//! Adobe Stock paginates with `search_page`; thumbnails are lazy-loaded
//! through `data-lazy`.

use crate::sites::rules::{FieldRule, Pagination, SiteConfig};
use crate::sites::SiteId;

pub static CONFIG: SiteConfig = SiteConfig {
    id: SiteId::AdobeStock,
    origin: "https://stock.adobe.com",
    query_path: "/search",
    query_params: &[
        ("k", "{term}"),
        ("search_page", "1"),
        ("order", "relevance"),
    ],
    result_selector: "div.search-result-cell",
    thumbnail: FieldRule {
        selector: Some("img"),
        attrs: &["data-lazy", "src"],
    },
    detail: FieldRule {
        selector: Some("a.js-search-result-thumbnail"),
        attrs: &["href"],
    },
    pagination: Pagination::QueryParam {
        name: "search_page",
    },
};
