//! Getty Images search results
//!
//! Results are `<article class="mosaic-asset">` tiles carrying the thumbnail
//! in `data-thumb-url`. Pagination follows the server-assigned
//! `#next-gallery-page` anchor.

use crate::sites::rules::{FieldRule, Pagination, SiteConfig};
use crate::sites::SiteId;

pub static CONFIG: SiteConfig = SiteConfig {
    id: SiteId::GettyImages,
    origin: "https://www.gettyimages.com",
    query_path: "/photos/{term}",
    query_params: &[
        ("alloweduse", "availableforalluses"),
        ("family", "creative"),
        ("license", "rf"),
        ("phrase", "{term}"),
        ("sort", "best"),
    ],
    result_selector: "article.mosaic-asset",
    thumbnail: FieldRule {
        selector: None,
        attrs: &["data-thumb-url"],
    },
    detail: FieldRule {
        selector: Some("a[href]"),
        attrs: &["href"],
    },
    pagination: Pagination::NextLink {
        selector: "#next-gallery-page",
    },
};
