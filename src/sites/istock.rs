//! iStock search results
//!
//! iStock shares Getty's asset CDN but renders its grid with test ids. The
//! thumbnail is lazy-loaded, so `data-src` is preferred over `src`.

use crate::sites::rules::{FieldRule, Pagination, SiteConfig};
use crate::sites::SiteId;

pub static CONFIG: SiteConfig = SiteConfig {
    id: SiteId::IStock,
    origin: "https://www.istockphoto.com",
    query_path: "/search/2/image",
    query_params: &[("phrase", "{term}"), ("sort", "best")],
    result_selector: r#"div[data-testid="gallery-mosaic-asset"]"#,
    thumbnail: FieldRule {
        selector: Some("img"),
        attrs: &["data-src", "src"],
    },
    detail: FieldRule {
        selector: Some("a[href]"),
        attrs: &["href"],
    },
    pagination: Pagination::NextLink {
        selector: r#"a[data-testid="pagination-button-next"]"#,
    },
};
