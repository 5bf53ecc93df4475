//! Shutterstock search results
//!
//! Shutterstock paginates with a plain `page` query parameter.

use crate::sites::rules::{FieldRule, Pagination, SiteConfig};
use crate::sites::SiteId;

pub static CONFIG: SiteConfig = SiteConfig {
    id: SiteId::Shutterstock,
    origin: "https://www.shutterstock.com",
    query_path: "/search/{term}",
    query_params: &[("image_type", "photo"), ("page", "1")],
    result_selector: r#"div[data-automation="AssetGrids_GridItemContainer_div"]"#,
    thumbnail: FieldRule {
        selector: Some("img"),
        attrs: &["src", "data-src"],
    },
    detail: FieldRule {
        selector: Some("a[href]"),
        attrs: &["href"],
    },
    pagination: Pagination::QueryParam { name: "page" },
};
