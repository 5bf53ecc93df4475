use crate::sites::SiteId;

/// Placeholder substituted with the caller's query term in query templates
pub const TERM_PLACEHOLDER: &str = "{term}";

/// Static description of how to search and paginate one stock-photo site
///
/// A `SiteConfig` is plain data. [`StockSite`](crate::sites::StockSite)
/// compiles it against an origin and interprets it over fetched pages.
#[derive(Debug, Clone, Copy)]
pub struct SiteConfig {
    /// Which site this configuration describes
    pub id: SiteId,

    /// Scheme and host the site is served from
    pub origin: &'static str,

    /// Path of the search endpoint; segments may contain `{term}`
    pub query_path: &'static str,

    /// Query parameters appended in order; values may contain `{term}`
    pub query_params: &'static [(&'static str, &'static str)],

    /// CSS selector matching one element per search result
    pub result_selector: &'static str,

    /// How to read the thumbnail URL out of a result element
    pub thumbnail: FieldRule,

    /// How to read the detail-page URL out of a result element
    pub detail: FieldRule,

    /// How to reach the following result page
    pub pagination: Pagination,
}

/// Extraction rule for one field of a result element
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// Optional descendant selector; `None` reads the result element itself
    pub selector: Option<&'static str>,

    /// Candidate attributes, tried in order until one is non-empty
    pub attrs: &'static [&'static str],
}

/// Pagination strategy of a site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// Follow a server-assigned "next" anchor found with `selector`
    NextLink { selector: &'static str },

    /// Increment the numeric query parameter `name`
    QueryParam { name: &'static str },
}
