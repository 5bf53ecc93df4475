//! Generic adapter that interprets a [`SiteConfig`] over fetched pages

use crate::sites::links::{resolve_link, with_query_param};
use crate::sites::rules::{FieldRule, Pagination, SiteConfig, TERM_PLACEHOLDER};
use crate::sites::{ImageLink, SiteAdapter, SiteId};
use crate::ScraperError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// A field rule with its selector compiled
#[derive(Debug)]
struct CompiledField {
    selector: Option<Selector>,
    attrs: &'static [&'static str],
}

/// Site adapter driven entirely by a static [`SiteConfig`]
///
/// Selectors are compiled once at construction, so a malformed rule fails
/// before any page is fetched.
#[derive(Debug)]
pub struct StockSite {
    config: &'static SiteConfig,
    origin: Url,
    results: Selector,
    thumbnail: CompiledField,
    detail: CompiledField,
    next_link: Option<Selector>,
}

impl StockSite {
    /// Creates an adapter served from the site's public origin
    pub fn new(config: &'static SiteConfig) -> Result<Self, ScraperError> {
        let origin = Url::parse(config.origin)?;
        Self::with_origin(config, origin)
    }

    /// Creates an adapter served from `origin` instead of the public one
    pub fn with_origin(config: &'static SiteConfig, origin: Url) -> Result<Self, ScraperError> {
        if origin.cannot_be_a_base() || !matches!(origin.scheme(), "http" | "https") {
            return Err(ScraperError::UrlParse(
                url::ParseError::RelativeUrlWithCannotBeABaseBase,
            ));
        }

        let next_link = match config.pagination {
            Pagination::NextLink { selector } => Some(compile(selector)?),
            Pagination::QueryParam { .. } => None,
        };

        Ok(Self {
            config,
            origin,
            results: compile(config.result_selector)?,
            thumbnail: compile_field(&config.thumbnail)?,
            detail: compile_field(&config.detail)?,
            next_link,
        })
    }

    /// Reads the first usable attribute of a field from a result element
    fn read_field(&self, element: ElementRef<'_>, field: &CompiledField) -> Option<String> {
        let target = match &field.selector {
            Some(selector) => element.select(selector).next()?,
            None => element,
        };

        field
            .attrs
            .iter()
            .filter_map(|attr| target.value().attr(attr))
            .find_map(|value| resolve_link(&self.origin, value))
    }
}

impl SiteAdapter for StockSite {
    fn id(&self) -> SiteId {
        self.config.id
    }

    fn query_url(&self, term: &str) -> Result<Url, ScraperError> {
        let mut url = self.origin.clone();
        url.set_fragment(None);
        url.set_query(None);

        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ScraperError::UrlParse(url::ParseError::RelativeUrlWithCannotBeABaseBase)
            })?;
            segments.clear();
            for segment in self.config.query_path.split('/').filter(|s| !s.is_empty()) {
                segments.push(&segment.replace(TERM_PLACEHOLDER, term));
            }
        }

        if !self.config.query_params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in self.config.query_params {
                pairs.append_pair(name, &value.replace(TERM_PLACEHOLDER, term));
            }
        }

        Ok(url)
    }

    fn extract(&self, document: &Html) -> Vec<ImageLink> {
        document
            .select(&self.results)
            .filter_map(|element| {
                let Some(thumbnail_url) = self.read_field(element, &self.thumbnail) else {
                    tracing::debug!("{}: result element without thumbnail skipped", self.config.id);
                    return None;
                };
                let detail_url = self.read_field(element, &self.detail).unwrap_or_default();
                Some(ImageLink {
                    thumbnail_url,
                    detail_url,
                })
            })
            .collect()
    }

    fn next_url(&self, document: &Html, current: &Url, page_index: u32) -> Option<Url> {
        match self.config.pagination {
            Pagination::NextLink { .. } => {
                let selector = self.next_link.as_ref()?;
                let href = document
                    .select(selector)
                    .find_map(|element| element.value().attr("href"))?;
                resolve_link(&self.origin, href).and_then(|link| Url::parse(&link).ok())
            }
            Pagination::QueryParam { name } => {
                // An empty result grid means the search ran out of pages
                document.select(&self.results).next()?;
                let next_index = page_index.checked_add(1)?;
                Some(with_query_param(current, name, &next_index.to_string()))
            }
        }
    }
}

fn compile(selector: &'static str) -> Result<Selector, ScraperError> {
    Selector::parse(selector).map_err(|e| ScraperError::Selector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

fn compile_field(rule: &FieldRule) -> Result<CompiledField, ScraperError> {
    Ok(CompiledField {
        selector: rule.selector.map(compile).transpose()?,
        attrs: rule.attrs,
    })
}
