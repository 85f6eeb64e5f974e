//! Catalog model and crawling: the paginated series index and the per-season
//! episode pages behind it.

mod crawl;
mod parse;

pub use crawl::{crawl_to_manifest, CatalogCrawler, CrawlSummary};
pub use parse::{parse_episode_links, parse_series_index};

/// One series as listed on the catalog index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRef {
    pub title: String,
    /// URL of the series page, as found in the index markup.
    pub url: String,
}
