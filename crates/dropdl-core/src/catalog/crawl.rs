//! Page-walking loops over the catalog: index pagination and season iteration.
//!
//! The site paginates the series index until it answers HTTP 400, and a
//! season page with no episode links means the season (and every later one)
//! does not exist. Both stop conditions come from observed site behavior.

use anyhow::{anyhow, Context, Result};
use std::collections::HashSet;
use std::path::Path;
use url::Url;

use super::{parse, SeriesRef};
use crate::fetch::PageFetcher;
use crate::manifest::ManifestWriter;

/// Crawler over one catalog site.
pub struct CatalogCrawler<'a> {
    fetcher: &'a PageFetcher,
    base_url: Url,
}

impl<'a> CatalogCrawler<'a> {
    pub fn new(fetcher: &'a PageFetcher, base_url: &str) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("invalid base url: {}", base_url))?;
        Ok(Self { fetcher, base_url })
    }

    fn series_index_url(&self, page: u32) -> String {
        let index = format!("{}/series", self.base_url.as_str().trim_end_matches('/'));
        if page == 1 {
            index
        } else {
            format!("{}?page={}", index, page)
        }
    }

    /// Walk the series index until the site answers HTTP 400, de-duplicating
    /// by URL in first-seen order.
    pub fn crawl_series_index(&self) -> Result<Vec<SeriesRef>> {
        let mut all = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut page = 1u32;

        loop {
            let url = self.series_index_url(page);
            let fetched = self
                .fetcher
                .get_tolerating_400(&url)
                .map_err(|e| anyhow!("series index page {}: {}", page, e))?;
            if fetched.status == 400 {
                break;
            }
            let batch = parse::parse_series_index(&fetched.body)?;
            tracing::debug!("index page {}: {} series", page, batch.len());
            for s in batch {
                if seen.insert(s.url.clone()) {
                    all.push(s);
                }
            }
            page += 1;
        }

        tracing::info!("catalog index: {} series over {} page(s)", all.len(), page - 1);
        Ok(all)
    }

    /// Walk season pages for one series until a season comes back with no
    /// episode links, collecting absolute episode URLs.
    pub fn crawl_series_episodes(&self, series: &SeriesRef) -> Result<Vec<String>> {
        let series_url = self
            .base_url
            .join(&series.url)
            .with_context(|| format!("invalid series url: {}", series.url))?;

        let mut episodes = Vec::new();
        let mut season = 1u32;
        loop {
            let url = format!(
                "{}/season:{}",
                series_url.as_str().trim_end_matches('/'),
                season
            );
            let page = self
                .fetcher
                .get(&url)
                .map_err(|e| anyhow!("season {} of {:?}: {}", season, series.title, e))?;
            let links = parse::parse_episode_links(&page.body, &series_url)?;
            if links.is_empty() {
                break;
            }
            episodes.extend(links);
            season += 1;
        }
        Ok(episodes)
    }
}

/// Outcome of a full catalog crawl.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrawlSummary {
    pub series_found: u64,
    pub series_failed: u64,
    pub urls_written: u64,
}

/// Full catalog crawl: enumerate the series index, then scrape each series'
/// episodes and append them to the manifest as they arrive. A series whose
/// season pages cannot be fetched (retries exhausted) is skipped with a
/// warning; a failure on the index itself is fatal.
///
/// Blocking; call from `spawn_blocking` when used from async code.
pub fn crawl_to_manifest(
    fetcher: &PageFetcher,
    base_url: &str,
    manifest_path: &Path,
) -> Result<CrawlSummary> {
    let crawler = CatalogCrawler::new(fetcher, base_url)?;
    let series_list = crawler.crawl_series_index()?;

    let mut writer = ManifestWriter::create(manifest_path)?;
    let mut summary = CrawlSummary {
        series_found: series_list.len() as u64,
        ..Default::default()
    };

    for series in &series_list {
        tracing::info!("scraping series: {}", series.title);
        match crawler.crawl_series_episodes(series) {
            Ok(urls) => {
                summary.urls_written += writer.append_urls(urls.iter().map(String::as_str))?;
            }
            Err(e) => {
                summary.series_failed += 1;
                tracing::warn!("skipping series {:?}: {:#}", series.title, e);
            }
        }
    }

    Ok(summary)
}
