//! HTML parsing for catalog pages.
//!
//! Selectors match the markup of the site's browse grid; everything else on
//! the page is ignored.

use anyhow::{anyhow, Result};
use scraper::{Html, Selector};
use url::Url;

use super::SeriesRef;

const SERIES_ITEM: &str = "li.js-collection-item.item-type-series";
const ITEM_LINK: &str = "a.browse-item-link[href]";
const ITEM_TITLE: &str = ".browse-item-title strong";

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid selector {:?}: {}", css, e))
}

/// Parse one page of the series index into series references.
///
/// Items without a link are skipped; a missing title renders as "Unknown".
pub fn parse_series_index(html: &str) -> Result<Vec<SeriesRef>> {
    let doc = Html::parse_document(html);
    let item_sel = selector(SERIES_ITEM)?;
    let link_sel = selector(ITEM_LINK)?;
    let title_sel = selector(ITEM_TITLE)?;

    let mut series = Vec::new();
    for item in doc.select(&item_sel) {
        let link = match item.select(&link_sel).next() {
            Some(l) => l,
            None => continue,
        };
        let href = match link.value().attr("href") {
            Some(h) => h,
            None => continue,
        };
        let title = item
            .select(&title_sel)
            .next()
            .map(|t| t.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());
        series.push(SeriesRef {
            title,
            url: href.to_string(),
        });
    }
    Ok(series)
}

/// Collect every episode link on a season page, resolved against the series
/// page URL. An empty result means the season does not exist.
pub fn parse_episode_links(html: &str, series_url: &Url) -> Result<Vec<String>> {
    let doc = Html::parse_document(html);
    let link_sel = selector(ITEM_LINK)?;

    let mut links = Vec::new();
    for a in doc.select(&link_sel) {
        let href = match a.value().attr("href") {
            Some(h) => h,
            None => continue,
        };
        match series_url.join(href) {
            Ok(u) => links.push(u.to_string()),
            Err(e) => tracing::warn!("skipping unresolvable href {:?}: {}", href, e),
        }
    }
    Ok(links)
}
