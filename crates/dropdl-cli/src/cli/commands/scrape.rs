//! `dropdl scrape` – crawl the catalog into the episode manifest.

use anyhow::Result;
use dropdl_core::archive::RunLock;
use dropdl_core::catalog::{self, CrawlSummary};
use dropdl_core::config::DropdlConfig;
use dropdl_core::fetch::PageFetcher;
use dropdl_core::layout::RunLayout;

pub async fn run_scrape(cfg: &DropdlConfig, layout: &RunLayout) -> Result<()> {
    let _lock = RunLock::acquire(layout.config_dir())?;
    let summary = crawl_phase(cfg, layout).await?;
    report_crawl(layout, &summary);
    Ok(())
}

/// Run the blocking crawler on a worker thread. Shared with `dropdl run`.
pub(super) async fn crawl_phase(cfg: &DropdlConfig, layout: &RunLayout) -> Result<CrawlSummary> {
    println!("Crawling {} ...", cfg.base_url);
    let fetcher = PageFetcher::from_config(cfg);
    let base_url = cfg.base_url.clone();
    let manifest_path = layout.manifest_path();
    tokio::task::spawn_blocking(move || {
        catalog::crawl_to_manifest(&fetcher, &base_url, &manifest_path)
    })
    .await?
}

pub(super) fn report_crawl(layout: &RunLayout, summary: &CrawlSummary) {
    println!(
        "Scrape finished: {} series found, {} episode URL(s) written to {}",
        summary.series_found,
        summary.urls_written,
        layout.manifest_path().display()
    );
    if summary.series_failed > 0 {
        println!(
            "{} series could not be scraped; see the log for details.",
            summary.series_failed
        );
    }
}
