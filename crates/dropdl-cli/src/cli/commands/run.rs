//! `dropdl run` – full pipeline: crawl the catalog, then download.

use anyhow::Result;
use dropdl_core::archive::RunLock;
use dropdl_core::config::DropdlConfig;
use dropdl_core::layout::RunLayout;
use dropdl_core::manifest;

use super::download::download_phase;
use super::scrape::{crawl_phase, report_crawl};

pub async fn run_full(cfg: &DropdlConfig, layout: &RunLayout) -> Result<()> {
    layout.check_prerequisites()?;
    let _lock = RunLock::acquire(layout.config_dir())?;
    layout.ensure_output_dir()?;
    println!("Saving media to {}", layout.output_dir().display());

    let url_count = match crawl_phase(cfg, layout).await {
        Ok(summary) => {
            report_crawl(layout, &summary);
            summary.urls_written
        }
        Err(e) => {
            // A half-finished manifest is still worth downloading.
            let salvaged = manifest::entry_count(&layout.manifest_path())?.unwrap_or(0);
            if salvaged == 0 {
                return Err(e);
            }
            tracing::warn!(
                "crawl aborted ({:#}); continuing with {} collected URL(s)",
                e,
                salvaged
            );
            println!(
                "Crawl aborted early; downloading the {} URL(s) collected so far.",
                salvaged
            );
            salvaged
        }
    };

    if url_count == 0 {
        println!("No episode URLs found; nothing to download.");
        return Ok(());
    }

    download_phase(cfg, layout).await
}
