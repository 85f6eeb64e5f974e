//! `dropdl download` – run yt-dlp over an existing episode manifest.

use anyhow::Result;
use dropdl_core::archive::RunLock;
use dropdl_core::config::DropdlConfig;
use dropdl_core::layout::RunLayout;
use dropdl_core::manifest;
use dropdl_core::ytdlp::{self, BatchOutcome};

pub async fn run_download(cfg: &DropdlConfig, layout: &RunLayout) -> Result<()> {
    layout.check_prerequisites()?;
    let _lock = RunLock::acquire(layout.config_dir())?;

    let urls = manifest::entry_count(&layout.manifest_path())?.unwrap_or(0);
    if urls == 0 {
        println!("Episode manifest is empty or missing; run `dropdl scrape` first.");
        return Ok(());
    }

    layout.ensure_output_dir()?;
    download_phase(cfg, layout).await
}

/// Invoke the yt-dlp batch and report its outcome. Shared with `dropdl run`.
pub(super) async fn download_phase(cfg: &DropdlConfig, layout: &RunLayout) -> Result<()> {
    println!("Starting yt-dlp download batch ...");
    match ytdlp::run_batch(layout, cfg).await? {
        BatchOutcome::Completed => println!("Download batch complete."),
        BatchOutcome::ToolFailed(code) => {
            println!("yt-dlp finished with errors (exit code {}); completed items are recorded in the archive.", code);
        }
        BatchOutcome::Interrupted => println!("Download cancelled."),
    }
    Ok(())
}
