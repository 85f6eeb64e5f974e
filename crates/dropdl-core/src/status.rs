//! Run-state snapshot for the `status` command.

use anyhow::Result;
use serde::Serialize;

use crate::archive;
use crate::layout::RunLayout;
use crate::manifest;

/// Snapshot of the persistent state in the output/config directories.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub output_dir: String,
    pub config_dir: String,
    pub cookies_present: bool,
    /// Entries in the yt-dlp download archive; None = file absent.
    pub archive_entries: Option<u64>,
    /// URLs in the episode manifest; None = no crawl has run yet.
    pub manifest_urls: Option<u64>,
}

impl StatusReport {
    pub fn gather(layout: &RunLayout) -> Result<Self> {
        Ok(Self {
            output_dir: layout.output_dir().display().to_string(),
            config_dir: layout.config_dir().display().to_string(),
            cookies_present: layout.cookies_path().is_file(),
            archive_entries: archive::entry_count(&layout.archive_path())?,
            manifest_urls: manifest::entry_count(&layout.manifest_path())?,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
