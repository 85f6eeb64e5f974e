//! Episode URL manifest (urls.txt).
//!
//! The crawl truncates the manifest once, then appends one URL per line as
//! each series is scraped, so an interrupted crawl still leaves a usable
//! batch file for yt-dlp (`-a urls.txt`).

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Incremental writer for the episode manifest.
pub struct ManifestWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    written: u64,
}

impl ManifestWriter {
    /// Create (or truncate) the manifest at `path`, creating parent dirs.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create dir: {}", parent.display()))?;
        }
        let file = File::create(path)
            .with_context(|| format!("create manifest: {}", path.display()))?;
        Ok(Self {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
            written: 0,
        })
    }

    /// Append a batch of URLs (one per line) and flush immediately so
    /// progress survives an interrupted crawl. Returns how many were written.
    pub fn append_urls<'a>(&mut self, urls: impl IntoIterator<Item = &'a str>) -> Result<u64> {
        let mut appended = 0u64;
        for url in urls {
            writeln!(self.writer, "{}", url)
                .with_context(|| format!("write manifest: {}", self.path.display()))?;
            appended += 1;
        }
        self.writer
            .flush()
            .with_context(|| format!("flush manifest: {}", self.path.display()))?;
        self.written += appended;
        Ok(appended)
    }

    /// Total URLs written through this writer.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Read all manifest entries, skipping blank lines.
pub fn read_urls(path: &Path) -> Result<Vec<String>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read manifest: {}", path.display()))?;
    Ok(data
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// Number of manifest entries, or None when the manifest does not exist.
pub fn entry_count(path: &Path) -> Result<Option<u64>> {
    match fs::read_to_string(path) {
        Ok(data) => Ok(Some(
            data.lines().filter(|l| !l.trim().is_empty()).count() as u64
        )),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("read manifest: {}", path.display())),
    }
}
