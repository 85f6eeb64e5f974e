//! Locating external binaries (yt-dlp, ffmpeg) on PATH or in the current
//! directory.

use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Missing external tooling the batch run cannot work without.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("yt-dlp binary not found in PATH or current directory")]
    YtdlpMissing,
}

fn ytdlp_candidates() -> &'static [&'static str] {
    if cfg!(windows) {
        &["yt-dlp.exe", "yt-dlp"]
    } else {
        &["yt-dlp"]
    }
}

fn ffmpeg_candidates() -> &'static [&'static str] {
    if cfg!(windows) {
        &["ffmpeg.exe", "ffmpeg"]
    } else {
        &["ffmpeg"]
    }
}

/// Resolve a binary by candidate names: search PATH first, then the current
/// directory (the container image drops yt-dlp next to the app).
pub fn resolve_binary(names: &[&str]) -> Option<PathBuf> {
    for name in names {
        if let Some(path_var) = env::var_os("PATH") {
            if let Some(found) = search_dirs(name, env::split_paths(&path_var)) {
                return Some(found);
            }
        }
        if let Ok(cwd) = env::current_dir() {
            let local = cwd.join(name);
            if is_executable(&local) {
                return Some(local);
            }
        }
    }
    None
}

fn search_dirs(name: &str, dirs: impl Iterator<Item = PathBuf>) -> Option<PathBuf> {
    for dir in dirs {
        if dir.as_os_str().is_empty() {
            continue;
        }
        let candidate = dir.join(name);
        if is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.is_file()
        && path
            .metadata()
            .map(|m| m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// The downloader binary is required.
pub fn find_ytdlp() -> Result<PathBuf, ToolError> {
    resolve_binary(ytdlp_candidates()).ok_or(ToolError::YtdlpMissing)
}

/// ffmpeg is optional: when found its location is passed to yt-dlp
/// explicitly, otherwise yt-dlp falls back to its own lookup.
pub fn find_ffmpeg() -> Option<PathBuf> {
    resolve_binary(ffmpeg_candidates())
}
