//! Driving the external yt-dlp binary.
//!
//! dropdl does not download media itself: it assembles a yt-dlp invocation
//! over the episode manifest, wires in cookies and the download archive, and
//! lets the tool inherit the terminal for its own progress output.

mod locate;

pub use locate::{find_ffmpeg, find_ytdlp, resolve_binary, ToolError};

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::config::DropdlConfig;
use crate::layout::RunLayout;

/// How a yt-dlp batch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// yt-dlp exited 0.
    Completed,
    /// yt-dlp exited non-zero (some items failed or were unavailable).
    ToolFailed(i32),
    /// yt-dlp was killed by a signal (e.g. Ctrl-C in the terminal).
    Interrupted,
}

/// Output template: series/season folders with zero-padded numbering, the
/// layout media servers index out of the box.
const OUTPUT_TEMPLATE: &str =
    "%(series)s/Season %(season_number)02d/%(episode_number)02d - %(episode)s.%(ext)s";

/// Assemble the full yt-dlp argument vector for a batch run. Deterministic
/// and side-effect free so the invocation contract can be checked in tests.
pub fn build_args(layout: &RunLayout, cfg: &DropdlConfig, ffmpeg: Option<&Path>) -> Vec<String> {
    let output_template = layout.output_dir().join(OUTPUT_TEMPLATE);

    let mut args: Vec<String> = vec![
        "--cookies".into(),
        layout.cookies_path().display().to_string(),
        "-a".into(),
        layout.manifest_path().display().to_string(),
        "--write-subs".into(),
        "--write-auto-subs".into(),
        "--sub-langs".into(),
        cfg.sub_langs.clone(),
        "--embed-subs".into(),
        "--embed-thumbnail".into(),
        "--add-metadata".into(),
        "--embed-metadata".into(),
        "--write-info-json".into(),
        "--write-description".into(),
        "--write-thumbnail".into(),
        "--convert-thumbnails".into(),
        "jpg".into(),
        "--download-archive".into(),
        layout.archive_path().display().to_string(),
        "-o".into(),
        output_template.display().to_string(),
    ];

    if let Some(ffmpeg) = ffmpeg {
        args.push("--ffmpeg-location".into());
        args.push(ffmpeg.display().to_string());
    }
    args
}

/// Run yt-dlp over the manifest with inherited stdio.
///
/// A non-zero exit is an outcome, not an error: partial batches are normal
/// when individual episodes are region-locked or have gone offline, and the
/// archive still records everything that did finish.
pub async fn run_batch(layout: &RunLayout, cfg: &DropdlConfig) -> Result<BatchOutcome> {
    let binary = find_ytdlp()?;
    let ffmpeg = find_ffmpeg();
    if ffmpeg.is_none() {
        tracing::warn!("ffmpeg not found; yt-dlp will use its own lookup for post-processing");
    }
    let args = build_args(layout, cfg, ffmpeg.as_deref());

    tracing::info!("starting yt-dlp batch via {}", binary.display());
    let status = Command::new(&binary)
        .args(&args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .with_context(|| format!("spawn yt-dlp at {}", binary.display()))?;

    let outcome = match status.code() {
        Some(0) => BatchOutcome::Completed,
        Some(code) => BatchOutcome::ToolFailed(code),
        None => BatchOutcome::Interrupted,
    };
    tracing::info!("yt-dlp batch finished: {:?}", outcome);
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (RunLayout, DropdlConfig) {
        let layout = RunLayout::new(Path::new("/media/dropout"), Path::new("/cfg")).unwrap();
        (layout, DropdlConfig::default())
    }

    #[test]
    fn build_args_matches_invocation_contract() {
        let (layout, cfg) = fixture();
        let args = build_args(&layout, &cfg, None);
        let expected: Vec<String> = [
            "--cookies",
            "/cfg/cookies.txt",
            "-a",
            "/cfg/urls.txt",
            "--write-subs",
            "--write-auto-subs",
            "--sub-langs",
            "en.*",
            "--embed-subs",
            "--embed-thumbnail",
            "--add-metadata",
            "--embed-metadata",
            "--write-info-json",
            "--write-description",
            "--write-thumbnail",
            "--convert-thumbnails",
            "jpg",
            "--download-archive",
            "/cfg/archive.txt",
            "-o",
            "/media/dropout/%(series)s/Season %(season_number)02d/%(episode_number)02d - %(episode)s.%(ext)s",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert_eq!(args, expected);
    }

    #[test]
    fn build_args_appends_ffmpeg_location_when_found() {
        let (layout, cfg) = fixture();
        let args = build_args(&layout, &cfg, Some(Path::new("/usr/bin/ffmpeg")));
        let n = args.len();
        assert_eq!(args[n - 2], "--ffmpeg-location");
        assert_eq!(args[n - 1], "/usr/bin/ffmpeg");
    }

    #[test]
    fn build_args_uses_configured_sub_langs() {
        let (layout, mut cfg) = fixture();
        cfg.sub_langs = "de.*".to_string();
        let args = build_args(&layout, &cfg, None);
        let idx = args.iter().position(|a| a == "--sub-langs").unwrap();
        assert_eq!(args[idx + 1], "de.*");
    }
}
