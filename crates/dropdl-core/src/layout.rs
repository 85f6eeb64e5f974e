//! Run directory layout: the output and config directories and the
//! well-known files inside them.
//!
//! The output directory receives finished media; the config directory holds
//! cookies.txt (site auth), archive.txt (yt-dlp's de-duplication ledger),
//! urls.txt (the episode manifest) and dropdl.toml. In the container both are
//! host-mounted volumes, so every path is passed in explicitly instead of
//! hardcoded.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const COOKIES_FILE: &str = "cookies.txt";
pub const ARCHIVE_FILE: &str = "archive.txt";
pub const MANIFEST_FILE: &str = "urls.txt";

/// Fatal prerequisite failures checked before a download run.
#[derive(Debug, Error)]
pub enum PrereqError {
    #[error("cookies file not found: {}; export browser cookies as cookies.txt into the config directory", .path.display())]
    CookiesMissing { path: PathBuf },
}

/// Resolved pair of run directories.
#[derive(Debug, Clone)]
pub struct RunLayout {
    output_dir: PathBuf,
    config_dir: PathBuf,
}

impl RunLayout {
    /// Build a layout from raw CLI paths: `~` and `$VAR` references are
    /// expanded and relative paths are resolved against the current directory.
    pub fn new(output_dir: &Path, config_dir: &Path) -> anyhow::Result<Self> {
        Ok(Self {
            output_dir: resolve_path(output_dir)?,
            config_dir: resolve_path(config_dir)?,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn cookies_path(&self) -> PathBuf {
        self.config_dir.join(COOKIES_FILE)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.config_dir.join(ARCHIVE_FILE)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.config_dir.join(MANIFEST_FILE)
    }

    pub fn ensure_output_dir(&self) -> anyhow::Result<()> {
        fs::create_dir_all(&self.output_dir).map_err(|e| {
            anyhow::anyhow!("create output dir {}: {}", self.output_dir.display(), e)
        })
    }

    pub fn ensure_config_dir(&self) -> anyhow::Result<()> {
        fs::create_dir_all(&self.config_dir).map_err(|e| {
            anyhow::anyhow!("create config dir {}: {}", self.config_dir.display(), e)
        })
    }

    /// Check files a download run depends on. Missing cookies are fatal;
    /// a missing archive only means nothing gets skipped this run (yt-dlp
    /// creates the file), so it is logged and tolerated.
    pub fn check_prerequisites(&self) -> Result<(), PrereqError> {
        let cookies = self.cookies_path();
        if !cookies.is_file() {
            return Err(PrereqError::CookiesMissing { path: cookies });
        }
        tracing::debug!("cookies found at {}", cookies.display());

        let archive = self.archive_path();
        if archive.is_file() {
            tracing::debug!("archive found at {}", archive.display());
        } else {
            tracing::warn!(
                "archive file not found at {}; previously downloaded episodes will not be skipped this run",
                archive.display()
            );
        }
        Ok(())
    }
}

/// Expand `~` and `$VAR`/`${VAR}` in a path, then make it absolute against
/// the current directory. Unset variables are left untouched.
pub fn resolve_path(raw: &Path) -> anyhow::Result<PathBuf> {
    let s = raw.to_string_lossy();
    let expanded = PathBuf::from(expand_env(&expand_user(&s)));
    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(env::current_dir()?.join(expanded))
    }
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

fn expand_user(input: &str) -> String {
    if input == "~" {
        if let Some(home) = home_dir() {
            return home.to_string_lossy().into_owned();
        }
    } else if let Some(rest) = input.strip_prefix("~/") {
        if let Some(home) = home_dir() {
            return home.join(rest).to_string_lossy().into_owned();
        }
    }
    input.to_string()
}

fn expand_env(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        let braced = chars.peek() == Some(&'{');
        if braced {
            chars.next();
        }
        let mut name = String::new();
        while let Some(&n) = chars.peek() {
            let ident = n.is_ascii_alphanumeric() || n == '_';
            if braced && n == '}' {
                break;
            }
            if !ident {
                break;
            }
            name.push(n);
            chars.next();
        }
        let closed = if braced {
            if chars.peek() == Some(&'}') {
                chars.next();
                true
            } else {
                false
            }
        } else {
            true
        };
        match env::var(&name) {
            Ok(val) if closed && !name.is_empty() => out.push_str(&val),
            _ => {
                // Leave the reference as written (matches what a shell user
                // would see echoed back for an unset variable).
                out.push('$');
                if braced {
                    out.push('{');
                }
                out.push_str(&name);
                if braced && closed {
                    out.push('}');
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_tilde_to_home() {
        if home_dir().is_none() {
            return;
        }
        let p = resolve_path(Path::new("~/videos")).unwrap();
        assert!(p.is_absolute());
        assert!(p.ends_with("videos"));
        assert!(!p.to_string_lossy().contains('~'));
    }

    #[test]
    fn expands_set_env_var() {
        env::set_var("DROPDL_TEST_LAYOUT_DIR", "/tmp/dropdl-test");
        assert_eq!(expand_env("$DROPDL_TEST_LAYOUT_DIR/x"), "/tmp/dropdl-test/x");
        assert_eq!(
            expand_env("${DROPDL_TEST_LAYOUT_DIR}/y"),
            "/tmp/dropdl-test/y"
        );
    }

    #[test]
    fn leaves_unset_env_var_alone() {
        assert_eq!(expand_env("$DROPDL_NO_SUCH_VAR/x"), "$DROPDL_NO_SUCH_VAR/x");
        assert_eq!(expand_env("${DROPDL_NO_SUCH_VAR}"), "${DROPDL_NO_SUCH_VAR}");
        assert_eq!(expand_env("100$"), "100$");
    }

    #[test]
    fn relative_paths_become_absolute() {
        let p = resolve_path(Path::new("Dropout")).unwrap();
        assert!(p.is_absolute());
        assert!(p.ends_with("Dropout"));
    }

    #[test]
    fn well_known_files_live_in_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let layout = RunLayout::new(Path::new("/out"), dir.path()).unwrap();
        assert_eq!(layout.cookies_path(), dir.path().join("cookies.txt"));
        assert_eq!(layout.archive_path(), dir.path().join("archive.txt"));
        assert_eq!(layout.manifest_path(), dir.path().join("urls.txt"));
    }

    #[test]
    fn missing_cookies_is_fatal_missing_archive_is_not() {
        let dir = tempfile::tempdir().unwrap();
        let layout = RunLayout::new(Path::new("/out"), dir.path()).unwrap();
        let PrereqError::CookiesMissing { path } = layout.check_prerequisites().unwrap_err();
        assert_eq!(path, dir.path().join("cookies.txt"));

        fs::write(layout.cookies_path(), "# Netscape HTTP Cookie File\n").unwrap();
        // Archive still missing: allowed.
        layout.check_prerequisites().unwrap();
    }
}
