//! Fetch error type for retry classification.

use std::fmt;

/// Error returned by a single catalog page fetch (curl failure or HTTP error).
/// Kept as a small enum so the retry policy can classify it; command-level
/// code converts it to anyhow once retries are exhausted.
#[derive(Debug)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection reset, DNS, etc.).
    Curl(curl::Error),
    /// HTTP response had a non-2xx status the caller did not tolerate.
    Http(u32),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Curl(e) => write!(f, "{}", e),
            FetchError::Http(code) => write!(f, "HTTP {}", code),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Curl(e) => Some(e),
            FetchError::Http(_) => None,
        }
    }
}

impl From<curl::Error> for FetchError {
    fn from(e: curl::Error) -> Self {
        FetchError::Curl(e)
    }
}
