//! Catalog page fetching.
//!
//! Uses the curl crate (libcurl) for blocking GETs with redirects, timeouts,
//! and a browser-like User-Agent. Retry and courtesy pacing live here so the
//! crawl code stays a plain page-walking loop.

use std::time::Duration;

use crate::config::DropdlConfig;
use crate::retry::{self, FetchError, RetryPolicy};

/// A fetched catalog page.
#[derive(Debug, Clone)]
pub struct Page {
    /// Final HTTP status code (after redirects).
    pub status: u32,
    /// Response body, decoded as UTF-8 (lossy).
    pub body: String,
}

/// Blocking fetcher for catalog pages.
///
/// Every successful fetch is followed by a fixed courtesy pause so the site
/// only ever sees slow, sequential traffic. Runs in the current thread; call
/// from `spawn_blocking` when used from async code.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    user_agent: String,
    timeout: Duration,
    request_delay: Duration,
    policy: RetryPolicy,
}

impl PageFetcher {
    pub fn new(
        user_agent: impl Into<String>,
        timeout: Duration,
        request_delay: Duration,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            user_agent: user_agent.into(),
            timeout,
            request_delay,
            policy,
        }
    }

    pub fn from_config(cfg: &DropdlConfig) -> Self {
        Self::new(
            cfg.user_agent.clone(),
            Duration::from_secs(cfg.timeout_secs),
            cfg.request_delay(),
            cfg.retry_policy(),
        )
    }

    /// GET a page with retries; any non-2xx status is an error.
    pub fn get(&self, url: &str) -> Result<Page, FetchError> {
        tracing::info!("GET {}", url);
        let page = retry::run_with_retry(&self.policy, || {
            let page = self.perform_get(url)?;
            if !(200..300).contains(&page.status) {
                return Err(FetchError::Http(page.status));
            }
            Ok(page)
        })?;
        self.pause();
        Ok(page)
    }

    /// GET for pagination probes: HTTP 400 is handed back as a page instead
    /// of an error, so the caller can treat it as end-of-catalog. A 400 gets
    /// no courtesy pause; the crawl is over.
    pub fn get_tolerating_400(&self, url: &str) -> Result<Page, FetchError> {
        tracing::info!("GET {}", url);
        let page = retry::run_with_retry(&self.policy, || {
            let page = self.perform_get(url)?;
            if page.status == 400 {
                return Ok(page);
            }
            if !(200..300).contains(&page.status) {
                return Err(FetchError::Http(page.status));
            }
            Ok(page)
        })?;
        if page.status != 400 {
            self.pause();
        }
        Ok(page)
    }

    fn perform_get(&self, url: &str) -> Result<Page, FetchError> {
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.useragent(&self.user_agent)?;
        easy.accept_encoding("")?;
        easy.connect_timeout(Duration::from_secs(15))?;
        easy.timeout(self.timeout)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        Ok(Page {
            status,
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }

    fn pause(&self) {
        if !self.request_delay.is_zero() {
            std::thread::sleep(self.request_delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_maps_timeouts_and_policy() {
        let mut cfg = DropdlConfig::default();
        cfg.timeout_secs = 7;
        cfg.request_delay_secs = 0.0;
        let fetcher = PageFetcher::from_config(&cfg);
        assert_eq!(fetcher.timeout, Duration::from_secs(7));
        assert!(fetcher.request_delay.is_zero());
        assert_eq!(fetcher.policy.max_attempts, 5);
    }
}
