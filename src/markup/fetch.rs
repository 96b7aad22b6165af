use std::time::Duration;

use tracing::{debug, warn};

use crate::error::EngineError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Source of raw markup for a URL.
///
/// The engine itself does no I/O; analysis of a URL goes through this seam
/// so callers can swap in a cached or in-memory source.
pub trait MarkupSource {
    fn fetch(&self, url: &str) -> Result<String, EngineError>;
}

/// Blocking HTTP fetch with a desktop browser user agent.
///
/// The client is built once and reused for every fetch.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, EngineError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|source| EngineError::HttpClient { source })?;
        Ok(Self { client })
    }
}

impl MarkupSource for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, EngineError> {
        let fetch_err = |source| EngineError::Fetch {
            url: url.to_string(),
            source,
        };

        debug!(url, "fetching markup");
        let response = self.client.get(url).send().map_err(fetch_err)?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "fetch returned non-success status");
            return Err(EngineError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().map_err(fetch_err)
    }
}
