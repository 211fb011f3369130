//! HTTP client for the transfers pages
//!
//! Issues one plain GET per page with a fixed browser-like User-Agent.
//! There is no retry: a network failure is returned to the caller, which
//! decides whether to skip the window or give up.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, TransferError};
use crate::types::PageRequest;

/// Default site the transfer tables are read from
pub const DEFAULT_BASE_URL: &str = "https://www.transfermarkt.co.uk";

/// Default User-Agent mimicking a desktop browser
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/47.0.2526.106 Safari/537.36";

/// Configuration for the transfers HTTP client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Scheme and host, without a trailing path
    pub base_url: String,
    pub user_agent: String,
    /// Request timeout in seconds; `None` keeps the client default
    pub timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: None,
        }
    }
}

/// HTTP client for the league transfers pages
pub struct TransferClient {
    client: reqwest::Client,
    base_url: String,
}

impl TransferClient {
    /// Create a new client with default configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    ///
    /// # Arguments
    /// * `config` - Base URL, User-Agent and optional timeout
    ///
    /// # Errors
    /// - `TransferError::InvalidUrl` - base URL is not http(s)
    /// - `TransferError::HttpError` - the HTTP client cannot be built
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(TransferError::InvalidUrl(config.base_url));
        }

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self { client, base_url })
    }

    /// Build the transfers page URL for a league, season and window.
    ///
    /// # Example
    /// ```
    /// use transfers_core::{PageRequest, TransferClient, Window};
    ///
    /// let client = TransferClient::new().unwrap();
    /// let request = PageRequest::new("premier-league", "GB1", 2018, Window::Winter);
    /// assert_eq!(
    ///     client.page_url(&request),
    ///     "https://www.transfermarkt.co.uk/premier-league/transfers/wettbewerb/GB1/plus/?saison_id=2018&s_w=w"
    /// );
    /// ```
    pub fn page_url(&self, request: &PageRequest) -> String {
        format!(
            "{}/{}/transfers/wettbewerb/{}/plus/?saison_id={}&s_w={}",
            self.base_url,
            urlencoding::encode(&request.league_slug),
            urlencoding::encode(&request.league_id),
            request.season,
            request.window.code(),
        )
    }

    /// Fetch the raw HTML of a transfers page.
    ///
    /// The body is returned whatever the HTTP status; an error page simply
    /// yields no tables downstream.
    ///
    /// # Arguments
    /// * `request` - League, season and window of the page
    ///
    /// # Returns
    /// The response body as a string
    ///
    /// # Errors
    /// - `TransferError::HttpError` - DNS, connection or timeout failure
    pub async fn fetch(&self, request: &PageRequest) -> Result<String> {
        let url = self.page_url(request);
        debug!(%url, "requesting transfers page");

        let response = self.client.get(&url).send().await?;
        info!("Connection successful, status code {}", response.status().as_u16());

        Ok(response.text().await?)
    }
}
