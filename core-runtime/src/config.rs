//! # Core Configuration Module
//!
//! Provides configuration management for the media tracker core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds the catalog API location, the list-view tuning knobs
//! and the injected `HttpClient`. It validates everything up front so a
//! misconfigured host fails at startup instead of on the first request.
//!
//! ## Optional Dependencies (with platform defaults)
//!
//! - `HttpClient` - HTTP operations (desktop default: reqwest)
//!
//! When the `desktop-shims` feature is enabled, the reqwest-backed client is
//! injected automatically if none was provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::time::Duration;
//!
//! let config = CoreConfig::builder()
//!     .api_base_url("http://127.0.0.1:8000/api/")
//!     .request_timeout(Duration::from_secs(10))
//!     .http_client(Arc::new(MyHttpClient))
//!     .build()
//!     .expect("Failed to build config");
//! ```

use crate::error::{Error, Result};
use bridge_traits::HttpClient;
use std::sync::Arc;
use std::time::Duration;

/// Base URL of the catalog REST API when none is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api/";

/// Number of items shown per list page.
pub const DEFAULT_PAGE_SIZE: u32 = 24;

/// Per-request timeout applied to catalog API calls.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Quiet period before a typed search term is forwarded to the controller.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Shortest debounce window accepted for search input.
pub const MIN_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Default event bus capacity.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

const MAX_PAGE_SIZE: u32 = 500;

/// Core configuration for the media tracker.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Base URL of the catalog API, always ending with `/`
    pub api_base_url: String,

    /// Timeout applied to each API request
    pub request_timeout: Duration,

    /// Number of items requested per list page
    pub page_size: u32,

    /// Debounce window for search input
    pub search_debounce: Duration,

    /// Event bus capacity
    pub event_buffer_size: usize,

    /// HTTP client used for API requests
    pub http_client: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout", &self.request_timeout)
            .field("page_size", &self.page_size)
            .field("search_debounce", &self.search_debounce)
            .field("event_buffer_size", &self.event_buffer_size)
            .field("http_client", &"HttpClient { ... }")
            .finish()
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - The API base URL is an absolute `http(s)` URL
    /// - Page size is within `1..=500`
    /// - Search debounce is at least 300ms
    /// - Request timeout and event buffer are non-zero
    pub fn validate(&self) -> Result<()> {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            return Err(Error::Config("API base URL cannot be empty".to_string()));
        }

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "API base URL must start with http:// or https://, got '{}'",
                url
            )));
        }

        if self.page_size == 0 {
            return Err(Error::Config(
                "Page size must be greater than 0".to_string(),
            ));
        }

        if self.page_size > MAX_PAGE_SIZE {
            return Err(Error::Config(format!(
                "Page size exceeds maximum of {}",
                MAX_PAGE_SIZE
            )));
        }

        if self.search_debounce < MIN_SEARCH_DEBOUNCE {
            return Err(Error::Config(format!(
                "Search debounce must be at least {}ms",
                MIN_SEARCH_DEBOUNCE.as_millis()
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(Error::Config(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Ensures the base URL ends with a slash so relative paths join cleanly.
fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn http_client_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "No HTTP client implementation provided. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use ReqwestHttpClient. \
                 Web/tests: inject an HttpClient implementation."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client(timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::with_timeout(timeout));
    Ok(client)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client(_timeout: Duration) -> Result<Arc<dyn HttpClient>> {
    Err(http_client_missing_error())
}

/// Builder for constructing [`CoreConfig`] instances.
#[derive(Default)]
pub struct CoreConfigBuilder {
    api_base_url: Option<String>,
    request_timeout: Option<Duration>,
    page_size: Option<u32>,
    search_debounce: Option<Duration>,
    event_buffer_size: Option<usize>,
    http_client: Option<Arc<dyn HttpClient>>,
}

impl CoreConfigBuilder {
    /// Sets the catalog API base URL.
    ///
    /// Default: `http://127.0.0.1:8000/api/`
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Sets the per-request timeout.
    ///
    /// Default: 10 seconds
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the number of items per list page.
    ///
    /// Default: 24
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Sets the search debounce window.
    ///
    /// Default: 300ms
    pub fn search_debounce(mut self, debounce: Duration) -> Self {
        self.search_debounce = Some(debounce);
        self
    }

    /// Sets the event bus capacity.
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Sets the HTTP client implementation.
    ///
    /// If not provided, the desktop default (reqwest-based) is used when the
    /// `desktop-shims` feature is enabled.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::CapabilityMissing` when no HTTP client is available and
    /// `Error::Config` when a value fails validation.
    pub fn build(self) -> Result<CoreConfig> {
        let request_timeout = self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client(request_timeout)?,
        };

        let config = CoreConfig {
            api_base_url: normalize_base_url(
                self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL),
            ),
            request_timeout,
            page_size: self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            search_debounce: self.search_debounce.unwrap_or(DEFAULT_SEARCH_DEBOUNCE),
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
            http_client,
        };

        config.validate()?;
        Ok(config)
    }
}
