//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest`, with retry and exponential backoff for
//!   `5xx`/`429` responses and connection failures
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::ReqwestHttpClient;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let http_client = Arc::new(ReqwestHttpClient::with_timeout(Duration::from_secs(10)));
//! // Hand it to CoreConfig::builder().http_client(http_client)
//! ```

mod http;

pub use http::ReqwestHttpClient;
