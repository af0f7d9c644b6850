//! Fetch capability consumed by the query controller.

use async_trait::async_trait;

use crate::error::Result;
use crate::pagination::ResultPage;
use crate::query::QueryDescription;

/// Produces one page of results for a query.
///
/// [`CatalogClient`](crate::client::CatalogClient) is the production
/// implementation; tests substitute in-memory fetchers.
///
/// Implementations report transport failures as
/// [`CatalogError::Network`](crate::error::CatalogError::Network) and non-2xx
/// responses as [`CatalogError::Http`](crate::error::CatalogError::Http).
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, query: &QueryDescription) -> Result<ResultPage>;
}
