//! Catalog REST API client
//!
//! Wraps an injected [`HttpClient`] and exposes typed operations for media
//! items and custom lists. Every non-2xx answer becomes
//! [`CatalogError::Http`]; requests that never reach the server become
//! [`CatalogError::Network`].

use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use core_runtime::config::CoreConfig;
use core_runtime::events::{CatalogEvent, CoreEvent, EventBus};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::{CatalogError, Result};
use crate::fetch::PageFetcher;
use crate::models::{
    CustomList, ListId, MediaId, MediaItem, MediaSummary, NewCustomList, NewMediaItem,
    UpdateCustomList,
};
use crate::pagination::{ListResponse, ResultPage};
use crate::query::QueryDescription;

/// Error body returned by the API for rejected requests.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// `lists/` answers with a bare array, or a paginated envelope when the
/// server has pagination enabled for it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CustomListsBody {
    Plain(Vec<CustomList>),
    Paged(ListResponse<CustomList>),
}

#[derive(Debug, Serialize)]
struct ListMembership {
    item_id: MediaId,
}

/// Typed client for the media catalog API.
///
/// # Example
///
/// ```ignore
/// use core_catalog::client::CatalogClient;
///
/// let client = CatalogClient::new(http_client, "http://127.0.0.1:8000/api/");
/// let item = client.get_item(42).await?;
/// ```
#[derive(Clone)]
pub struct CatalogClient {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout: Duration,
    event_bus: Option<EventBus>,
}

impl CatalogClient {
    pub fn new(http_client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let base_url = if base_url.ends_with('/') {
            base_url
        } else {
            format!("{}/", base_url)
        };

        Self {
            http_client,
            base_url,
            timeout: core_runtime::config::DEFAULT_REQUEST_TIMEOUT,
            event_bus: None,
        }
    }

    /// Client using the base URL, timeout and HTTP client of `config`.
    pub fn from_config(config: &CoreConfig) -> Self {
        Self::new(Arc::clone(&config.http_client), config.api_base_url.clone())
            .with_timeout(config.request_timeout)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Publish a [`CatalogEvent`] on `event_bus` after each successful mutation.
    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest::new(method, self.endpoint(path))
            .header("Accept", "application/json")
            .timeout(self.timeout)
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = request.method;
        let url = request.url.clone();

        let response = self.http_client.execute(request).await.map_err(|e| {
            warn!(?method, %url, error = %e, "Catalog request failed");
            CatalogError::from(e)
        })?;

        if response.is_success() {
            debug!(?method, %url, status = response.status, "Catalog request succeeded");
            return Ok(response);
        }

        warn!(?method, %url, status = response.status, "Catalog API rejected request");
        Err(Self::http_error(&response))
    }

    fn http_error(response: &HttpResponse) -> CatalogError {
        let message = serde_json::from_slice::<ApiErrorBody>(&response.body)
            .ok()
            .and_then(|body| body.message);

        CatalogError::Http {
            status: response.status,
            message,
        }
    }

    fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
        serde_json::from_slice(&response.body).map_err(|e| CatalogError::Parse(e.to_string()))
    }

    fn emit(&self, event: CatalogEvent) {
        if let Some(bus) = &self.event_bus {
            // No subscribers is not an error for the client.
            let _ = bus.emit(CoreEvent::Catalog(event));
        }
    }

    // ------------------------------------------------------------------
    // Media items
    // ------------------------------------------------------------------

    /// `GET items/?page=..` for the list view.
    #[instrument(skip(self, query), fields(page = query.page))]
    pub async fn fetch_items(&self, query: &QueryDescription) -> Result<ResultPage> {
        let path = format!("items/{}", query.to_query_string());
        let response = self.send(self.request(HttpMethod::Get, &path)).await?;
        let body: ListResponse<MediaSummary> = Self::decode(&response)?;

        debug!(
            count = body.count,
            received = body.results.len(),
            "Fetched media page"
        );
        Ok(ResultPage::from_response(body, query))
    }

    #[instrument(skip(self))]
    pub async fn get_item(&self, id: MediaId) -> Result<MediaItem> {
        let response = self
            .send(self.request(HttpMethod::Get, &format!("items/{}/", id)))
            .await?;
        Self::decode(&response)
    }

    #[instrument(skip(self, item), fields(title = %item.title))]
    pub async fn create_item(&self, item: &NewMediaItem) -> Result<MediaItem> {
        let request = self.request(HttpMethod::Post, "items/").json(item)?;
        let response = self.send(request).await?;
        let created: MediaItem = Self::decode(&response)?;

        info!(item_id = created.id, "Created media item");
        self.emit(CatalogEvent::ItemCreated {
            item_id: created.id,
            title: created.title.clone(),
        });
        Ok(created)
    }

    /// `PUT items/{id}/` with the full record.
    #[instrument(skip(self, item))]
    pub async fn update_item(&self, id: MediaId, item: &MediaItem) -> Result<MediaItem> {
        item.validate()
            .map_err(|message| CatalogError::invalid_input("item", message))?;

        let request = self
            .request(HttpMethod::Put, &format!("items/{}/", id))
            .json(item)?;
        let response = self.send(request).await?;
        let updated: MediaItem = Self::decode(&response)?;

        info!(item_id = id, "Updated media item");
        self.emit(CatalogEvent::ItemUpdated { item_id: id });
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: MediaId) -> Result<()> {
        self.send(self.request(HttpMethod::Delete, &format!("items/{}/", id)))
            .await?;

        info!(item_id = id, "Deleted media item");
        self.emit(CatalogEvent::ItemDeleted { item_id: id });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Custom lists
    // ------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn list_custom_lists(&self) -> Result<Vec<CustomList>> {
        let response = self.send(self.request(HttpMethod::Get, "lists/")).await?;
        let lists = match Self::decode::<CustomListsBody>(&response)? {
            CustomListsBody::Plain(lists) => lists,
            CustomListsBody::Paged(page) => page.results,
        };

        debug!(count = lists.len(), "Fetched custom lists");
        Ok(lists)
    }

    #[instrument(skip(self))]
    pub async fn get_custom_list(&self, id: ListId) -> Result<CustomList> {
        let response = self
            .send(self.request(HttpMethod::Get, &format!("lists/{}/", id)))
            .await?;
        Self::decode(&response)
    }

    #[instrument(skip(self, list), fields(name = %list.name))]
    pub async fn create_custom_list(&self, list: &NewCustomList) -> Result<CustomList> {
        list.validate()
            .map_err(|message| CatalogError::invalid_input("name", message))?;

        let request = self.request(HttpMethod::Post, "lists/").json(list)?;
        let response = self.send(request).await?;
        let created: CustomList = Self::decode(&response)?;

        info!(list_id = created.id, "Created custom list");
        self.emit(CatalogEvent::ListCreated {
            list_id: created.id,
            name: created.name.clone(),
        });
        Ok(created)
    }

    #[instrument(skip(self, list))]
    pub async fn update_custom_list(
        &self,
        id: ListId,
        list: &UpdateCustomList,
    ) -> Result<CustomList> {
        list.validate()
            .map_err(|message| CatalogError::invalid_input("name", message))?;

        let request = self
            .request(HttpMethod::Put, &format!("lists/{}/", id))
            .json(list)?;
        let response = self.send(request).await?;
        let updated: CustomList = Self::decode(&response)?;

        info!(list_id = id, "Updated custom list");
        self.emit(CatalogEvent::ListUpdated { list_id: id });
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_custom_list(&self, id: ListId) -> Result<()> {
        self.send(self.request(HttpMethod::Delete, &format!("lists/{}/", id)))
            .await?;

        info!(list_id = id, "Deleted custom list");
        self.emit(CatalogEvent::ListDeleted { list_id: id });
        Ok(())
    }

    /// `POST lists/{list_id}/items/` with `{"item_id": ..}`.
    #[instrument(skip(self))]
    pub async fn add_item_to_list(&self, list_id: ListId, item_id: MediaId) -> Result<()> {
        let request = self
            .request(HttpMethod::Post, &format!("lists/{}/items/", list_id))
            .json(&ListMembership { item_id })?;
        self.send(request).await?;

        info!(list_id, item_id, "Added media item to custom list");
        self.emit(CatalogEvent::ItemAddedToList { list_id, item_id });
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn remove_item_from_list(&self, list_id: ListId, item_id: MediaId) -> Result<()> {
        self.send(self.request(
            HttpMethod::Delete,
            &format!("lists/{}/items/{}/", list_id, item_id),
        ))
        .await?;

        info!(list_id, item_id, "Removed media item from custom list");
        self.emit(CatalogEvent::ItemRemovedFromList { list_id, item_id });
        Ok(())
    }
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("event_bus", &self.event_bus)
            .finish()
    }
}

#[async_trait]
impl PageFetcher for CatalogClient {
    async fn fetch_page(&self, query: &QueryDescription) -> Result<ResultPage> {
        self.fetch_items(query).await
    }
}
