//! Core service façade and bootstrap helpers.
//!
//! This crate wires the host-provided HTTP bridge, configuration and event bus
//! into the catalog core. Desktop apps typically enable the `desktop-shims`
//! feature, which lets the configuration fall back to the reqwest-based
//! client from `bridge-desktop`; other hosts inject their own `HttpClient`.

pub mod error;

pub use error::{CoreError, Result};

use std::sync::Arc;

use bridge_traits::http::HttpClient;
use core_catalog::{CatalogClient, QueryController, SearchDebouncer};
use core_runtime::config::{CoreConfig, CoreConfigBuilder};
use core_runtime::events::{CoreEvent, EventBus, Receiver};
use tracing::info;

pub use core_catalog;
pub use core_runtime;

/// Primary façade exposed to host applications.
///
/// Holds one catalog client and one event bus; every controller created
/// from the service publishes to that bus.
#[derive(Clone)]
pub struct CatalogService {
    config: Arc<CoreConfig>,
    client: CatalogClient,
    event_bus: EventBus,
}

impl CatalogService {
    /// Create a new service from a validated configuration.
    pub fn new(config: CoreConfig) -> Self {
        let event_bus = EventBus::new(config.event_buffer_size);
        let client = CatalogClient::from_config(&config).with_event_bus(event_bus.clone());

        info!(
            api_base_url = %config.api_base_url,
            page_size = config.page_size,
            "Catalog service ready"
        );

        Self {
            config: Arc::new(config),
            client,
            event_bus,
        }
    }

    /// Build the configuration and the service in one step.
    ///
    /// ```ignore
    /// use core_runtime::config::CoreConfig;
    ///
    /// let service = core_service::CatalogService::bootstrap(
    ///     CoreConfig::builder().api_base_url("http://127.0.0.1:8000/api/"),
    /// )?;
    /// let media_list = service.media_list();
    /// media_list.refresh();
    /// ```
    pub fn bootstrap(builder: CoreConfigBuilder) -> Result<Self> {
        let config = builder.build().map_err(|err| match err {
            core_runtime::Error::CapabilityMissing {
                capability,
                message,
            } => CoreError::CapabilityMissing {
                capability,
                message,
            },
            other => CoreError::Runtime(other),
        })?;
        Ok(Self::new(config))
    }

    /// Service using default settings and the given HTTP client.
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Result<Self> {
        Self::bootstrap(CoreConfig::builder().http_client(http_client))
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// REST client for item and list operations.
    pub fn client(&self) -> &CatalogClient {
        &self.client
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.event_bus.subscribe()
    }

    /// New controller for a media list view, in the `loading` state.
    ///
    /// Call `refresh()` on it to issue the initial fetch.
    pub fn media_list(&self) -> QueryController {
        QueryController::new(
            Arc::new(self.client.clone()),
            self.config.page_size,
            Some(self.event_bus.clone()),
        )
    }

    /// Debouncer feeding search input to `controller` with the configured delay.
    pub fn search_debouncer(&self, controller: QueryController) -> SearchDebouncer {
        SearchDebouncer::new(controller, self.config.search_debounce)
    }
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("config", &self.config)
            .field("event_bus", &self.event_bus)
            .finish()
    }
}
