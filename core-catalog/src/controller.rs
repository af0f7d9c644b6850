//! # Query Controller
//!
//! Drives the media list view: owns the filter/sort/page selections, spawns
//! one fetch per change and folds the results back in epoch order.
//!
//! ## Overview
//!
//! ```text
//! set_category(..) ──> QueryState ──ticket(epoch 7)──> tokio::spawn ──> PageFetcher
//!                          ^                                                │
//!                          └──────────── reconcile(epoch 7, result) <───────┘
//! ```
//!
//! Mutators are synchronous. The state lock is only held while the state is
//! updated, never across the network call. Responses for superseded epochs
//! are dropped on arrival; nothing in flight is cancelled.
//!
//! The controller does not debounce. Wrap it in
//! [`SearchDebouncer`](crate::debounce::SearchDebouncer) for keystroke input.
//!
//! ## Usage
//!
//! ```ignore
//! use core_catalog::controller::QueryController;
//! use core_catalog::models::MediaCategory;
//!
//! let controller = QueryController::new(Arc::new(client), 24, Some(event_bus));
//! controller.refresh();
//! if let Some(handle) = controller.set_category(Some(MediaCategory::Anime)) {
//!     handle.wait().await;
//! }
//! println!("{:?}", controller.current_results());
//! ```

use core_runtime::events::{CoreEvent, EventBus, QueryEvent};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::fetch::PageFetcher;
use crate::models::MediaCategory;
use crate::query::{QueryDescription, SortKey};
use crate::state::{FetchTicket, QueryState, Reconciliation, ResultsView};

/// Final result of a spawned fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The results became the ready view.
    Applied,
    /// The view now shows an error message.
    Failed(String),
    /// A newer request superseded this one before it finished.
    Stale,
    /// The task panicked or was cancelled by the runtime.
    Aborted,
}

/// Handle to a fetch spawned by a controller mutation.
///
/// Dropping the handle does not cancel the fetch.
#[derive(Debug)]
pub struct FetchHandle {
    epoch: u64,
    join: JoinHandle<FetchOutcome>,
}

impl FetchHandle {
    /// Epoch the fetch was issued under.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the fetch, including any follow-up fetch caused by page
    /// clamping, to be reconciled.
    pub async fn wait(self) -> FetchOutcome {
        match self.join.await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(epoch = self.epoch, error = %err, "Fetch task did not complete");
                FetchOutcome::Aborted
            }
        }
    }
}

struct Inner {
    state: Mutex<QueryState>,
    fetcher: Arc<dyn PageFetcher>,
    event_bus: Option<EventBus>,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, QueryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: QueryEvent) {
        if let Some(bus) = &self.event_bus {
            let _ = bus.emit(CoreEvent::Query(event));
        }
    }
}

/// Query state controller for the media list view.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct QueryController {
    inner: Arc<Inner>,
}

impl QueryController {
    /// Create a controller in the `loading` state with default filters.
    ///
    /// Nothing is fetched until the first mutation or [`refresh`](Self::refresh).
    pub fn new(fetcher: Arc<dyn PageFetcher>, page_size: u32, event_bus: Option<EventBus>) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(QueryState::new(page_size)),
                fetcher,
                event_bus,
            }),
        }
    }

    pub fn set_search_term(&self, term: impl Into<String>) -> Option<FetchHandle> {
        let ticket = self.inner.lock().set_search_term(term);
        self.spawn_fetch(ticket)
    }

    /// `None` selects all categories.
    pub fn set_category(&self, category: Option<MediaCategory>) -> Option<FetchHandle> {
        let ticket = self.inner.lock().set_category(category);
        self.spawn_fetch(ticket)
    }

    /// `None` selects all statuses.
    pub fn set_status(&self, status: Option<&str>) -> Option<FetchHandle> {
        let ticket = self.inner.lock().set_status(status);
        self.spawn_fetch(ticket)
    }

    pub fn set_sort_key(&self, sort_key: SortKey) -> Option<FetchHandle> {
        let ticket = self.inner.lock().set_sort_key(sort_key);
        self.spawn_fetch(ticket)
    }

    /// Jump to `page` keeping every other selection.
    ///
    /// Pages outside `1..=total pages` of the last result are ignored and
    /// return `None`.
    pub fn set_page(&self, page: u32) -> Option<FetchHandle> {
        let ticket = self.inner.lock().set_page(page);
        match ticket {
            Some(ticket) => self.spawn_fetch(ticket),
            None => {
                debug!(page, "Ignoring out-of-range page request");
                None
            }
        }
    }

    /// Re-issue the current query; used for the initial load and retries.
    pub fn refresh(&self) -> Option<FetchHandle> {
        let ticket = self.inner.lock().refresh();
        self.spawn_fetch(ticket)
    }

    /// Latest reconciled view.
    pub fn current_results(&self) -> ResultsView {
        self.inner.lock().view().clone()
    }

    pub fn query(&self) -> QueryDescription {
        self.inner.lock().query().clone()
    }

    pub fn epoch(&self) -> u64 {
        self.inner.lock().epoch()
    }

    /// Status filter choices for the selected category.
    pub fn status_options(&self) -> &'static [&'static str] {
        self.inner.lock().status_options()
    }

    pub fn known_total_pages(&self) -> u32 {
        self.inner.lock().known_total_pages()
    }

    fn spawn_fetch(&self, ticket: FetchTicket) -> Option<FetchHandle> {
        let Ok(runtime) = Handle::try_current() else {
            warn!(
                epoch = ticket.epoch,
                "No tokio runtime available; fetch not issued"
            );
            return None;
        };

        let epoch = ticket.epoch;
        self.inner.emit(QueryEvent::FetchStarted {
            epoch,
            query: ticket.query.to_query_string(),
        });

        let inner = Arc::clone(&self.inner);
        let join = runtime.spawn(run_fetch(inner, ticket));
        Some(FetchHandle { epoch, join })
    }
}

impl std::fmt::Debug for QueryController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("QueryController")
            .field("query", state.query())
            .field("epoch", &state.epoch())
            .finish()
    }
}

async fn run_fetch(inner: Arc<Inner>, mut ticket: FetchTicket) -> FetchOutcome {
    loop {
        debug!(epoch = ticket.epoch, page = ticket.query.page, "Fetching media page");
        let result = inner.fetcher.fetch_page(&ticket.query).await;

        let reconciliation = {
            let mut state = inner.lock();
            state.reconcile(ticket.epoch, result)
        };

        match reconciliation {
            Reconciliation::Applied {
                total_count,
                total_pages,
                page,
            } => {
                debug!(epoch = ticket.epoch, total_count, total_pages, "Media page applied");
                inner.emit(QueryEvent::ResultsReady {
                    epoch: ticket.epoch,
                    total_count,
                    total_pages,
                    page,
                });
                return FetchOutcome::Applied;
            }
            Reconciliation::Failed { message } => {
                warn!(epoch = ticket.epoch, %message, "Media page fetch failed");
                inner.emit(QueryEvent::FetchFailed {
                    epoch: ticket.epoch,
                    message: message.clone(),
                });
                return FetchOutcome::Failed(message);
            }
            Reconciliation::Stale { current_epoch } => {
                debug!(
                    epoch = ticket.epoch,
                    current_epoch, "Discarding stale media page"
                );
                inner.emit(QueryEvent::StaleResponseDiscarded {
                    epoch: ticket.epoch,
                    current_epoch,
                });
                return FetchOutcome::Stale;
            }
            Reconciliation::Clamped { ticket: follow_up } => {
                info!(
                    from_page = ticket.query.page,
                    to_page = follow_up.query.page,
                    "Page no longer exists, fetching last page"
                );
                inner.emit(QueryEvent::FetchStarted {
                    epoch: follow_up.epoch,
                    query: follow_up.query.to_query_string(),
                });
                ticket = follow_up;
            }
        }
    }
}
