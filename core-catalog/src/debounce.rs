//! Search input debouncing
//!
//! Keystrokes go to [`SearchDebouncer::input`]; only the last term typed
//! within the quiet period reaches the controller.

use core_runtime::config::MIN_SEARCH_DEBOUNCE;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::controller::QueryController;

pub struct SearchDebouncer {
    controller: QueryController,
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl SearchDebouncer {
    /// Delays shorter than 300ms are raised to 300ms.
    pub fn new(controller: QueryController, delay: Duration) -> Self {
        Self {
            controller,
            delay: delay.max(MIN_SEARCH_DEBOUNCE),
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn controller(&self) -> &QueryController {
        &self.controller
    }

    /// Schedule `term`, replacing any term still waiting.
    pub fn input(&self, term: impl Into<String>) {
        let term = term.into();
        let Ok(runtime) = Handle::try_current() else {
            warn!("No tokio runtime available; applying search term immediately");
            self.controller.set_search_term(term);
            return;
        };

        let controller = self.controller.clone();
        let delay = self.delay;
        let task = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            debug!(term = %term, "Search input settled");
            controller.set_search_term(term);
        });

        if let Some(previous) = self.lock_pending().replace(task) {
            previous.abort();
        }
    }

    /// Drop the waiting term, if any.
    pub fn cancel(&self) {
        if let Some(task) = self.lock_pending().take() {
            task.abort();
        }
    }

    pub fn has_pending(&self) -> bool {
        self.lock_pending()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for SearchDebouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchDebouncer")
            .field("delay", &self.delay)
            .field("has_pending", &self.has_pending())
            .finish()
    }
}
