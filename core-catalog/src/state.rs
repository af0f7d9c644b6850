//! Query state and result reconciliation
//!
//! [`QueryState`] is the synchronous heart of the list view. Every mutation
//! bumps the request epoch and hands back a [`FetchTicket`]; results come
//! back through [`QueryState::reconcile`], which applies them only when
//! their epoch is still current. No I/O happens here.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::MediaCategory;
use crate::pagination::ResultPage;
use crate::query::{QueryDescription, SortKey};
use crate::status::{is_valid_status, status_options};

/// What the list view should render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResultsView {
    Loading,
    Ready { page: ResultPage },
    Error { message: String },
}

impl ResultsView {
    pub fn is_loading(&self) -> bool {
        matches!(self, ResultsView::Loading)
    }

    pub fn page(&self) -> Option<&ResultPage> {
        match self {
            ResultsView::Ready { page } => Some(page),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ResultsView::Error { message } => Some(message),
            _ => None,
        }
    }
}

/// A fetch the caller must issue, tagged with the epoch it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub epoch: u64,
    pub query: QueryDescription,
}

/// How a fetch result was folded into the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// The page is now the ready view.
    Applied {
        total_count: u64,
        total_pages: u32,
        page: u32,
    },
    /// The view now shows this error message.
    Failed { message: String },
    /// The current page no longer exists; fetch `ticket` instead.
    Clamped { ticket: FetchTicket },
    /// The result belonged to a superseded epoch and was dropped.
    Stale { current_epoch: u64 },
}

#[derive(Debug, Clone)]
pub struct QueryState {
    query: QueryDescription,
    epoch: u64,
    /// Display page count of the last applied result; bounds `set_page`.
    known_total_pages: u32,
    view: ResultsView,
}

impl QueryState {
    pub fn new(page_size: u32) -> Self {
        Self {
            query: QueryDescription::new(page_size),
            epoch: 0,
            known_total_pages: 1,
            view: ResultsView::Loading,
        }
    }

    pub fn query(&self) -> &QueryDescription {
        &self.query
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn view(&self) -> &ResultsView {
        &self.view
    }

    pub fn known_total_pages(&self) -> u32 {
        self.known_total_pages
    }

    /// Status filter choices for the current category.
    pub fn status_options(&self) -> &'static [&'static str] {
        status_options(self.query.category)
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) -> FetchTicket {
        self.query.search_term = term.into();
        self.reset_page_and_fetch()
    }

    /// Changing category also drops a status the new category does not offer.
    pub fn set_category(&mut self, category: Option<MediaCategory>) -> FetchTicket {
        self.query.category = category;
        if let Some(status) = &self.query.status {
            if !is_valid_status(category, status) {
                self.query.status = None;
            }
        }
        self.reset_page_and_fetch()
    }

    /// `None` or an empty label clears the status filter.
    pub fn set_status(&mut self, status: Option<&str>) -> FetchTicket {
        self.query.status = status.filter(|s| !s.is_empty()).map(str::to_string);
        self.reset_page_and_fetch()
    }

    pub fn set_sort_key(&mut self, sort_key: SortKey) -> FetchTicket {
        self.query.sort_key = sort_key;
        self.reset_page_and_fetch()
    }

    /// Returns `None` without touching anything when `page` is outside
    /// `1..=known_total_pages`.
    pub fn set_page(&mut self, page: u32) -> Option<FetchTicket> {
        if page < 1 || page > self.known_total_pages {
            return None;
        }
        self.query.page = page;
        Some(self.begin_fetch())
    }

    /// Re-issue the current query under a fresh epoch.
    pub fn refresh(&mut self) -> FetchTicket {
        self.begin_fetch()
    }

    fn reset_page_and_fetch(&mut self) -> FetchTicket {
        self.query.page = 1;
        self.begin_fetch()
    }

    fn begin_fetch(&mut self) -> FetchTicket {
        self.epoch += 1;
        self.view = ResultsView::Loading;
        FetchTicket {
            epoch: self.epoch,
            query: self.query.clone(),
        }
    }

    /// Fold the outcome of the fetch issued for `epoch` into the state.
    pub fn reconcile(&mut self, epoch: u64, outcome: Result<ResultPage>) -> Reconciliation {
        if epoch != self.epoch {
            return Reconciliation::Stale {
                current_epoch: self.epoch,
            };
        }

        match outcome {
            Ok(page) => {
                let display_pages = page.display_total_pages();
                self.known_total_pages = display_pages;

                if self.query.page > display_pages {
                    self.query.page = display_pages;
                    return Reconciliation::Clamped {
                        ticket: self.begin_fetch(),
                    };
                }

                let applied = Reconciliation::Applied {
                    total_count: page.total_count,
                    total_pages: page.total_pages,
                    page: page.page,
                };
                self.view = ResultsView::Ready { page };
                applied
            }
            Err(err) => {
                let message = err.user_message();
                self.view = ResultsView::Error {
                    message: message.clone(),
                };
                Reconciliation::Failed { message }
            }
        }
    }
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(crate::query::DEFAULT_PAGE_SIZE)
    }
}
