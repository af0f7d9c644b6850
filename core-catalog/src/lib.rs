//! # Media Catalog Module
//!
//! Client-side core of the media tracker: domain models, the REST client for
//! the catalog API, and the query controller behind the media list view.
//!
//! ## Overview
//!
//! This module provides:
//! - Media item and custom list models matching the API wire format
//! - Status options per category and form validation
//! - Sparse query encoding, page-count math and result pages
//! - `QueryController`, which reconciles overlapping fetches by epoch
//! - `SearchDebouncer` for keystroke-driven search input

pub mod client;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod fetch;
pub mod forms;
pub mod models;
pub mod pagination;
pub mod query;
pub mod state;
pub mod status;

pub use client::CatalogClient;
pub use controller::{FetchHandle, FetchOutcome, QueryController};
pub use debounce::SearchDebouncer;
pub use error::{CatalogError, Result};
pub use fetch::PageFetcher;
pub use forms::{lists_for_category, new_custom_list, MediaDraft, MediaEdit};
pub use models::{
    CustomList, ListId, MediaCategory, MediaId, MediaItem, MediaSummary, NewCustomList,
    NewMediaItem, UpdateCustomList,
};
pub use pagination::{display_total_pages, total_pages, ResultPage};
pub use query::{QueryDescription, SortKey, DEFAULT_PAGE_SIZE};
pub use state::{QueryState, ResultsView};
pub use status::status_options;
