//! Query description for the media list endpoint.
//!
//! A [`QueryDescription`] captures every filter dimension of the list view.
//! Only non-default dimensions are encoded, so an unset filter is never sent
//! as an empty parameter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CatalogError;
use crate::models::MediaCategory;

pub use core_runtime::config::DEFAULT_PAGE_SIZE;

/// Server-side ordering of the media list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum SortKey {
    /// Title A-Z
    #[default]
    TitleAsc,
    /// Title Z-A
    TitleDesc,
    /// Rating high to low
    RatingDesc,
    /// Rating low to high
    RatingAsc,
    /// Progress high to low
    ProgressDesc,
    /// Progress low to high
    ProgressAsc,
}

impl SortKey {
    /// All keys in the order the sort menu lists them.
    pub const ALL: [SortKey; 6] = [
        SortKey::TitleAsc,
        SortKey::TitleDesc,
        SortKey::RatingDesc,
        SortKey::RatingAsc,
        SortKey::ProgressDesc,
        SortKey::ProgressAsc,
    ];

    /// Value of the `ordering` parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::TitleAsc => "title",
            SortKey::TitleDesc => "-title",
            SortKey::RatingDesc => "-rating",
            SortKey::RatingAsc => "rating",
            SortKey::ProgressDesc => "-progress",
            SortKey::ProgressAsc => "progress",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::TitleAsc => "Title A-Z",
            SortKey::TitleDesc => "Title Z-A",
            SortKey::RatingDesc => "Rating High-Low",
            SortKey::RatingAsc => "Rating Low-High",
            SortKey::ProgressDesc => "Progress High-Low",
            SortKey::ProgressAsc => "Progress Low-High",
        }
    }

    pub fn is_default(self) -> bool {
        self == SortKey::default()
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| CatalogError::invalid_input("ordering", format!("unknown sort key '{}'", s)))
    }
}

impl From<SortKey> for String {
    fn from(key: SortKey) -> Self {
        key.as_str().to_string()
    }
}

impl TryFrom<String> for SortKey {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Everything the list endpoint needs to produce one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDescription {
    /// Free text; empty means no search filter
    pub search_term: String,
    /// `None` means all categories
    pub category: Option<MediaCategory>,
    /// `None` means all statuses
    pub status: Option<String>,
    pub sort_key: SortKey,
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
}

impl QueryDescription {
    pub fn new(page_size: u32) -> Self {
        Self {
            search_term: String::new(),
            category: None,
            status: None,
            sort_key: SortKey::default(),
            page: 1,
            page_size,
        }
    }

    /// Parameters as `(name, value)` pairs, in wire order.
    ///
    /// `page` and `page_size` are always present; the other dimensions only
    /// when they differ from their default.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
        ];

        if !self.search_term.is_empty() {
            pairs.push(("search", self.search_term.clone()));
        }

        if let Some(category) = self.category {
            pairs.push(("category", category.code().to_string()));
        }

        if let Some(status) = self.status.as_ref().filter(|s| !s.is_empty()) {
            pairs.push(("status", status.clone()));
        }

        if !self.sort_key.is_default() {
            pairs.push(("ordering", self.sort_key.as_str().to_string()));
        }

        pairs
    }

    /// Percent-encoded query string including the leading `?`.
    pub fn to_query_string(&self) -> String {
        let encoded: Vec<String> = self
            .to_query_pairs()
            .into_iter()
            .map(|(name, value)| format!("{}={}", name, urlencoding::encode(&value)))
            .collect();
        format!("?{}", encoded.join("&"))
    }
}

impl Default for QueryDescription {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
