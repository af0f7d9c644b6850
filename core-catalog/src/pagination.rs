//! Page-count math and the result page handed to the list view

use serde::{Deserialize, Serialize};

use crate::models::MediaSummary;
use crate::query::QueryDescription;

/// Number of pages needed for `total_count` items.
///
/// Returns 0 when there are no items or the page size is zero.
pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_count.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Page count shown to the user: an empty result is still one page.
pub fn display_total_pages(total_count: u64, page_size: u32) -> u32 {
    total_pages(total_count, page_size).max(1)
}

/// Body of a paginated list response: `{ "count": n, "results": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub count: u64,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// One page of media summaries plus its pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPage {
    /// Items in server order
    pub items: Vec<MediaSummary>,
    /// Total number of matching items across all pages
    pub total_count: u64,
    /// `ceil(total_count / page_size)`; 0 when nothing matched
    pub total_pages: u32,
    /// 1-based page these items belong to
    pub page: u32,
    pub page_size: u32,
}

impl ResultPage {
    /// Build a page for the query that produced it
    ///
    /// # Examples
    ///
    /// ```
    /// use core_catalog::pagination::ResultPage;
    /// use core_catalog::query::QueryDescription;
    ///
    /// let page = ResultPage::new(Vec::new(), 25, &QueryDescription::default());
    /// assert_eq!(page.total_pages, 2);
    /// assert_eq!(page.page, 1);
    /// ```
    pub fn new(items: Vec<MediaSummary>, total_count: u64, query: &QueryDescription) -> Self {
        Self {
            items,
            total_count,
            total_pages: total_pages(total_count, query.page_size),
            page: query.page,
            page_size: query.page_size,
        }
    }

    pub fn from_response(response: ListResponse<MediaSummary>, query: &QueryDescription) -> Self {
        Self::new(response.results, response.count, query)
    }

    /// Total pages as shown to the user (never less than 1).
    pub fn display_total_pages(&self) -> u32 {
        self.total_pages.max(1)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}
