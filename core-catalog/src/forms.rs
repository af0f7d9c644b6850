//! Validation of the create and edit forms.

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};
use crate::models::{CustomList, MediaCategory, MediaItem, NewCustomList, NewMediaItem, MAX_RATING};
use crate::status::{is_valid_status, status_options};

/// Raw input of the "add media" form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDraft {
    pub title: String,
    /// Empty means the category's initial status
    pub status: String,
    pub notes: String,
    pub category: Option<MediaCategory>,
}

impl MediaDraft {
    /// Status choices for the category picked so far.
    pub fn status_options(&self) -> &'static [&'static str] {
        match self.category {
            Some(category) => status_options(Some(category)),
            None => &[],
        }
    }

    pub fn into_new_item(self) -> Result<NewMediaItem> {
        let category = self
            .category
            .ok_or_else(|| CatalogError::invalid_input("category", "Category is required"))?;

        let title = self.title.trim();
        if title.is_empty() {
            return Err(CatalogError::invalid_input("title", "Title is required"));
        }

        let status = if self.status.is_empty() {
            category.default_status().to_string()
        } else if is_valid_status(Some(category), &self.status) {
            self.status
        } else {
            return Err(CatalogError::invalid_input(
                "status",
                format!("'{}' is not a {} status", self.status, category),
            ));
        };

        Ok(NewMediaItem::new(title, status, self.notes, category))
    }
}

/// Status and rating edits made on the detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaEdit {
    pub status: String,
    /// Raw picker value; `apply` rejects anything outside 0-10
    pub rating: Option<i64>,
}

impl MediaEdit {
    /// Form values pre-filled from `item`, with the category's initial
    /// status when the item has none.
    pub fn for_item(item: &MediaItem) -> Self {
        let status = if item.status.is_empty() {
            item.category.default_status().to_string()
        } else {
            item.status.clone()
        };

        Self {
            status,
            rating: item.rating.map(i64::from),
        }
    }

    /// The item with this edit applied.
    pub fn apply(&self, item: &MediaItem) -> Result<MediaItem> {
        let rating = match self.rating {
            None => None,
            Some(rating) => Some(
                u8::try_from(rating)
                    .ok()
                    .filter(|r| *r <= MAX_RATING)
                    .ok_or_else(|| {
                        CatalogError::invalid_input(
                            "rating",
                            format!("Rating must be between 0 and {}", MAX_RATING),
                        )
                    })?,
            ),
        };

        if !is_valid_status(Some(item.category), &self.status) {
            return Err(CatalogError::invalid_input(
                "status",
                format!("'{}' is not a {} status", self.status, item.category),
            ));
        }

        Ok(MediaItem {
            status: self.status.clone(),
            rating,
            ..item.clone()
        })
    }
}

/// Payload for a new list, with the name trimmed.
pub fn new_custom_list(name: &str, category: MediaCategory) -> Result<NewCustomList> {
    let list = NewCustomList::new(name.trim(), category);
    list.validate()
        .map_err(|message| CatalogError::invalid_input("name", message))?;
    Ok(list)
}

/// Lists an item of `category` can be added to, in their original order.
pub fn lists_for_category(lists: &[CustomList], category: MediaCategory) -> Vec<&CustomList> {
    lists
        .iter()
        .filter(|list| list.category == Some(category))
        .collect()
}
