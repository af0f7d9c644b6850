//! Domain models for the media catalog
//!
//! Wire-compatible records for media items and custom lists, plus the
//! read-only projection used by the list view.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CatalogError;
use crate::status;

/// Server-assigned identifier of a media item.
pub type MediaId = u64;

/// Server-assigned identifier of a custom list.
pub type ListId = u64;

/// Highest rating a user can give.
pub const MAX_RATING: u8 = 10;

// =============================================================================
// Category
// =============================================================================

/// Kind of media tracked by the catalog.
///
/// Encoded on the wire as its numeric code (`1` = book, `2` = anime).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MediaCategory {
    Book = 1,
    Anime = 2,
}

impl MediaCategory {
    pub const ALL: [MediaCategory; 2] = [MediaCategory::Book, MediaCategory::Anime];

    /// Numeric code used in query strings and JSON bodies.
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            MediaCategory::Book => "Book",
            MediaCategory::Anime => "Anime",
        }
    }

    /// Status assigned to a new item when the user picks none.
    pub fn default_status(self) -> &'static str {
        match self {
            MediaCategory::Book => status::TO_READ,
            MediaCategory::Anime => status::TO_WATCH,
        }
    }
}

impl TryFrom<u8> for MediaCategory {
    type Error = String;

    fn try_from(code: u8) -> std::result::Result<Self, Self::Error> {
        match code {
            1 => Ok(MediaCategory::Book),
            2 => Ok(MediaCategory::Anime),
            other => Err(format!("unknown media category code {}", other)),
        }
    }
}

impl From<MediaCategory> for u8 {
    fn from(category: MediaCategory) -> Self {
        category.code()
    }
}

impl fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MediaCategory {
    type Err = CatalogError;

    /// Accepts the numeric code or the label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "book" | "books" => Ok(MediaCategory::Book),
            "2" | "anime" => Ok(MediaCategory::Anime),
            other => Err(CatalogError::invalid_input(
                "category",
                format!("unknown category '{}'", other),
            )),
        }
    }
}

// =============================================================================
// Media items
// =============================================================================

/// Projection of a media item rendered by the list view.
///
/// Extra fields in the API payload are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSummary {
    pub id: MediaId,
    pub title: String,
    pub category: MediaCategory,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub rating: Option<u8>,
}

/// Full media item record as exchanged with the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: MediaId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub progress: u32,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub cover_url: Option<String>,
    pub category: MediaCategory,
}

impl MediaItem {
    pub fn summary(&self) -> MediaSummary {
        MediaSummary {
            id: self.id,
            title: self.title.clone(),
            category: self.category,
            status: self.status.clone(),
            rating: self.rating,
        }
    }

    /// Validate the item before sending an update
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Media title cannot be empty".to_string());
        }

        if let Some(rating) = self.rating {
            if rating > MAX_RATING {
                return Err(format!(
                    "Rating {} is out of range 0-{}",
                    rating, MAX_RATING
                ));
            }
        }

        if !status::is_valid_status(Some(self.category), &self.status) {
            return Err(format!(
                "Status '{}' is not valid for {}",
                self.status, self.category
            ));
        }

        Ok(())
    }
}

/// Payload for `POST items/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMediaItem {
    pub title: String,
    pub description: String,
    pub status: String,
    pub progress: u32,
    pub rating: Option<u8>,
    pub notes: String,
    pub category: MediaCategory,
}

impl NewMediaItem {
    pub fn new(
        title: impl Into<String>,
        status: impl Into<String>,
        notes: impl Into<String>,
        category: MediaCategory,
    ) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            status: status.into(),
            progress: 0,
            rating: None,
            notes: notes.into(),
            category,
        }
    }
}

// =============================================================================
// Custom lists
// =============================================================================

/// User-curated list of media items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomList {
    pub id: ListId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<MediaCategory>,
    #[serde(default)]
    pub items: Vec<MediaItem>,
    #[serde(default)]
    pub background_image: Option<String>,
}

impl CustomList {
    pub fn contains(&self, item_id: MediaId) -> bool {
        self.items.iter().any(|item| item.id == item_id)
    }
}

/// Payload for `POST lists/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomList {
    pub name: String,
    pub items: Vec<MediaItem>,
    pub category: MediaCategory,
}

impl NewCustomList {
    pub fn new(name: impl Into<String>, category: MediaCategory) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
            category,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_list_name(&self.name)
    }
}

/// Payload for `PUT lists/{id}/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCustomList {
    pub name: String,
    pub items: Vec<MediaItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<MediaCategory>,
}

impl UpdateCustomList {
    /// Rename a list while keeping its items and artwork.
    pub fn rename(list: &CustomList, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: list.items.clone(),
            background_image: list.background_image.clone(),
            category: list.category,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_list_name(&self.name)
    }
}

fn validate_list_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("List name cannot be empty".to_string());
    }
    Ok(())
}
