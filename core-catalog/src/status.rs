//! Status labels offered per media category.

use crate::models::MediaCategory;

pub const TO_READ: &str = "To Read";
pub const READING: &str = "Reading";
pub const TO_WATCH: &str = "To Watch";
pub const WATCHING: &str = "Watching";
pub const COMPLETED: &str = "Completed";
pub const ON_HOLD: &str = "On Hold";
pub const DROPPED: &str = "Dropped";

const BOOK_STATUSES: &[&str] = &[TO_READ, READING, COMPLETED, ON_HOLD, DROPPED];
const ANIME_STATUSES: &[&str] = &[TO_WATCH, WATCHING, COMPLETED, ON_HOLD, DROPPED];
const SHARED_STATUSES: &[&str] = &[COMPLETED, ON_HOLD, DROPPED];

/// Status filter options for the given category, in display order.
///
/// Without a category only the statuses common to every category are offered.
pub fn status_options(category: Option<MediaCategory>) -> &'static [&'static str] {
    match category {
        Some(MediaCategory::Anime) => ANIME_STATUSES,
        Some(MediaCategory::Book) => BOOK_STATUSES,
        None => SHARED_STATUSES,
    }
}

pub fn is_valid_status(category: Option<MediaCategory>, status: &str) -> bool {
    status_options(category).contains(&status)
}
