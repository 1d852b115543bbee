// Domain models: catalog books as fetched, library books as stored per user

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A book as returned by the public catalog. Never persisted as-is.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogBook {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    /// HTML-bearing text
    pub description: Option<String>,
    pub categories: Vec<String>,
    /// Free text, e.g. "2005", "2005-11" or "2005-11-15"
    pub published_date: Option<String>,
    pub page_count: Option<i64>,
    pub thumbnail: Option<String>,
}

/// A user-owned book record in the `books` collection.
///
/// Identity for update and delete is `id` (the generated document id), never
/// `google_book_id`: the catalog id is optional and repeats across users.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LibraryBook {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub google_book_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub authors: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub categories: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(
        deserialize_with = "crate::catalog_client::de::opt_i64_from_str_or_num",
        default
    )]
    pub page_count: Option<i64>,
    /// 0.0 - 5.0
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub started_reading_at: Option<DateTime<Utc>>,
    /// May be set without `started_reading_at`; the app never required both.
    #[serde(default)]
    pub finished_reading_at: Option<DateTime<Utc>>,
}

impl LibraryBook {
    pub fn is_reading(&self) -> bool {
        self.started_reading_at.is_some() && self.finished_reading_at.is_none()
    }

    pub fn is_read(&self) -> bool {
        self.finished_reading_at.is_some()
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

pub const MAX_RATING: u8 = 5;

/// Edits a user makes on the update screen.
///
/// `None`/`false` leaves the field alone. Start and finish stamps are only
/// written when the book does not have one yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookUpdate {
    pub notes: Option<String>,
    pub rating: Option<u8>,
    pub start_reading: bool,
    pub finish_reading: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadingStats {
    /// Started and not finished
    pub reading: usize,
    /// Finished, regardless of start
    pub read: usize,
    pub read_books: Vec<LibraryBook>,
}

impl ReadingStats {
    /// Counts over books already narrowed to one user.
    pub fn from_books(books: &[LibraryBook]) -> Self {
        let read_books: Vec<LibraryBook> = books.iter().filter(|b| b.is_read()).cloned().collect();
        ReadingStats {
            reading: books.iter().filter(|b| b.is_reading()).count(),
            read: read_books.len(),
            read_books,
        }
    }
}
