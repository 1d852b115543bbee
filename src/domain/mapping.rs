// Mapping from catalog DTOs and store documents to domain models

use chrono::{DateTime, Utc};
use scraper::Html;
use serde_json::{Value, json};

use super::models::{BookUpdate, CatalogBook, LibraryBook, MAX_RATING};
use crate::catalog_client::Volume;
use crate::error::{ReaderError, ReaderResult};
use crate::storage::{Document, Fields};

const UNTITLED: &str = "Untitled";

impl CatalogBook {
    /// Map a search hit. Hits without an id cannot be opened later and are dropped.
    pub fn from_volume(volume: Volume) -> Option<Self> {
        let id = volume.id.clone().filter(|id| !id.is_empty())?;
        Some(Self::from_volume_with_id(volume, id))
    }

    /// Map a detail response, falling back to the id it was requested by.
    pub fn from_volume_with_id(volume: Volume, requested_id: impl Into<String>) -> Self {
        let id = volume
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| requested_id.into());
        let info = volume.volume_info;
        let thumbnail = info
            .image_links
            .and_then(|links| links.thumbnail.or(links.small_thumbnail));
        CatalogBook {
            id,
            title: info.title.unwrap_or_else(|| UNTITLED.into()),
            authors: info.authors,
            description: info.description,
            categories: info.categories,
            published_date: info.published_date,
            page_count: info.page_count,
            thumbnail,
        }
    }

    pub fn authors_display(&self) -> String {
        self.authors.join(", ")
    }

    /// Description with markup removed and whitespace collapsed.
    pub fn plain_description(&self) -> Option<String> {
        self.description.as_deref().map(strip_html)
    }
}

pub fn strip_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl LibraryBook {
    /// The record written when `user_id` saves a catalog book.
    pub fn from_catalog(book: &CatalogBook, user_id: impl Into<String>) -> Self {
        let categories = (!book.categories.is_empty()).then(|| book.categories.join(", "));
        LibraryBook {
            id: None,
            user_id: user_id.into(),
            google_book_id: Some(book.id.clone()),
            title: book.title.clone(),
            authors: book.authors_display(),
            description: book.description.clone(),
            categories,
            notes: String::new(),
            photo_url: book.thumbnail.clone(),
            published_date: book.published_date.clone(),
            page_count: book.page_count,
            rating: 0.0,
            started_reading_at: None,
            finished_reading_at: None,
        }
    }

    pub fn to_fields(&self) -> ReaderResult<Fields> {
        match serde_json::to_value(self)? {
            Value::Object(fields) => Ok(fields),
            other => Err(ReaderError::Deserialization(format!(
                "library book serialized to {other}"
            ))),
        }
    }

    /// The document id wins over any `id` field stored inside the document.
    pub fn from_document(doc: Document) -> ReaderResult<Self> {
        let mut book: LibraryBook = serde_json::from_value(Value::Object(doc.fields))?;
        book.id = Some(doc.id);
        Ok(book)
    }
}

impl BookUpdate {
    /// Fields to merge into `book`'s document, or `None` when nothing changes.
    pub fn changes(&self, book: &LibraryBook, now: DateTime<Utc>) -> Option<Fields> {
        let mut fields = Fields::new();

        if let Some(notes) = &self.notes {
            if *notes != book.notes {
                fields.insert("notes".into(), json!(notes));
            }
        }
        if let Some(rating) = self.rating {
            let rating = f64::from(rating.min(MAX_RATING));
            if rating != book.rating {
                fields.insert("rating".into(), json!(rating));
            }
        }
        if self.start_reading && book.started_reading_at.is_none() {
            fields.insert("started_reading_at".into(), json!(now));
        }
        if self.finish_reading && book.finished_reading_at.is_none() {
            fields.insert("finished_reading_at".into(), json!(now));
        }

        (!fields.is_empty()).then_some(fields)
    }
}

/// Short human date used next to reading timestamps, e.g. "Mon, Mar 4, 2024".
pub fn format_date(at: DateTime<Utc>) -> String {
    at.format("%a, %b %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog_client::{ImageLinks, VolumeInfo};
    use chrono::TimeZone;

    fn volume() -> Volume {
        Volume {
            id: Some("zyTCAlFPjgYC".into()),
            volume_info: VolumeInfo {
                title: Some("The Google Story".into()),
                authors: vec!["David A. Vise".into(), "Mark Malseed".into()],
                description: Some("<p>An <b>epic</b> tale.</p><p>Second.</p>".into()),
                page_count: Some(207),
                categories: vec!["Business".into(), "History".into()],
                published_date: Some("2005-11-15".into()),
                image_links: Some(ImageLinks {
                    small_thumbnail: Some("http://img/small".into()),
                    thumbnail: None,
                }),
                ..Default::default()
            },
        }
    }

    #[test]
    fn volume_maps_to_catalog_book() {
        let book = CatalogBook::from_volume(volume()).unwrap();
        assert_eq!(book.id, "zyTCAlFPjgYC");
        assert_eq!(book.authors_display(), "David A. Vise, Mark Malseed");
        assert_eq!(book.thumbnail.as_deref(), Some("http://img/small"));
        assert_eq!(book.plain_description().as_deref(), Some("An epic tale. Second."));
    }

    #[test]
    fn volume_without_id_is_dropped_from_search() {
        let mut v = volume();
        v.id = None;
        assert!(CatalogBook::from_volume(v.clone()).is_none());
        let detail = CatalogBook::from_volume_with_id(v, "requested");
        assert_eq!(detail.id, "requested");
    }

    #[test]
    fn untitled_volume_gets_placeholder() {
        let v = Volume { id: Some("x".into()), ..Default::default() };
        assert_eq!(CatalogBook::from_volume(v).unwrap().title, "Untitled");
    }

    #[test]
    fn saving_copies_catalog_fields() {
        let catalog = CatalogBook::from_volume(volume()).unwrap();
        let book = LibraryBook::from_catalog(&catalog, "user-1");
        assert_eq!(book.user_id, "user-1");
        assert_eq!(book.google_book_id.as_deref(), Some("zyTCAlFPjgYC"));
        assert_eq!(book.title, catalog.title);
        assert_eq!(book.authors, "David A. Vise, Mark Malseed");
        assert_eq!(book.description, catalog.description);
        assert_eq!(book.categories.as_deref(), Some("Business, History"));
        assert_eq!(book.rating, 0.0);
        assert!(book.notes.is_empty());
        assert!(book.id.is_none());

        let fields = book.to_fields().unwrap();
        assert!(!fields.contains_key("id"));
        assert_eq!(fields["photo_url"], json!("http://img/small"));
        assert_eq!(fields["page_count"], json!(207));
    }

    #[test]
    fn document_id_overrides_stored_id() {
        let mut fields = LibraryBook::default().to_fields().unwrap();
        fields.insert("id".into(), json!("stale"));
        let now = Utc::now();
        let doc = Document {
            id: "doc-9".into(),
            collection: "books".into(),
            fields,
            created_at: now,
            updated_at: now,
        };
        let book = LibraryBook::from_document(doc).unwrap();
        assert_eq!(book.id.as_deref(), Some("doc-9"));
    }

    #[test]
    fn update_only_reports_real_changes() {
        let now = Utc.with_ymd_and_hms(2024, 3, 4, 9, 30, 0).unwrap();
        let started = Utc.with_ymd_and_hms(2024, 2, 1, 9, 30, 0).unwrap();
        let book = LibraryBook {
            notes: "great".into(),
            rating: 3.0,
            started_reading_at: Some(started),
            ..Default::default()
        };

        let same = BookUpdate {
            notes: Some("great".into()),
            rating: Some(3),
            start_reading: true,
            finish_reading: false,
        };
        assert_eq!(same.changes(&book, now), None);

        let finish = BookUpdate {
            rating: Some(9),
            finish_reading: true,
            ..Default::default()
        };
        let fields = finish.changes(&book, now).unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["rating"], json!(5.0));
        assert_eq!(fields["finished_reading_at"], json!(now));
    }

    #[test]
    fn formats_reading_dates() {
        let at = Utc.with_ymd_and_hms(2024, 3, 4, 9, 30, 0).unwrap();
        assert_eq!(format_date(at), "Mon, Mar 4, 2024");
    }
}
