use std::sync::Arc;

use serde_json::json;

use super::{DocumentStore, Fields};
use crate::domain::LibraryBook;
use crate::error::ReaderResult;

pub const BOOKS_COLLECTION: &str = "books";

/// Typed access to the `books` collection.
#[derive(Clone)]
pub struct LibraryStore {
    store: Arc<dyn DocumentStore>,
}

impl LibraryStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Insert and then stamp the generated id into the document's own `id` field.
    #[tracing::instrument(level = "debug", skip(self, book), fields(title = %book.title))]
    pub async fn add(&self, book: &LibraryBook) -> ReaderResult<String> {
        let mut fields = book.to_fields()?;
        fields.remove("id");
        let id = self.store.add_document(BOOKS_COLLECTION, fields).await?;

        let mut stamp = Fields::new();
        stamp.insert("id".into(), json!(id));
        self.store
            .update_document(BOOKS_COLLECTION, &id, stamp)
            .await?;
        Ok(id)
    }

    pub async fn update(&self, id: &str, fields: Fields) -> ReaderResult<()> {
        self.store.update_document(BOOKS_COLLECTION, id, fields).await
    }

    pub async fn delete(&self, id: &str) -> ReaderResult<()> {
        self.store.delete_document(BOOKS_COLLECTION, id).await
    }

    pub async fn get(&self, id: &str) -> ReaderResult<Option<LibraryBook>> {
        self.store
            .get_document(BOOKS_COLLECTION, id)
            .await?
            .map(LibraryBook::from_document)
            .transpose()
    }

    /// Every saved book, across all owners.
    pub async fn all(&self) -> ReaderResult<Vec<LibraryBook>> {
        self.store
            .list_documents(BOOKS_COLLECTION)
            .await?
            .into_iter()
            .map(LibraryBook::from_document)
            .collect()
    }
}
