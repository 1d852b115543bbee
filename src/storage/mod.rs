// Document store seam. The sea-orm backed implementation lives in `sql`.

mod library;
mod sql;

use chrono::{DateTime, Utc};

use crate::error::ReaderResult;

pub use library::{BOOKS_COLLECTION, LibraryStore};
pub use sql::SqlDocumentStore;

/// Schemaless document body: a JSON object.
pub type Fields = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub collection: String,
    pub fields: Fields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document under a freshly generated id and return that id.
    async fn add_document(&self, collection: &str, fields: Fields) -> ReaderResult<String>;
    /// Merge `fields` into an existing document. Concurrent writers: last one wins per field.
    async fn update_document(&self, collection: &str, id: &str, fields: Fields) -> ReaderResult<()>;
    async fn delete_document(&self, collection: &str, id: &str) -> ReaderResult<()>;
    async fn get_document(&self, collection: &str, id: &str) -> ReaderResult<Option<Document>>;
    /// Every document in the collection, oldest first.
    async fn list_documents(&self, collection: &str) -> ReaderResult<Vec<Document>>;
}
