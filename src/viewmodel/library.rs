use std::sync::Arc;

use chrono::Utc;
use tokio::{sync::watch, task::JoinHandle};

use super::StateStore;
use crate::domain::{BookUpdate, LibraryBook, ReadingStats};
use crate::resource::Resource;
use crate::session::Session;
use crate::storage::LibraryStore;

/// Home, update and stats screens share this holder.
///
/// State is the whole `books` collection; per-user views are filtered out of
/// it on read. Personal libraries are small enough for that to stay cheap.
pub struct LibraryViewModel {
    library: LibraryStore,
    state: StateStore<Resource<Vec<LibraryBook>>>,
}

impl LibraryViewModel {
    pub fn new(library: LibraryStore) -> Self {
        Self {
            library,
            state: StateStore::new(Resource::idle()),
        }
    }

    /// Load the collection in the background.
    pub fn init(self: &Arc<Self>) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move { this.refresh().await })
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn refresh(&self) {
        let ticket = self.state.begin();
        self.state.update_if_current(ticket, |s| *s = Resource::loading());
        let result = match self.library.all().await {
            Ok(books) => {
                tracing::debug!(count = books.len(), "library loaded");
                Resource::success(books)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load library");
                Resource::error(e.to_string())
            }
        };
        self.state.update_if_current(ticket, |s| *s = result);
    }

    pub fn state(&self) -> Resource<Vec<LibraryBook>> {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Resource<Vec<LibraryBook>>> {
        self.state.subscribe()
    }

    /// Books owned by the session's user; nothing from any other owner.
    pub fn user_books(&self, session: &Session) -> Vec<LibraryBook> {
        self.state
            .snapshot()
            .into_data()
            .unwrap_or_default()
            .into_iter()
            .filter(|b| b.is_owned_by(&session.user_id))
            .collect()
    }

    pub fn book_by_catalog_id(&self, session: &Session, catalog_id: &str) -> Option<LibraryBook> {
        self.user_books(session)
            .into_iter()
            .find(|b| b.google_book_id.as_deref() == Some(catalog_id))
    }

    pub fn stats(&self, session: &Session) -> ReadingStats {
        ReadingStats::from_books(&self.user_books(session))
    }

    #[tracing::instrument(level = "debug", skip(self, book), fields(title = %book.title))]
    pub async fn save(&self, book: LibraryBook) -> Option<String> {
        match self.library.add(&book).await {
            Ok(id) => {
                self.refresh().await;
                Some(id)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to save book");
                None
            }
        }
    }

    /// Apply `update` to the document. Returns false when nothing was written.
    #[tracing::instrument(level = "debug", skip(self, update))]
    pub async fn update_book(&self, document_id: &str, update: &BookUpdate) -> bool {
        let current = match self.library.get(document_id).await {
            Ok(Some(book)) => book,
            Ok(None) => {
                tracing::warn!("no such book");
                return false;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to read book before update");
                return false;
            }
        };
        let Some(fields) = update.changes(&current, Utc::now()) else {
            tracing::debug!("nothing changed");
            return false;
        };
        match self.library.update(document_id, fields).await {
            Ok(()) => {
                self.refresh().await;
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "error updating document");
                false
            }
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn delete_book(&self, document_id: &str) -> bool {
        match self.library.delete(document_id).await {
            Ok(()) => {
                self.refresh().await;
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "error deleting document");
                false
            }
        }
    }
}
