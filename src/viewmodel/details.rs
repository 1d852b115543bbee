use std::sync::Arc;

use tokio::sync::watch;

use super::{LibraryViewModel, StateStore};
use crate::domain::{CatalogBook, LibraryBook};
use crate::repository::BookRepository;
use crate::resource::Resource;
use crate::session::Session;

/// Details screen: one catalog book and the "save" action.
///
/// Saves go through the shared [`LibraryViewModel`] so its subscribers see the new book.
pub struct DetailsViewModel {
    repository: BookRepository,
    library: Arc<LibraryViewModel>,
    state: StateStore<Resource<CatalogBook>>,
}

impl DetailsViewModel {
    pub fn new(repository: BookRepository, library: Arc<LibraryViewModel>) -> Self {
        Self {
            repository,
            library,
            state: StateStore::new(Resource::idle()),
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn load(&self, catalog_id: &str) -> Resource<CatalogBook> {
        let ticket = self.state.begin();
        self.state.update_if_current(ticket, |s| *s = Resource::loading());
        let result = self.repository.fetch_detail(catalog_id).await;
        self.state.update_if_current(ticket, |s| *s = result.clone());
        result
    }

    /// Save the loaded book into the user's library. Failures are logged by the library holder.
    #[tracing::instrument(level = "debug", skip(self, session), fields(user_id = %session.user_id))]
    pub async fn save_to_library(&self, session: &Session) -> Option<String> {
        let Some(book) = self.state.snapshot().into_data() else {
            tracing::warn!("nothing loaded, not saving");
            return None;
        };
        let record = LibraryBook::from_catalog(&book, &session.user_id);
        let saved = self.library.save(record).await;
        if let Some(id) = &saved {
            tracing::info!(%id, title = %book.title, "book saved to library");
        }
        saved
    }

    pub fn state(&self) -> Resource<CatalogBook> {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<Resource<CatalogBook>> {
        self.state.subscribe()
    }
}
