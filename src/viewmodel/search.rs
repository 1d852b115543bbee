use std::sync::Arc;

use tokio::task::JoinHandle;

use super::StateStore;
use crate::domain::CatalogBook;
use crate::repository::BookRepository;
use crate::resource::Resource;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub books: Resource<Vec<CatalogBook>>,
}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        self.books.is_loading()
    }

    /// Current hits; empty while loading or after an error.
    pub fn list(&self) -> &[CatalogBook] {
        self.books.data().map(Vec::as_slice).unwrap_or_default()
    }
}

/// Search screen state.
pub struct SearchViewModel {
    repository: BookRepository,
    state: StateStore<SearchState>,
    seed_query: String,
}

impl SearchViewModel {
    pub fn new(repository: BookRepository, seed_query: impl Into<String>) -> Self {
        Self {
            repository,
            state: StateStore::new(SearchState::default()),
            seed_query: seed_query.into(),
        }
    }

    /// Kick off the seed search in the background.
    pub fn init(self: &Arc<Self>) -> JoinHandle<()> {
        let query = self.seed_query.clone();
        self.spawn_search(query)
    }

    pub fn spawn_search(self: &Arc<Self>, query: impl Into<String>) -> JoinHandle<()> {
        let this = Arc::clone(self);
        let query = query.into();
        tokio::spawn(async move { this.search(&query).await })
    }

    /// Publish `Loading`, then exactly one outcome unless a newer search started meanwhile.
    /// Blank queries are ignored entirely.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn search(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            tracing::debug!("ignoring blank search");
            return;
        }

        let ticket = self.state.begin();
        self.state.update_if_current(ticket, |s| {
            s.query = query.to_string();
            s.books = Resource::loading();
        });

        let result = self.repository.search(query).await;
        if let Some(message) = result.error_message() {
            tracing::warn!(%message, "search failed");
        }
        if !self.state.update_if_current(ticket, |s| s.books = result) {
            tracing::debug!("newer search in flight, dropping stale result");
        }
    }

    pub fn state(&self) -> SearchState {
        self.state.snapshot()
    }

    pub fn is_loading(&self) -> bool {
        self.state.snapshot().is_loading()
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<SearchState> {
        self.state.subscribe()
    }
}
