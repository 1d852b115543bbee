use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio::task::JoinHandle;

use crate::catalog_client::{BookCatalog, GoogleBooksClient};
use crate::config::Config;
use crate::error::ReaderResult;
use crate::repository::BookRepository;
use crate::session::Session;
use crate::storage::{DocumentStore, LibraryStore, SqlDocumentStore};
use crate::viewmodel::{DetailsViewModel, LibraryViewModel, SearchViewModel};

/// Everything the screens need, wired once at startup and passed down explicitly.
pub struct ReaderApp {
    pub session: Session,
    pub search: Arc<SearchViewModel>,
    pub details: Arc<DetailsViewModel>,
    pub library: Arc<LibraryViewModel>,
}

impl ReaderApp {
    pub fn new(config: &Config, db: Arc<DatabaseConnection>) -> ReaderResult<Self> {
        let mut client = GoogleBooksClient::new(&config.catalog_base_url)?;
        if let Some(key) = &config.catalog_api_key {
            client = client.with_api_key(key);
        }
        Ok(Self::from_parts(
            Arc::new(client),
            Arc::new(SqlDocumentStore::new(db)),
            config.session(),
            &config.seed_query,
        ))
    }

    pub fn from_parts(
        catalog: Arc<dyn BookCatalog>,
        store: Arc<dyn DocumentStore>,
        session: Session,
        seed_query: &str,
    ) -> Self {
        let repository = BookRepository::new(catalog);
        let library = Arc::new(LibraryViewModel::new(LibraryStore::new(store)));
        ReaderApp {
            session,
            search: Arc::new(SearchViewModel::new(repository.clone(), seed_query)),
            details: Arc::new(DetailsViewModel::new(repository, Arc::clone(&library))),
            library,
        }
    }

    /// Seed search and library load, both in the background.
    pub fn start(&self) -> Vec<JoinHandle<()>> {
        vec![self.search.init(), self.library.init()]
    }
}
