use std::sync::Arc;

use crate::catalog_client::BookCatalog;
use crate::domain::CatalogBook;
use crate::error::ReaderError;
use crate::resource::Resource;

/// Stateless bridge from the catalog to [`Resource`]s.
///
/// One catalog call per operation, no retries and no caching. Every failure is
/// turned into [`Resource::Error`] here so nothing propagates into view state.
#[derive(Clone)]
pub struct BookRepository {
    catalog: Arc<dyn BookCatalog>,
}

impl BookRepository {
    pub fn new(catalog: Arc<dyn BookCatalog>) -> Self {
        Self { catalog }
    }

    /// Blank queries answer `Success([])` without touching the network; a
    /// not-found answer from the catalog is an empty result too.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn search(&self, query: &str) -> Resource<Vec<CatalogBook>> {
        let query = query.trim();
        if query.is_empty() {
            tracing::debug!("blank query, skipping catalog call");
            return Resource::success(Vec::new());
        }
        match self.catalog.search(query).await {
            Ok(resp) => {
                let books: Vec<CatalogBook> = resp
                    .items
                    .into_iter()
                    .filter_map(CatalogBook::from_volume)
                    .collect();
                tracing::debug!(count = books.len(), "catalog search finished");
                Resource::success(books)
            }
            Err(ReaderError::NotFound(what)) => {
                tracing::debug!(%what, "catalog has nothing for query");
                Resource::success(Vec::new())
            }
            Err(e) => {
                tracing::error!(error = %e, %query, "catalog search failed");
                Resource::error(e.to_string())
            }
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn fetch_detail(&self, catalog_id: &str) -> Resource<CatalogBook> {
        let catalog_id = catalog_id.trim();
        if catalog_id.is_empty() {
            return Resource::error("catalog id is empty");
        }
        match self.catalog.volume(catalog_id).await {
            Ok(volume) => Resource::success(CatalogBook::from_volume_with_id(volume, catalog_id)),
            Err(e) => {
                tracing::error!(error = %e, %catalog_id, "catalog detail failed");
                Resource::error(format!("An error occurred {e}"))
            }
        }
    }
}
