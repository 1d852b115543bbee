#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use migration::MigratorTrait;
use readshelf::catalog_client::{BookCatalog, SearchResponse, Volume};
use readshelf::storage::SqlDocumentStore;
use readshelf::{ReaderError, ReaderResult};
use sea_orm::{ConnectOptions, Database};
use serde_json::json;
use tokio::sync::Notify;

pub fn volume(id: &str, title: &str, authors: &[&str]) -> Volume {
    serde_json::from_value(json!({
        "id": id,
        "volumeInfo": {
            "title": title,
            "authors": authors,
            "description": format!("<p>About <i>{title}</i></p>"),
            "categories": ["Computers"],
            "publishedDate": "2021",
            "pageCount": 320,
            "imageLinks": { "thumbnail": format!("http://img/{id}") }
        }
    }))
    .unwrap()
}

/// Catalog answering from a fixed table, counting calls, optionally holding
/// searches until released.
#[derive(Default)]
pub struct FakeCatalog {
    results: HashMap<String, Vec<Volume>>,
    failing: bool,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    pub search_calls: AtomicUsize,
    pub volume_calls: AtomicUsize,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(mut self, query: &str, volumes: Vec<Volume>) -> Self {
        self.results.insert(query.to_string(), volumes);
        self
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Searches for `query` block until [`FakeCatalog::release`] is called.
    pub fn gate(&self, query: &str) {
        self.gates
            .lock()
            .unwrap()
            .insert(query.to_string(), Arc::new(Notify::new()));
    }

    pub fn release(&self, query: &str) {
        if let Some(gate) = self.gates.lock().unwrap().get(query) {
            gate.notify_one();
        }
    }

    pub fn searches(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl BookCatalog for FakeCatalog {
    async fn search(&self, query: &str) -> ReaderResult<SearchResponse> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().unwrap().get(query).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.failing {
            return Err(ReaderError::Transport("connection refused".into()));
        }
        Ok(SearchResponse {
            kind: Some("books#volumes".into()),
            total_items: None,
            items: self.results.get(query).cloned().unwrap_or_default(),
        })
    }

    async fn volume(&self, volume_id: &str) -> ReaderResult<Volume> {
        self.volume_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(ReaderError::Transport("connection refused".into()));
        }
        self.results
            .values()
            .flatten()
            .find(|v| v.id.as_deref() == Some(volume_id))
            .cloned()
            .ok_or_else(|| ReaderError::NotFound(format!("volume {volume_id}")))
    }
}

pub async fn memory_store() -> SqlDocumentStore {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    SqlDocumentStore::new(Arc::new(db))
}
