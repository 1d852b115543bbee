//! readshelf - personal book tracking on top of a public book catalog.
//!
//! Catalog searches go through [`BookRepository`] and come back as
//! [`Resource`]s; saved books live in a schemaless [`storage::DocumentStore`].
//! Screens hold their state in the view models under [`viewmodel`] and
//! subscribe to changes instead of polling.

pub mod app;
pub mod catalog_client;
pub mod config;
pub mod domain;
pub mod error;
pub mod repository;
pub mod resource;
pub mod session;
pub mod storage;
pub mod viewmodel;

pub use app::ReaderApp;
pub use error::{ReaderError, ReaderResult};
pub use repository::BookRepository;
pub use resource::Resource;
pub use session::Session;
