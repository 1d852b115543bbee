pub mod mapping;
pub mod models;

pub use mapping::format_date;
pub use models::{BookUpdate, CatalogBook, LibraryBook, ReadingStats};
