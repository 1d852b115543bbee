use crate::catalog_client::GoogleBooksClient;
use crate::error::{ReaderError, ReaderResult};
use crate::session::Session;

#[derive(Debug, Clone)]
pub struct Config {
    pub catalog_base_url: String,
    pub catalog_api_key: Option<String>,
    pub db_connection_string: String,
    pub user_id: String,
    pub user_email: Option<String>,
    pub seed_query: String,
}

const DEFAULT_DB_CONNECTION_STRING: &str = "sqlite://readshelf.sqlite?mode=rwc";
const DEFAULT_SEED_QUERY: &str = "android";

impl Config {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Config {
            catalog_base_url: get("READER_CATALOG_BASE_URL")
                .unwrap_or_else(|| GoogleBooksClient::DEFAULT_BASE_URL.into()),
            catalog_api_key: get("READER_CATALOG_API_KEY"),
            db_connection_string: get("READER_DB_CONNECTION_STRING")
                .unwrap_or_else(|| DEFAULT_DB_CONNECTION_STRING.into()),
            user_id: get("READER_USER_ID").unwrap_or_default(),
            user_email: get("READER_USER_EMAIL"),
            seed_query: get("READER_SEED_QUERY").unwrap_or_else(|| DEFAULT_SEED_QUERY.into()),
        }
    }

    pub fn validate(&self) -> ReaderResult<()> {
        if self.user_id.is_empty() {
            return Err(ReaderError::Config("READER_USER_ID is missing".into()));
        }
        if !self.catalog_base_url.starts_with("http://")
            && !self.catalog_base_url.starts_with("https://")
        {
            return Err(ReaderError::Config(format!(
                "READER_CATALOG_BASE_URL is not an http(s) URL: {}",
                self.catalog_base_url
            )));
        }
        Ok(())
    }

    pub fn session(&self) -> Session {
        Session::new(self.user_id.clone(), self.user_email.clone())
    }
}
