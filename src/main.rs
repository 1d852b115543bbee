use std::{path::Path, sync::Arc};

use anyhow::Context;
use migration::MigratorTrait;
use readshelf::{ReaderApp, config::Config, domain::format_date};
use sea_orm::Database;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt::SubscriberBuilder, prelude::*};

type ReadshelfResult<T> = anyhow::Result<T>;

#[tokio::main]
async fn main() -> ReadshelfResult<()> {
    // Respect RUST_LOG if set, default to info for our crate and warn for deps.
    let default_filter = format!(
        "{}=info,reqwest=warn,sea_orm=warn,sqlx=warn",
        env!("CARGO_PKG_NAME")
    );
    let env_filter = std::env::var("RUST_LOG").unwrap_or(default_filter);
    SubscriberBuilder::default()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_target(false)
        .with_level(true)
        .pretty()
        .finish()
        .with(ErrorLayer::default())
        .init();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting readshelf");

    if Path::new(".env.local").exists() {
        dotenvy::from_filename(".env.local")?;
    } else if Path::new(".env").exists() {
        dotenvy::from_filename(".env")?;
    };
    let config = Config::load();
    config.validate().context("invalid configuration")?;

    let db_conn = Database::connect(&config.db_connection_string)
        .await
        .with_context(|| "Failed to connect to database")?;

    migration::Migrator::up(&db_conn, None)
        .await
        .with_context(|| "Failed to run database migrations")?;

    let app = ReaderApp::new(&config, Arc::new(db_conn)).context("failed to build app")?;
    tracing::info!(
        catalog = %config.catalog_base_url,
        has_api_key = config.catalog_api_key.is_some(),
        user = %app.session.display_name(),
        "configured reader"
    );

    for handle in app.start() {
        handle.await.context("startup task panicked")?;
    }

    let search = app.search.state();
    match search.books.error_message() {
        Some(message) => tracing::warn!(query = %search.query, %message, "seed search failed"),
        None => tracing::info!(query = %search.query, results = search.list().len(), "seed search done"),
    }

    let stats = app.library.stats(&app.session);
    tracing::info!(reading = stats.reading, read = stats.read, "{}", app.session.greeting());
    for book in &stats.read_books {
        tracing::info!(
            title = %book.title,
            authors = %book.authors,
            finished = %book.finished_reading_at.map(format_date).unwrap_or_default(),
            "read"
        );
    }
    Ok(())
}
