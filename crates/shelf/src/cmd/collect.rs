//! Collect command - run one ingestion to completion

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use shelf_config::{Config, ProviderKind, SearchBy};
use shelf_pipeline::{IngestOptions, run_ingestion};
use shelf_providers::{BookProvider, GoogleProvider, IsbndbConfig, IsbndbProvider, SearchMode};
use shelf_store::{Catalog, Journal, create_book_tables, create_progress_tables};

/// Collect command arguments
#[derive(Args, Debug)]
pub struct CollectArgs {
    /// Input file, one term per line. Overrides the config value.
    #[arg(short, long)]
    pub file: Option<String>,
}

pub async fn run(args: CollectArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut config = super::load_config(config_path.as_ref())?;
    if let Some(file) = args.file {
        config.ingest.file = file;
    }
    config.validate().context("invalid configuration")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        provider = %config.provider.kind,
        search_by = %config.ingest.search_by,
        file = %config.ingest.file,
        "shelf starting"
    );

    let settings = super::mysql_settings(&config);
    let books_db = config.books_db_name();
    let progress_db = config.progress_db_name();

    settings
        .create_databases(&[books_db.as_str(), progress_db.as_str()])
        .await
        .context("failed to create databases")?;

    // One connection above the writer pool so the startup cache load and the
    // journal never starve the writers.
    let pool_size = config.ingest.db_writers + 1;
    let books_pool = settings.pool(&books_db, pool_size).await?;
    let progress_pool = settings.pool(&progress_db, pool_size).await?;

    create_book_tables(&books_pool)
        .await
        .context("failed to create book tables")?;
    create_progress_tables(&progress_pool)
        .await
        .context("failed to create progress tables")?;

    let catalog = Arc::new(Catalog::open(books_pool).await?);
    let journal = Arc::new(Journal::open(progress_pool).await?);

    let mode = search_mode(config.ingest.search_by);
    let provider = build_provider(&config, mode)?;

    let options = IngestOptions {
        mode,
        calls_per_second: config.ingest.calls_per_second,
        timeout_seconds: config.ingest.timeout_seconds,
        db_writers: config.ingest.db_writers,
    };

    let report = run_ingestion(options, &config.ingest.file, provider, catalog, journal)
        .await
        .context("ingestion failed")?;

    println!(
        "Done. {} books saved, {} duplicates skipped, {} terms completed.",
        report.metrics.books_saved, report.metrics.books_skipped, report.metrics.terms_completed
    );
    Ok(())
}

fn search_mode(search_by: SearchBy) -> SearchMode {
    match search_by {
        SearchBy::Title => SearchMode::Title,
        SearchBy::Subject => SearchMode::Subject,
        SearchBy::Isbn => SearchMode::Isbn,
    }
}

fn build_provider(config: &Config, mode: SearchMode) -> Result<Arc<dyn BookProvider>> {
    let provider: Arc<dyn BookProvider> = match config.provider.kind {
        ProviderKind::Isbndb => Arc::new(IsbndbProvider::new(IsbndbConfig {
            base_url: config.provider.isbndb_subscription.base_url().to_string(),
            api_key: config.provider.isbndb_api_key.clone(),
            mode,
        })?),
        ProviderKind::Google => Arc::new(GoogleProvider::new(mode)?),
    };
    Ok(provider)
}
