//! Status command - journal progress at a glance

use std::path::PathBuf;

use anyhow::{Context, Result};

use shelf_store::completed_terms_count;

pub async fn run(config_path: Option<PathBuf>) -> Result<()> {
    let config = super::load_config(config_path.as_ref())?;
    config.validate().context("invalid configuration")?;

    let settings = super::mysql_settings(&config);
    let pool = settings.pool(&config.progress_db_name(), 1).await?;

    let completed = completed_terms_count(&pool).await?;
    println!("{completed} terms completed in {}", config.progress_db_name());

    Ok(())
}
