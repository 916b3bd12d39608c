//! CLI subcommands

pub mod collect;
pub mod status;

use std::path::PathBuf;

use anyhow::{Context, Result};
use shelf_config::Config;
use shelf_store::MysqlSettings;

/// Load configuration without validating it.
///
/// An explicitly passed path must exist; otherwise the default locations are
/// tried in order. Callers validate after applying CLI overrides.
pub fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let config = match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("config file not found: {}", path.display());
            }
            Config::from_file(path).context("failed to load configuration")?
        }
        None => {
            let default_paths = [PathBuf::from("configs/shelf.toml"), PathBuf::from("shelf.toml")];
            let mut loaded = None;
            for path in &default_paths {
                if path.exists() {
                    loaded =
                        Some(Config::from_file(path).context("failed to load configuration")?);
                    break;
                }
            }
            loaded.with_context(|| {
                format!(
                    "no config file found (tried {})",
                    default_paths
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })?
        }
    };

    Ok(config)
}

/// Server settings from the config's database section.
pub fn mysql_settings(config: &Config) -> MysqlSettings {
    MysqlSettings {
        host: config.database.host.clone(),
        port: config.database.port,
        username: config.database.username.clone(),
        password: config.database.password.clone(),
    }
}
