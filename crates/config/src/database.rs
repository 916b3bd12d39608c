//! Database connection settings

use serde::Deserialize;

/// MySQL connection settings shared by the books and progress databases.
///
/// The two databases live on the same server; each gets its own pool because
/// the writer pool and the journal must not starve each other's connections.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database host. Required.
    pub host: String,

    /// Database port. Default: 3306
    pub port: u16,

    /// Database username. Required.
    pub username: String,

    /// Database password. Required.
    pub password: String,

    /// Books database name. Default: `book_data_<provider>`
    pub books_name: String,

    /// Progress database name. Default: `progress_<provider>`
    pub progress_name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 3306,
            username: String::new(),
            password: String::new(),
            books_name: String::new(),
            progress_name: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_port() {
        let config = DatabaseConfig::default();
        assert_eq!(config.port, 3306);
    }

    #[test]
    fn partial_deserialize_keeps_defaults() {
        let config: DatabaseConfig = toml::from_str("host = \"localhost\"").unwrap();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 3306);
        assert!(config.books_name.is_empty());
    }
}
