//! Application configuration.
//!
//! Deserialized from TOML via the `config` crate and overlaid with
//! environment variables prefixed `TASKBOARD__`.

pub mod database;
pub mod logging;
pub mod repository;

use serde::{Deserialize, Serialize};

pub use self::database::DatabaseConfig;
pub use self::logging::{LogFormat, LoggingConfig};
pub use self::repository::{RepositoryConfig, RepositoryProvider};

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub repository: RepositoryConfig,
}

impl AppConfig {
    /// Load configuration from `path` (optional) and the environment.
    ///
    /// `TASKBOARD__DATABASE__URL=postgres://...` overrides `database.url`.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("TASKBOARD")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app: Self = config.try_deserialize()?;
        app.repository.validate()?;
        Ok(app)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::error::ErrorKind;

    fn write_config(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("taskboard-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_reads_sections() {
        let path = write_config(
            "[database]\nurl = \"postgres://localhost/tb\"\n\n[logging]\nformat = \"json\"\n",
        );
        let config = AppConfig::load(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.database.url, "postgres://localhost/tb");
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_malformed_file_is_configuration_error() {
        let path = write_config("[database\nurl = ");
        let err = AppConfig::load(path.to_str().unwrap()).unwrap_err();
        std::fs::remove_file(&path).unwrap();

        assert!(err.is(ErrorKind::Configuration));
        assert!(err.source.is_some());
    }
}
