//! Repository layer configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Storage backend that repositories resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryProvider {
    /// PostgreSQL through sqlx.
    Postgres,
}

/// Repository layer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Active storage backend.
    #[serde(default = "default_provider")]
    pub provider: RepositoryProvider,
    /// Page size used when a list request does not specify one.
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    /// Largest page size a list request may ask for.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

impl RepositoryConfig {
    /// Reject page size settings that could never produce a page.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.default_page_size == 0 || self.max_page_size == 0 {
            return Err(AppError::configuration(
                "repository page sizes must be at least 1",
            ));
        }
        if self.default_page_size > self.max_page_size {
            return Err(AppError::configuration(format!(
                "repository.default_page_size ({}) exceeds repository.max_page_size ({})",
                self.default_page_size, self.max_page_size
            )));
        }
        Ok(())
    }
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_provider() -> RepositoryProvider {
    RepositoryProvider::Postgres
}

fn default_page_size() -> u64 {
    30
}

fn default_max_page_size() -> u64 {
    100
}
