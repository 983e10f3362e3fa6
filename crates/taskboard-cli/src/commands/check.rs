//! Connectivity and registration report.

use serde::Serialize;

use taskboard_core::config::AppConfig;
use taskboard_core::error::AppError;
use taskboard_core::result::AppResult;

use super::Backend;
use crate::output::{self, OutputFormat};

#[derive(Debug, Serialize)]
struct Report<'a> {
    provider: String,
    database: bool,
    default_page_size: u64,
    max_page_size: u64,
    repositories: Vec<&'a str>,
}

pub async fn execute(backend: &Backend, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    let reachable = backend.pool.ping().await?;
    let report = Report {
        provider: format!("{:?}", config.repository.provider).to_lowercase(),
        database: reachable,
        default_page_size: config.repository.default_page_size,
        max_page_size: config.repository.max_page_size,
        repositories: backend.repositories.registered(),
    };

    match format {
        OutputFormat::Json => output::print_item(&report, format),
        OutputFormat::Table => {
            output::print_kv("provider", &report.provider);
            output::print_kv("database", if reachable { "reachable" } else { "unreachable" });
            output::print_kv("default page size", &report.default_page_size.to_string());
            output::print_kv("max page size", &report.max_page_size.to_string());
            println!("  repositories:");
            for name in &report.repositories {
                println!("    - {name}");
            }
        }
    }

    if reachable {
        Ok(())
    } else {
        Err(AppError::database("Database did not answer the ping"))
    }
}
