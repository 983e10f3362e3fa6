//! Table and JSON rendering for command results.

use serde::Serialize;
use tabled::{Table, Tabled};

use taskboard_core::types::Paginator;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table if items.is_empty() => println!("No results found."),
        OutputFormat::Table => println!("{}", Table::new(items)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string())
        ),
    }
}

/// One page of rows followed by its position in the listing.
pub fn print_page<T: Serialize + Tabled>(page: &Paginator<T>, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            print_list(&page.elements, format);
            println!(
                "Page {} of {} ({} total)",
                page.page,
                page.total_pages(),
                page.total
            );
        }
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(page).unwrap_or_else(|_| "{}".to_string())
        ),
    }
}

pub fn print_item<T: Serialize + std::fmt::Debug>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => println!("{item:#?}"),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(item).unwrap_or_else(|_| "{}".to_string())
        ),
    }
}

pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {value}", format!("{key}:"));
}
