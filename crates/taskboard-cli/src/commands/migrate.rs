//! Schema migrations.

use clap::{Args, Subcommand};

use taskboard_core::result::AppResult;
use taskboard_database::migration::run_migrations;

use super::Backend;
use crate::output;

#[derive(Debug, Args)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub command: MigrateCommand,
}

#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Apply all pending migrations
    Run,
}

pub async fn execute(args: &MigrateArgs, backend: &Backend) -> AppResult<()> {
    match &args.command {
        MigrateCommand::Run => {
            let known = run_migrations(backend.pool.pool()).await?;
            output::print_success(&format!("Schema up to date ({known} migrations)."));
        }
    }
    Ok(())
}
