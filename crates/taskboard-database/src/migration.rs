//! Schema migrations embedded from the workspace `migrations/` directory.

use sqlx::PgPool;
use tracing::info;

use taskboard_core::error::{AppError, ErrorKind};
use taskboard_core::result::AppResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

/// Apply every pending migration. Returns how many are known.
pub async fn run_migrations(pool: &PgPool) -> AppResult<usize> {
    let known = MIGRATOR.iter().count();
    info!(known, "Applying migrations");

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(ErrorKind::Database, format!("Migration failed: {e}"), e)
    })?;

    info!("Schema is up to date");
    Ok(known)
}
