//! CLI command definitions and dispatch.

pub mod admin;
pub mod check;
pub mod migrate;
pub mod user;

use std::future::Future;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::warn;

use taskboard_core::config::{AppConfig, RepositoryProvider};
use taskboard_core::registry::RepositoryGetter;
use taskboard_core::result::AppResult;
use taskboard_core::traits::{SessionHandle, UnitOfWork};
use taskboard_database::{DatabasePool, postgres_filter_builder, postgres_repositories};

use crate::output::OutputFormat;

/// Taskboard administration
#[derive(Debug, Parser)]
#[command(name = "taskboard", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Verify connectivity and list the registered repositories
    Check,
    /// Administrator accounts
    Admin(admin::AdminArgs),
    /// User accounts
    User(user::UserArgs),
}

impl Cli {
    /// Connect, run the command, and close the pool whatever the outcome.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let backend = Backend::connect(config).await?;
        let result = match &self.command {
            Commands::Migrate(args) => migrate::execute(args, &backend).await,
            Commands::Check => check::execute(&backend, config, self.format).await,
            Commands::Admin(args) => admin::execute(args, &backend).await,
            Commands::User(args) => user::execute(args, &backend, config, self.format).await,
        };
        backend.pool.close().await;
        result
    }
}

/// The configured storage backend.
pub struct Backend {
    pub pool: DatabasePool,
    pub repositories: RepositoryGetter,
    unit_of_work: Arc<dyn UnitOfWork>,
}

impl Backend {
    pub async fn connect(config: &AppConfig) -> AppResult<Self> {
        match config.repository.provider {
            RepositoryProvider::Postgres => {
                let pool = DatabasePool::connect(&config.database).await?;
                let repositories = postgres_repositories(Arc::new(postgres_filter_builder()));
                let unit_of_work = Arc::new(pool.unit_of_work());
                Ok(Self {
                    pool,
                    repositories,
                    unit_of_work,
                })
            }
        }
    }

    /// Run `work` in one session. Commits on success, rolls back on error.
    pub async fn transaction<T, F, Fut>(&self, work: F) -> AppResult<T>
    where
        F: FnOnce(SessionHandle) -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        in_session(self.unit_of_work.as_ref(), work).await
    }
}

/// The error from `work` is returned even when the rollback fails too.
async fn in_session<T, F, Fut>(unit_of_work: &dyn UnitOfWork, work: F) -> AppResult<T>
where
    F: FnOnce(SessionHandle) -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let session = unit_of_work.begin().await?;
    match work(session.clone()).await {
        Ok(value) => {
            session.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback) = session.rollback().await {
                warn!(error = %rollback, "Rollback failed after: {}", e);
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use taskboard_core::error::{AppError, ErrorKind};
    use taskboard_core::traits::{QueryResult, Session, Statement};

    use super::*;

    #[derive(Default)]
    struct Outcome {
        commits: usize,
        rollbacks: usize,
    }

    struct RecordingSession {
        outcome: Arc<Mutex<Outcome>>,
        rollback_fails: bool,
    }

    #[async_trait]
    impl Session for RecordingSession {
        async fn atomic_execute(&mut self, _statement: &Statement) -> AppResult<QueryResult> {
            Ok(QueryResult::default())
        }

        async fn commit(&mut self) -> AppResult<()> {
            self.outcome.lock().unwrap().commits += 1;
            Ok(())
        }

        async fn rollback(&mut self) -> AppResult<()> {
            self.outcome.lock().unwrap().rollbacks += 1;
            if self.rollback_fails {
                return Err(AppError::database("connection lost"));
            }
            Ok(())
        }
    }

    struct RecordingUnitOfWork {
        outcome: Arc<Mutex<Outcome>>,
        rollback_fails: bool,
    }

    impl RecordingUnitOfWork {
        fn new(rollback_fails: bool) -> Self {
            Self {
                outcome: Arc::default(),
                rollback_fails,
            }
        }
    }

    #[async_trait]
    impl UnitOfWork for RecordingUnitOfWork {
        async fn begin(&self) -> AppResult<SessionHandle> {
            Ok(SessionHandle::new(RecordingSession {
                outcome: Arc::clone(&self.outcome),
                rollback_fails: self.rollback_fails,
            }))
        }
    }

    #[tokio::test]
    async fn test_success_commits() {
        let uow = RecordingUnitOfWork::new(false);
        let value = in_session(&uow, |_| async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
        let outcome = uow.outcome.lock().unwrap();
        assert_eq!((outcome.commits, outcome.rollbacks), (1, 0));
    }

    #[tokio::test]
    async fn test_failure_rolls_back() {
        let uow = RecordingUnitOfWork::new(false);
        let err = in_session(&uow, |_| async { Err::<(), _>(AppError::conflict("taken")) })
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Conflict));
        let outcome = uow.outcome.lock().unwrap();
        assert_eq!((outcome.commits, outcome.rollbacks), (0, 1));
    }

    #[tokio::test]
    async fn test_failed_rollback_keeps_original_error() {
        let uow = RecordingUnitOfWork::new(true);
        let err = in_session(&uow, |_| async {
            Err::<(), _>(AppError::not_found("User 'ghost' not found"))
        })
        .await
        .unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
        assert_eq!(err.message, "User 'ghost' not found");
        assert_eq!(uow.outcome.lock().unwrap().rollbacks, 1);
    }
}
