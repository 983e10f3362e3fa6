//! The unit-of-work session repositories execute through.
//!
//! One session spans one logical request. Every repository resolved for
//! that request shares the same [`SessionHandle`], so their statements run
//! inside the same transaction.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::result::AppResult;
use crate::types::record::Record;
use crate::types::value::SqlValue;

/// Whether a statement returns rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Returns rows (`SELECT`, `INSERT ... RETURNING`).
    Query,
    /// Only reports affected rows.
    Command,
}

/// SQL text with `?` placeholders and the values bound to them, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlValue>,
    pub kind: StatementKind,
}

impl Statement {
    /// A statement that returns rows.
    pub fn query(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
            kind: StatementKind::Query,
        }
    }

    /// A statement that only reports affected rows.
    pub fn command(sql: impl Into<String>, params: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
            kind: StatementKind::Command,
        }
    }
}

/// Outcome of one statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub rows: Vec<Record>,
    pub rows_affected: u64,
}

impl QueryResult {
    pub fn from_rows(rows: Vec<Record>) -> Self {
        let rows_affected = rows.len() as u64;
        Self {
            rows,
            rows_affected,
        }
    }

    pub fn affected(rows_affected: u64) -> Self {
        Self {
            rows: Vec::new(),
            rows_affected,
        }
    }

    /// The first row, if any.
    pub fn fetch_one(&self) -> Option<&Record> {
        self.rows.first()
    }

    pub fn fetch_all(&self) -> &[Record] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Record> {
        self.rows
    }
}

/// A transactional connection to the backend.
#[async_trait]
pub trait Session: Send {
    /// Execute one statement inside the session's transaction.
    async fn atomic_execute(&mut self, statement: &Statement) -> AppResult<QueryResult>;

    async fn commit(&mut self) -> AppResult<()>;

    async fn rollback(&mut self) -> AppResult<()>;
}

/// Shared, clonable access to one [`Session`].
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<Box<dyn Session>>>,
}

impl SessionHandle {
    /// Wrap `session` for sharing between repositories.
    pub fn new(session: impl Session + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(session))),
        }
    }

    pub async fn atomic_execute(&self, statement: &Statement) -> AppResult<QueryResult> {
        self.inner.lock().await.atomic_execute(statement).await
    }

    pub async fn commit(&self) -> AppResult<()> {
        self.inner.lock().await.commit().await
    }

    pub async fn rollback(&self) -> AppResult<()> {
        self.inner.lock().await.rollback().await
    }

    /// Returns `true` when both handles share the same session.
    pub fn ptr_eq(&self, other: &SessionHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("handles", &Arc::strong_count(&self.inner))
            .finish()
    }
}

/// Opens sessions.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    async fn begin(&self) -> AppResult<SessionHandle>;
}
