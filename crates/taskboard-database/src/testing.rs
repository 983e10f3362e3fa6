//! In-memory session that records statements and replays canned results.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use taskboard_core::registry::RepositoryContext;
use taskboard_core::result::AppResult;
use taskboard_core::traits::{QueryResult, Session, SessionHandle, Statement};
use taskboard_core::types::Record;

use crate::filter::postgres_filter_builder;

#[derive(Clone, Default)]
pub struct ScriptedSession {
    executed: Arc<Mutex<Vec<Statement>>>,
    replies: Arc<Mutex<VecDeque<AppResult<QueryResult>>>>,
    commits: Arc<Mutex<u32>>,
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of the next statement. Unscripted statements get an
    /// empty result.
    pub fn reply(&self, result: AppResult<QueryResult>) -> &Self {
        self.replies.lock().unwrap().push_back(result);
        self
    }

    pub fn reply_rows(&self, rows: Vec<Record>) -> &Self {
        self.reply(Ok(QueryResult::from_rows(rows)))
    }

    pub fn reply_total(&self, total: i64) -> &Self {
        self.reply_rows(vec![Record::new().with("total", total)])
    }

    pub fn reply_affected(&self, rows: u64) -> &Self {
        self.reply(Ok(QueryResult::affected(rows)))
    }

    pub fn executed(&self) -> Vec<Statement> {
        self.executed.lock().unwrap().clone()
    }

    pub fn commits(&self) -> u32 {
        *self.commits.lock().unwrap()
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle::new(self.clone())
    }

    pub fn context(&self) -> RepositoryContext {
        RepositoryContext {
            session: self.handle(),
            filter_builder: Arc::new(postgres_filter_builder()),
        }
    }
}

#[async_trait]
impl Session for ScriptedSession {
    async fn atomic_execute(&mut self, statement: &Statement) -> AppResult<QueryResult> {
        self.executed.lock().unwrap().push(statement.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(QueryResult::default()))
    }

    async fn commit(&mut self) -> AppResult<()> {
        *self.commits.lock().unwrap() += 1;
        Ok(())
    }

    async fn rollback(&mut self) -> AppResult<()> {
        Ok(())
    }
}
