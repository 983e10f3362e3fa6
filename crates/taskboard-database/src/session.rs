//! Transactional PostgreSQL session.
//!
//! A [`PgSession`] owns one transaction from the moment it is opened until
//! `commit` or `rollback`. Every repository resolved for the session runs its
//! statements inside that transaction.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::postgres::{PgArguments, PgColumn, PgPool, PgRow};
use sqlx::query::Query;
use sqlx::{Column, Postgres, Row, Transaction, TypeInfo};
use tracing::debug;

use taskboard_core::error::{AppError, ErrorKind};
use taskboard_core::result::AppResult;
use taskboard_core::traits::{
    QueryResult, Session, SessionHandle, Statement, StatementKind, UnitOfWork,
};
use taskboard_core::types::{Record, SqlType, SqlValue};

use crate::statement::number_placeholders;

type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

pub struct PgSession {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgSession {
    pub async fn begin(pool: &PgPool) -> AppResult<Self> {
        let tx = pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Could not begin transaction", e)
        })?;
        debug!("Transaction opened");
        Ok(Self { tx: Some(tx) })
    }

    fn transaction(&mut self) -> AppResult<&mut Transaction<'static, Postgres>> {
        self.tx
            .as_mut()
            .ok_or_else(|| AppError::database("Session is closed"))
    }

    fn take(&mut self) -> AppResult<Transaction<'static, Postgres>> {
        self.tx
            .take()
            .ok_or_else(|| AppError::database("Session is closed"))
    }
}

#[async_trait]
impl Session for PgSession {
    async fn atomic_execute(&mut self, statement: &Statement) -> AppResult<QueryResult> {
        let sql = number_placeholders(&statement.sql);
        let tx = self.transaction()?;
        let query = statement
            .params
            .iter()
            .fold(sqlx::query(&sql), |query, value| bind(query, value));

        match statement.kind {
            StatementKind::Query => {
                let rows = query
                    .fetch_all(&mut **tx)
                    .await
                    .map_err(|e| statement_error(&statement.sql, e))?;
                let records = rows.iter().map(decode_row).collect::<AppResult<Vec<_>>>()?;
                Ok(QueryResult::from_rows(records))
            }
            StatementKind::Command => {
                let done = query
                    .execute(&mut **tx)
                    .await
                    .map_err(|e| statement_error(&statement.sql, e))?;
                Ok(QueryResult::affected(done.rows_affected()))
            }
        }
    }

    async fn commit(&mut self) -> AppResult<()> {
        self.take()?.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Could not commit transaction", e)
        })?;
        debug!("Transaction committed");
        Ok(())
    }

    async fn rollback(&mut self) -> AppResult<()> {
        self.take()?.rollback().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Could not roll back transaction", e)
        })?;
        debug!("Transaction rolled back");
        Ok(())
    }
}

fn statement_error(sql: &str, e: sqlx::Error) -> AppError {
    AppError::with_source(ErrorKind::Database, format!("Statement failed: {sql}"), e)
}

fn bind<'q>(query: PgQuery<'q>, value: &SqlValue) -> PgQuery<'q> {
    match value {
        SqlValue::Null(ty) => match ty {
            SqlType::Bool => query.bind(None::<bool>),
            SqlType::Integer => query.bind(None::<i64>),
            SqlType::Float => query.bind(None::<f64>),
            SqlType::Text => query.bind(None::<String>),
            SqlType::Timestamp => query.bind(None::<DateTime<Utc>>),
            SqlType::Date => query.bind(None::<NaiveDate>),
            SqlType::Json => query.bind(None::<serde_json::Value>),
        },
        SqlValue::Bool(v) => query.bind(*v),
        SqlValue::Integer(v) => query.bind(*v),
        SqlValue::Float(v) => query.bind(*v),
        SqlValue::Text(v) => query.bind(v.clone()),
        SqlValue::Timestamp(v) => query.bind(*v),
        SqlValue::Date(v) => query.bind(*v),
        SqlValue::Json(v) => query.bind(v.clone()),
    }
}

fn decode_row(row: &PgRow) -> AppResult<Record> {
    row.columns()
        .iter()
        .map(|column| Ok((column.name().to_string(), decode_column(row, column)?)))
        .collect()
}

fn decode_column(row: &PgRow, column: &PgColumn) -> AppResult<SqlValue> {
    let i = column.ordinal();
    let decoded = match column.type_info().name() {
        "BOOL" => row.try_get::<Option<bool>, _>(i).map(SqlValue::from),
        "INT2" => row
            .try_get::<Option<i16>, _>(i)
            .map(|v| SqlValue::from(v.map(i64::from))),
        "INT4" => row
            .try_get::<Option<i32>, _>(i)
            .map(|v| SqlValue::from(v.map(i64::from))),
        "INT8" => row.try_get::<Option<i64>, _>(i).map(SqlValue::from),
        "FLOAT4" => row
            .try_get::<Option<f32>, _>(i)
            .map(|v| SqlValue::from(v.map(f64::from))),
        "FLOAT8" => row.try_get::<Option<f64>, _>(i).map(SqlValue::from),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => {
            row.try_get::<Option<String>, _>(i).map(SqlValue::from)
        }
        "UUID" => row
            .try_get::<Option<uuid::Uuid>, _>(i)
            .map(|v| SqlValue::from(v.map(|id| id.to_string()))),
        "TIMESTAMPTZ" => row
            .try_get::<Option<DateTime<Utc>>, _>(i)
            .map(SqlValue::from),
        "TIMESTAMP" => row
            .try_get::<Option<NaiveDateTime>, _>(i)
            .map(|v| SqlValue::from(v.map(|at| at.and_utc()))),
        "DATE" => row.try_get::<Option<NaiveDate>, _>(i).map(SqlValue::from),
        "JSON" | "JSONB" => row
            .try_get::<Option<serde_json::Value>, _>(i)
            .map(SqlValue::from),
        other => {
            return Err(AppError::serialization(format!(
                "Column '{}' has unsupported type {other}",
                column.name()
            )));
        }
    };
    decoded.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Could not decode column '{}'", column.name()),
            e,
        )
    })
}

/// Opens a [`PgSession`] per unit of work.
#[derive(Debug, Clone)]
pub struct PgUnitOfWork {
    pool: PgPool,
}

impl PgUnitOfWork {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn begin(&self) -> AppResult<SessionHandle> {
        Ok(SessionHandle::new(PgSession::begin(&self.pool).await?))
    }
}
