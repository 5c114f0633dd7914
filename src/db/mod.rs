//! Database access layer: a driver-agnostic row representation, the
//! query executor trait the crawl runs against, and the reconnect-once
//! retry policy wrapped around the live connection.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub mod mysql;

pub use mysql::MySqlConnection;

/// Database errors, split by how the crawl reacts to them.
#[derive(Debug, Error)]
pub enum DbError {
    /// Establishing (or re-establishing) the connection failed. Fatal.
    #[error("failed to connect: {0}")]
    Connect(String),

    /// The server dropped the connection mid-query. Recoverable exactly
    /// once per statement.
    #[error("connection lost: {0}")]
    ConnectionLost(String),

    /// Any other failure the database reported. Fatal.
    #[error("query failed: {0}")]
    Query(String),
}

/// A single fetched value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

/// A fetched row with named-column access.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlRow {
    columns: Arc<[String]>,
    values: Vec<SqlValue>,
}

impl SqlRow {
    pub fn new(columns: Arc<[String]>, values: Vec<SqlValue>) -> Self {
        Self { columns, values }
    }

    /// Look up a value by column name. Lookup is case-insensitive since
    /// `information_schema` reports upper-cased column labels while data
    /// tables keep their declared casing.
    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .position(|column| column.eq_ignore_ascii_case(name))
            .map(|index| &self.values[index])
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

/// A raw database connection: runs one statement, and can be
/// re-established in place after the server drops it.
#[async_trait]
pub trait DbConnection: Send {
    async fn run(&mut self, sql: &str) -> Result<Vec<SqlRow>, DbError>;

    async fn reconnect(&mut self) -> Result<(), DbError>;
}

/// What the crawl itself depends on. Every query of a run, including
/// schema reflection, goes through one executor handle.
#[async_trait]
pub trait QueryExecutor: Send {
    async fn fetch(&mut self, sql: &str) -> Result<Vec<SqlRow>, DbError>;
}

/// Executor with the reconnect-once policy: a lost connection is
/// re-established and the same statement replayed a single time. A second
/// loss, a reconnect failure, or any other error escalates unchanged.
pub struct RetryingExecutor<C> {
    conn: C,
}

impl<C: DbConnection> RetryingExecutor<C> {
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    pub fn into_inner(self) -> C {
        self.conn
    }
}

#[async_trait]
impl<C: DbConnection> QueryExecutor for RetryingExecutor<C> {
    async fn fetch(&mut self, sql: &str) -> Result<Vec<SqlRow>, DbError> {
        match self.conn.run(sql).await {
            Err(DbError::ConnectionLost(reason)) => {
                log::warn!("connection lost ({}), reconnecting and retrying", reason);
                self.conn.reconnect().await?;
                self.conn.run(sql).await
            }
            other => other,
        }
    }
}
