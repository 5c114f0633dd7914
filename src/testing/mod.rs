//! In-memory database doubles for exercising the crawl without MySQL.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;

use crate::db::{DbConnection, DbError, QueryExecutor, SqlRow, SqlValue};
use crate::schema_catalog::{ForeignKeyEdge, TableSchema};

/// Executor scripted with exact SQL to rows mappings. Statements with no
/// mapping return an empty result set; every statement is recorded in
/// `queries` in execution order.
#[derive(Default)]
pub struct ScriptedDb {
    responses: HashMap<String, Vec<SqlRow>>,
    failure: Option<String>,
    pub queries: Vec<String>,
}

impl ScriptedDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, sql: &str, rows: Vec<SqlRow>) -> Self {
        self.responses.insert(sql.to_string(), rows);
        self
    }

    /// Make every fetch fail with a fatal query error.
    pub fn failing_with(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }
}

#[async_trait]
impl QueryExecutor for ScriptedDb {
    async fn fetch(&mut self, sql: &str) -> Result<Vec<SqlRow>, DbError> {
        self.queries.push(sql.to_string());
        if let Some(message) = &self.failure {
            return Err(DbError::Query(message.clone()));
        }
        Ok(self.responses.get(sql).cloned().unwrap_or_default())
    }
}

/// Connection double whose answers play back in order, for driving the
/// retry policy.
pub struct FlakyConnection {
    script: VecDeque<Result<Vec<SqlRow>, DbError>>,
    pub reconnects: usize,
    pub reconnect_fails: bool,
}

impl FlakyConnection {
    pub fn new(script: Vec<Result<Vec<SqlRow>, DbError>>) -> Self {
        Self {
            script: script.into(),
            reconnects: 0,
            reconnect_fails: false,
        }
    }
}

#[async_trait]
impl DbConnection for FlakyConnection {
    async fn run(&mut self, _sql: &str) -> Result<Vec<SqlRow>, DbError> {
        self.script.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn reconnect(&mut self) -> Result<(), DbError> {
        self.reconnects += 1;
        if self.reconnect_fails {
            Err(DbError::Connect("reconnect refused".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Build a row from parallel column and value slices.
pub fn row(columns: &[&str], values: Vec<SqlValue>) -> SqlRow {
    let columns: Arc<[String]> = columns
        .iter()
        .map(|column| column.to_string())
        .collect::<Vec<_>>()
        .into();
    SqlRow::new(columns, values)
}

pub fn int(n: i64) -> SqlValue {
    SqlValue::Int(n)
}

pub fn text(s: &str) -> SqlValue {
    SqlValue::Text(s.to_string())
}

pub fn null() -> SqlValue {
    SqlValue::Null
}

/// Build a table descriptor; foreign keys are (column, parent table,
/// parent column) triples.
pub fn table(
    name: &str,
    columns: &[&str],
    primary_key: Option<&str>,
    foreign_keys: &[(&str, &str, &str)],
) -> TableSchema {
    TableSchema {
        name: name.to_string(),
        columns: columns.iter().map(|column| column.to_string()).collect(),
        primary_key: primary_key.map(str::to_string),
        foreign_keys: foreign_keys
            .iter()
            .map(|(column, parent_table, parent_column)| ForeignKeyEdge {
                column: column.to_string(),
                parent_table: parent_table.to_string(),
                parent_column: parent_column.to_string(),
            })
            .collect(),
    }
}
