//! The closure store: per-table row-id sets, the revisit key, and the
//! union merge that folds traversal branches together.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::db::SqlValue;

/// A single row's identifier. Renders as a SQL literal, so it can be
/// spliced into filters and `--where` clauses; text keys are quoted with
/// embedded quotes doubled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum RowId {
    Int(i64),
    Text(String),
}

impl RowId {
    /// Extract an identifier from a fetched value. NULL yields nothing.
    pub fn from_value(value: &SqlValue) -> Option<Self> {
        match value {
            SqlValue::Null => None,
            SqlValue::Int(n) => Some(RowId::Int(*n)),
            SqlValue::UInt(n) => match i64::try_from(*n) {
                Ok(n) => Some(RowId::Int(n)),
                Err(_) => Some(RowId::Text(n.to_string())),
            },
            SqlValue::Float(f) => Some(RowId::Text(f.to_string())),
            SqlValue::Text(s) => Some(RowId::Text(s.clone())),
        }
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Int(n) => write!(f, "{}", n),
            RowId::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
        }
    }
}

/// One unit of expansion work. Equality is string identity on both
/// fields, which is what suppresses redundant and cyclic re-expansion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TraversalContext {
    pub table: String,
    pub filter: String,
}

impl TraversalContext {
    pub fn new(table: &str, filter: &str) -> Self {
        Self {
            table: table.to_string(),
            filter: filter.to_string(),
        }
    }
}

/// Per-table sets of row identifiers that must be dumped together.
/// Sorted maps and sets keep the generated script deterministic across
/// runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Closure {
    tables: BTreeMap<String, BTreeSet<RowId>>,
}

impl Closure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one row under `table`. Duplicates collapse.
    pub fn record(&mut self, table: &str, id: RowId) {
        self.tables.entry(table.to_string()).or_default().insert(id);
    }

    /// Union merge: for every table on either side the result holds both
    /// sides' ids. Commutative, associative, idempotent.
    pub fn merge(&mut self, other: Closure) {
        for (table, ids) in other.tables {
            self.tables.entry(table).or_default().extend(ids);
        }
    }

    pub fn ids(&self, table: &str) -> Option<&BTreeSet<RowId>> {
        self.tables.get(table)
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<RowId>)> {
        self.tables.iter()
    }
}
