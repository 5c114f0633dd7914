//! One-shot reflection of tables, columns and foreign keys out of
//! `information_schema`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::db::{QueryExecutor, SqlRow, SqlValue};

use super::errors::CatalogError;

const TABLES_SQL: &str = "SELECT TABLE_NAME FROM information_schema.TABLES \
     WHERE TABLE_SCHEMA = DATABASE() AND TABLE_TYPE = 'BASE TABLE' \
     ORDER BY TABLE_NAME";

const COLUMNS_SQL: &str = "SELECT TABLE_NAME, COLUMN_NAME, COLUMN_KEY \
     FROM information_schema.COLUMNS \
     WHERE TABLE_SCHEMA = DATABASE() \
     ORDER BY TABLE_NAME, ORDINAL_POSITION";

const FOREIGN_KEYS_SQL: &str =
    "SELECT TABLE_NAME, COLUMN_NAME, REFERENCED_TABLE_NAME, REFERENCED_COLUMN_NAME \
     FROM information_schema.KEY_COLUMN_USAGE \
     WHERE TABLE_SCHEMA = DATABASE() AND REFERENCED_TABLE_NAME IS NOT NULL \
     ORDER BY TABLE_NAME, ORDINAL_POSITION";

/// A directed foreign-key reference from a child column to a parent
/// table's key column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyEdge {
    pub column: String,
    pub parent_table: String,
    pub parent_column: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    /// Column names in ordinal order.
    pub columns: Vec<String>,
    /// Primary-key column, when the table declares one.
    pub primary_key: Option<String>,
    pub foreign_keys: Vec<ForeignKeyEdge>,
}

impl TableSchema {
    /// The column used as the row identifier: the primary key when known,
    /// otherwise the first column, otherwise `id`.
    pub fn id_column(&self) -> &str {
        self.primary_key
            .as_deref()
            .or_else(|| self.columns.first().map(String::as_str))
            .unwrap_or("id")
    }
}

/// Read-only snapshot of every base table, loaded once per run. A single
/// run assumes a static schema, so nothing is ever invalidated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaCatalog {
    tables: BTreeMap<String, TableSchema>,
}

impl SchemaCatalog {
    /// Reflect all tables, columns and foreign keys of the connected
    /// database.
    pub async fn load(executor: &mut dyn QueryExecutor) -> Result<Self, CatalogError> {
        let mut tables: BTreeMap<String, TableSchema> = BTreeMap::new();

        for row in &executor.fetch(TABLES_SQL).await? {
            let name = text_field(row, "TABLE_NAME")?;
            tables.insert(
                name.clone(),
                TableSchema {
                    name,
                    columns: Vec::new(),
                    primary_key: None,
                    foreign_keys: Vec::new(),
                },
            );
        }

        for row in &executor.fetch(COLUMNS_SQL).await? {
            let table = text_field(row, "TABLE_NAME")?;
            let column = text_field(row, "COLUMN_NAME")?;
            let key = text_field(row, "COLUMN_KEY")?;
            // Views and system tables are not reflected above; their
            // columns are simply skipped here.
            if let Some(schema) = tables.get_mut(&table) {
                if key == "PRI" && schema.primary_key.is_none() {
                    schema.primary_key = Some(column.clone());
                }
                schema.columns.push(column);
            }
        }

        for row in &executor.fetch(FOREIGN_KEYS_SQL).await? {
            let table = text_field(row, "TABLE_NAME")?;
            let edge = ForeignKeyEdge {
                column: text_field(row, "COLUMN_NAME")?,
                parent_table: text_field(row, "REFERENCED_TABLE_NAME")?,
                parent_column: text_field(row, "REFERENCED_COLUMN_NAME")?,
            };
            if let Some(schema) = tables.get_mut(&table) {
                schema.foreign_keys.push(edge);
            }
        }

        log::info!("reflected {} tables", tables.len());
        Ok(Self { tables })
    }

    /// Build a catalog from already-known table descriptors.
    pub fn from_tables(tables: Vec<TableSchema>) -> Self {
        Self {
            tables: tables
                .into_iter()
                .map(|table| (table.name.clone(), table))
                .collect(),
        }
    }

    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableSchema> {
        self.tables.values()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Every foreign-key edge across the whole schema whose parent is
    /// `parent`. A linear scan: edge direction is not pre-inverted.
    pub fn referencing(&self, parent: &str) -> Vec<(&TableSchema, &ForeignKeyEdge)> {
        let mut hits = Vec::new();
        for schema in self.tables.values() {
            for edge in &schema.foreign_keys {
                if edge.parent_table == parent {
                    hits.push((schema, edge));
                }
            }
        }
        hits
    }
}

fn text_field(row: &SqlRow, column: &str) -> Result<String, CatalogError> {
    match row.get(column) {
        Some(SqlValue::Text(value)) => Ok(value.clone()),
        _ => Err(CatalogError::BadField {
            column: column.to_string(),
        }),
    }
}
