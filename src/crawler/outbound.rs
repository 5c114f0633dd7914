//! Outbound expansion: from a seed context, pull every row the matching
//! rows transitively depend on through their foreign keys.

use std::collections::HashSet;

use crate::db::QueryExecutor;
use crate::schema_catalog::SchemaCatalog;

use super::closure::{Closure, RowId, TraversalContext};
use super::errors::CrawlError;

/// Expand the dependency closure of every row matching `filter` in
/// `table`: each fetched row is recorded under its table, and every
/// non-null foreign-key value schedules the referenced parent row for
/// expansion in turn.
///
/// `visited` suppresses re-expansion of a (table, filter) context already
/// seen within this invocation, which is what terminates cyclic and
/// self-referencing schemas. The traversal runs off an explicit work
/// stack of contexts rather than the call stack.
pub async fn expand_outbound(
    executor: &mut dyn QueryExecutor,
    catalog: &SchemaCatalog,
    table: &str,
    filter: &str,
    visited: &mut HashSet<TraversalContext>,
) -> Result<Closure, CrawlError> {
    let mut closure = Closure::new();
    let mut pending = vec![TraversalContext::new(table, filter)];

    while let Some(context) = pending.pop() {
        if !visited.insert(context.clone()) {
            continue;
        }
        let schema = catalog
            .table(&context.table)
            .ok_or_else(|| CrawlError::UnknownTable {
                table: context.table.clone(),
            })?;

        let sql = format!("SELECT * FROM {} WHERE {}", context.table, context.filter);
        log::debug!("outbound: {}", sql);
        let rows = executor.fetch(&sql).await?;
        if rows.is_empty() {
            continue;
        }

        let id_column = schema.id_column();
        for row in &rows {
            let value = row.get(id_column).ok_or_else(|| CrawlError::UnknownColumn {
                table: context.table.clone(),
                column: id_column.to_string(),
            })?;
            if let Some(id) = RowId::from_value(value) {
                closure.record(&context.table, id);
            }
        }

        for edge in &schema.foreign_keys {
            for row in &rows {
                let value = row.get(&edge.column).ok_or_else(|| CrawlError::UnknownColumn {
                    table: context.table.clone(),
                    column: edge.column.clone(),
                })?;
                // A null foreign key has nothing to follow.
                let Some(id) = RowId::from_value(value) else {
                    continue;
                };
                let parent_filter = format!("{} = {}", edge.parent_column, id);
                pending.push(TraversalContext::new(&edge.parent_table, &parent_filter));
            }
        }
    }

    Ok(closure)
}
