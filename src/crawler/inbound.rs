//! Inbound expansion: find the rows that point at the seed set, then pull
//! each dependent row's own dependencies.

use std::collections::HashSet;

use crate::db::QueryExecutor;
use crate::schema_catalog::SchemaCatalog;

use super::closure::{Closure, RowId};
use super::errors::CrawlError;
use super::outbound::expand_outbound;

/// Expand the dependent-row closure of the seed: every table holding a
/// foreign key into `start_table` contributes the rows referencing the
/// seed set, and each such row is then outbound-expanded on its own so
/// its dependencies land in the closure too.
///
/// Each dependent row gets a fresh visited set for its outbound pass.
/// The inner expansion is self-terminating, so this repeats work on
/// cyclic schemas instead of sharing revisit state across rows.
pub async fn expand_inbound(
    executor: &mut dyn QueryExecutor,
    catalog: &SchemaCatalog,
    start_table: &str,
    start_filter: &str,
) -> Result<Closure, CrawlError> {
    if catalog.table(start_table).is_none() {
        return Err(CrawlError::UnknownTable {
            table: start_table.to_string(),
        });
    }

    let mut closure = Closure::new();

    for (referencing, edge) in catalog.referencing(start_table) {
        let ref_id = referencing.id_column();
        let sql = format!(
            "SELECT {} FROM {} WHERE {} IN (SELECT {} FROM {} WHERE {})",
            ref_id, referencing.name, edge.column, edge.parent_column, start_table, start_filter
        );
        log::debug!("inbound: {}", sql);
        let rows = executor.fetch(&sql).await?;

        for row in rows {
            let value = row.get(ref_id).ok_or_else(|| CrawlError::UnknownColumn {
                table: referencing.name.clone(),
                column: ref_id.to_string(),
            })?;
            let Some(id) = RowId::from_value(value) else {
                continue;
            };
            closure.record(&referencing.name, id.clone());

            let row_filter = format!("{} = {}", ref_id, id);
            let mut visited = HashSet::new();
            let dependencies = expand_outbound(
                executor,
                catalog,
                &referencing.name,
                &row_filter,
                &mut visited,
            )
            .await?;
            closure.merge(dependencies);
        }
    }

    Ok(closure)
}
