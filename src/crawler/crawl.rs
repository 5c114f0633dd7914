//! Orchestration of the two traversal phases.

use std::collections::HashSet;

use crate::db::QueryExecutor;
use crate::schema_catalog::SchemaCatalog;

use super::closure::Closure;
use super::errors::CrawlError;
use super::inbound::expand_inbound;
use super::outbound::expand_outbound;

/// Run both traversal phases from the seed and merge their closures.
///
/// Outbound first: everything the seed rows depend on. Then inbound from
/// the same seed: everything that depends on the seed rows, each
/// dependent row outbound-expanded in turn so second-order dependencies
/// are not missed.
pub async fn crawl(
    executor: &mut dyn QueryExecutor,
    catalog: &SchemaCatalog,
    start_table: &str,
    start_filter: &str,
) -> Result<Closure, CrawlError> {
    println!("collecting outbound data...");
    let mut visited = HashSet::new();
    let mut closure =
        expand_outbound(executor, catalog, start_table, start_filter, &mut visited).await?;
    println!("found tables: {}", closure.table_count());

    println!("collecting inbound data...");
    let inbound = expand_inbound(executor, catalog, start_table, start_filter).await?;
    println!("found tables: {}", inbound.table_count());

    closure.merge(inbound);
    println!("total tables to dump: {}", closure.table_count());

    if log::log_enabled!(log::Level::Debug) {
        match serde_json::to_string(&closure) {
            Ok(json) => log::debug!("closure: {}", json),
            Err(e) => log::debug!("closure not serializable: {}", e),
        }
    }

    Ok(closure)
}
