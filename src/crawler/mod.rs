//! The relation-closure crawl: outbound dependency expansion, inbound
//! dependent discovery, and the merged per-table row-id result.

pub mod closure;
pub mod crawl;
pub mod errors;
pub mod inbound;
pub mod outbound;

pub use closure::{Closure, RowId, TraversalContext};
pub use crawl::crawl;
pub use errors::CrawlError;
pub use inbound::expand_inbound;
pub use outbound::expand_outbound;
