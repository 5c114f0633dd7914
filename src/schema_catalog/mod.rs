pub mod catalog;
pub mod errors;

pub use catalog::{ForeignKeyEdge, SchemaCatalog, TableSchema};
pub use errors::CatalogError;
