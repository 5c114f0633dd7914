use thiserror::Error;

use crate::db::DbError;

/// Errors raised while reflecting the database schema.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("schema reflection failed: {0}")]
    Reflection(String),

    #[error("introspection row has no usable `{column}` value")]
    BadField { column: String },
}

impl From<DbError> for CatalogError {
    fn from(err: DbError) -> Self {
        CatalogError::Reflection(err.to_string())
    }
}
