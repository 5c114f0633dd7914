use thiserror::Error;

use crate::db::DbError;

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error("no table named `{table}` in the schema")]
    UnknownTable { table: String },

    #[error("table `{table}` has no column `{column}`")]
    UnknownColumn { table: String, column: String },
}
