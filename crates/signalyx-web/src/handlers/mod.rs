//! API handlers, one module per resource.

pub mod companies;
pub mod contacts;
pub mod credits;
pub mod dashboard;
pub mod enrichments;
pub mod events;
pub mod partners;
pub mod scans;
pub mod settings;
pub mod signals;
pub mod system;

use signalyx_common::ApiError;
use signalyx_db::DbError;

/// Repository errors become API errors the same way everywhere.
pub(crate) fn db_err(e: DbError) -> ApiError {
    match e {
        DbError::NotFound(m) => ApiError::NotFound(m),
        other => ApiError::Internal(other.to_string()),
    }
}
