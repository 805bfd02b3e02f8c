//! SQLite connection to the bundled catalog.
//!
//! The dataset ships with the application and is never written, so the
//! connection is opened read-only and never creates the file.
//!
//! # One connection
//!
//! The pool is capped at a single connection. Concurrent callers queue on
//! pool acquisition, so no two transactions ever interleave on the handle.

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use vtuber_handbook_core::error::CatalogError;

/// Open a read-only, single-connection pool on the dataset at `path`.
///
/// # Errors
///
/// [`CatalogError::Connection`] if the file is missing or SQLite cannot open
/// it.
pub async fn connect(path: &Path) -> Result<SqlitePool, CatalogError> {
    if !path.is_file() {
        return Err(CatalogError::Connection(format!(
            "dataset not found: {}",
            path.display()
        )));
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .read_only(true)
        .create_if_missing(false)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|e| CatalogError::Connection(format!("{}: {}", path.display(), e)))
}
