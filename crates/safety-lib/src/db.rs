//! SQLite connection helpers shared by the hotzone and community stores.
//!
//! Stores never hold a connection between calls. Every operation opens one
//! with [`open_connection`], uses it, and lets it drop, which closes the file
//! handle on every return path including `?` early exits.

use std::fs;
use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, Row};

use crate::error::{Error, Result};

/// Open a connection to `path` with foreign key enforcement enabled.
///
/// Rows read through this connection are addressed by column name
/// (`row.get("column")`).
pub fn open_connection(path: &Path) -> Result<Connection> {
    let connection = Connection::open(path)?;
    connection.pragma_update(None, "foreign_keys", true)?;
    Ok(connection)
}

/// Make sure the directory that will hold `path` exists.
pub fn prepare_store_path(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| Error::StoreDirectory {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

/// Number of rows in `table`. `table` must be a trusted identifier.
pub(crate) fn count_rows(connection: &Connection, table: &str) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {table}");
    Ok(connection.query_row(&sql, [], |row| row.get(0))?)
}

/// Whether a row with primary key `id` exists in `table`.
pub(crate) fn row_exists(connection: &Connection, table: &str, id: i64) -> Result<bool> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1)");
    Ok(connection.query_row(&sql, [id], |row| row.get(0))?)
}

/// Read a date/time column as text.
///
/// `DATE` columns have numeric affinity, so a value such as `2024` comes back
/// as an integer rather than a string.
pub(crate) fn text_column(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<String>> {
    Ok(match row.get_ref(column)? {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) | ValueRef::Blob(t) => Some(String::from_utf8_lossy(t).into_owned()),
    })
}
