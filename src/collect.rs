use std::collections::HashSet;
use std::path::{Path, PathBuf};

use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel::SqliteConnection;
use tracing::debug;

use crate::error::CleanError;
use crate::records::{RecordRegistry, RecordTypeDef};
use crate::utils;

#[derive(Debug, QueryableByName)]
struct FileRefRow {
    #[diesel(sql_type = Text)]
    value: String,
}

/// Collects every file referenced by any registered record type. Reads
/// all rows of every table with at least one file-reference field; for
/// large stores this is the dominant cost of a run.
pub fn linked_files_from_all_records(
    conn: &mut SqliteConnection,
    registry: &RecordRegistry,
    media_root: &Path,
) -> Result<HashSet<PathBuf>, CleanError> {
    let mut referenced = HashSet::new();
    for def in registry.types() {
        for path in linked_files_from_record(conn, def, media_root)? {
            referenced.insert(path);
        }
    }
    Ok(referenced)
}

/// Lists the files referenced by all rows of a single record type.
/// A type with no file-reference fields contributes nothing.
pub fn linked_files_from_record(
    conn: &mut SqliteConnection,
    def: &RecordTypeDef,
    media_root: &Path,
) -> Result<Vec<PathBuf>, CleanError> {
    let mut files = Vec::new();

    for field in def.file_fields() {
        // Identifiers cannot be bound as parameters; both names come from
        // the static registry, not from user input.
        let sql = format!(
            "SELECT \"{field}\" AS value FROM \"{table}\" \
             WHERE \"{field}\" IS NOT NULL AND \"{field}\" <> ''",
            table = def.table,
        );
        let rows: Vec<FileRefRow> = diesel::sql_query(sql)
            .load(conn)
            .map_err(CleanError::Collect)?;
        debug!("{}.{}: {} file references", def.table, field, rows.len());

        for row in rows {
            files.push(resolve_reference(&row.value, media_root));
        }
    }

    Ok(files)
}

/// Resolves a stored file-reference value to an absolute path. Relative
/// values name files under the media root; absolute values are kept as-is.
fn resolve_reference(value: &str, media_root: &Path) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        utils::absolutize(&media_root.join(path))
    }
}
