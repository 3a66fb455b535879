use std::fs;
use std::io;
use std::path::Path;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use tracing::{debug, warn};

use super::schema::clean_run;

/// One recorded clean run. The log and backup files belong to the record;
/// deleting the record deletes them too.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = clean_run)]
pub struct CleanRun {
    pub id: i32,
    pub timestamp: NaiveDateTime,
    pub dry_run: bool,
    pub log_file: Option<String>,
    pub backup_file: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = clean_run)]
struct NewCleanRun {
    dry_run: bool,
}

impl CleanRun {
    /// Inserts a fresh record; the store assigns the id and timestamp.
    pub fn create(conn: &mut SqliteConnection, dry_run: bool) -> QueryResult<CleanRun> {
        diesel::insert_into(clean_run::table)
            .values(NewCleanRun { dry_run })
            .returning(CleanRun::as_returning())
            .get_result(conn)
    }

    /// Writes the current log and backup references back to the store.
    /// The timestamp is immutable and never updated.
    pub fn save(&self, conn: &mut SqliteConnection) -> QueryResult<usize> {
        diesel::update(clean_run::table.find(self.id))
            .set((
                clean_run::dry_run.eq(self.dry_run),
                clean_run::log_file.eq(self.log_file.as_deref()),
                clean_run::backup_file.eq(self.backup_file.as_deref()),
            ))
            .execute(conn)
    }

    pub fn find(conn: &mut SqliteConnection, run_id: i32) -> QueryResult<CleanRun> {
        clean_run::table
            .find(run_id)
            .select(CleanRun::as_select())
            .first(conn)
    }

    /// All recorded runs, oldest first.
    pub fn list(conn: &mut SqliteConnection) -> QueryResult<Vec<CleanRun>> {
        clean_run::table
            .order(clean_run::timestamp.asc())
            .select(CleanRun::as_select())
            .load(conn)
    }

    /// Directory name under the reserved output directory for this run's
    /// log and backup files.
    pub fn dir_name(&self) -> String {
        self.timestamp.format("%Y%m%d-%H%M%S").to_string()
    }

    /// Removes the attached files, then the record itself. A file already
    /// gone from disk is not an error.
    pub fn delete(self, conn: &mut SqliteConnection) -> QueryResult<()> {
        for file in [&self.log_file, &self.backup_file].into_iter().flatten() {
            remove_attached_file(file);
        }
        diesel::delete(&self).execute(conn)?;
        Ok(())
    }
}

fn remove_attached_file(file: &str) {
    match fs::remove_file(Path::new(file)) {
        Ok(()) => debug!("removed {}", file),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => warn!("could not remove {}: {}", file, err),
    }
}
