use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel::ConnectionResult;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::debug;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub fn establish_connection(database_url: &str) -> ConnectionResult<SqliteConnection> {
    debug!("connecting to {}", database_url);
    SqliteConnection::establish(database_url)
}

/// Creates the `clean_run` table when it is missing. Host-application
/// tables belong to the host and are never migrated here.
pub fn run_migrations(
    conn: &mut SqliteConnection,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}
