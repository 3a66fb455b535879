pub mod clean_run;
pub mod schema;
pub mod sqlite;
