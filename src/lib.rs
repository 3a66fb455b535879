pub mod actions;
pub mod app_config;
pub mod clean;
pub mod cli;
pub mod collect;
pub mod db;
pub mod error;
pub mod logging;
pub mod reconcile;
pub mod records;
pub mod scan;
pub mod utils;
