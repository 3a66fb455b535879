use anyhow::{anyhow, Context};
use clap::{CommandFactory, Parser};
use dotenv::dotenv;
use tracing::error;

use upload_cleaner::actions::StdoutSink;
use upload_cleaner::app_config::AppConfig;
use upload_cleaner::clean::{self, CleanOptions};
use upload_cleaner::cli::{Cli, Commands};
use upload_cleaner::db::clean_run::CleanRun;
use upload_cleaner::db::sqlite;
use upload_cleaner::logging;
use upload_cleaner::records::RecordRegistry;

fn main() {
    dotenv().ok();

    let guard = logging::init_logger();

    let args = Cli::parse();

    let code = match args.command {
        Some(Commands::Clean { dry_run, backup }) => {
            match run_clean(CleanOptions { dry_run, backup }) {
                // Partial failure: some files could not be deleted.
                Ok(failed) if failed > 0 => 1,
                Ok(_) => 0,
                Err(err) => {
                    error!("Error: {err:#}");
                    1
                }
            }
        }
        Some(Commands::History) => run_or_report(run_history),
        Some(Commands::DeleteRun { id }) => run_or_report(|| run_delete_run(id)),
        Some(Commands::PrintConfig) => run_or_report(run_print_config),
        None => {
            let _ = Cli::command().print_long_help();
            0
        }
    };

    drop(guard);
    std::process::exit(code);
}

fn run_or_report(command: impl FnOnce() -> anyhow::Result<()>) -> i32 {
    match command() {
        Ok(()) => 0,
        Err(err) => {
            error!("Error: {err:#}");
            1
        }
    }
}

fn load_config() -> anyhow::Result<AppConfig> {
    AppConfig::load().context("Error loading configuration")
}

fn connect(config: &AppConfig) -> anyhow::Result<diesel::SqliteConnection> {
    let url = config
        .database_url()
        .ok_or_else(|| anyhow!("database_url is not configured and DATABASE_URL is not set"))?;
    let mut conn = sqlite::establish_connection(&url)
        .with_context(|| format!("Error connecting to {url}"))?;
    sqlite::run_migrations(&mut conn).map_err(|err| anyhow!("Error running migrations: {err}"))?;
    Ok(conn)
}

fn run_clean(options: CleanOptions) -> anyhow::Result<usize> {
    let config = load_config()?;
    let mut conn = connect(&config)?;

    let mut registry = RecordRegistry::with_own_tables();
    registry.extend_from(&config.records);

    let mut sink = StdoutSink;
    let summary = clean::do_clean(&config, &mut conn, &registry, options, &mut sink)?;
    Ok(summary.failed)
}

fn run_history() -> anyhow::Result<()> {
    let config = load_config()?;
    let mut conn = connect(&config)?;

    for run in CleanRun::list(&mut conn)? {
        println!(
            "{} #{} dry_run={} log={} backup={}",
            run.timestamp,
            run.id,
            run.dry_run,
            run.log_file.as_deref().unwrap_or("-"),
            run.backup_file.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

fn run_delete_run(id: i32) -> anyhow::Result<()> {
    let config = load_config()?;
    let mut conn = connect(&config)?;

    let run =
        CleanRun::find(&mut conn, id).with_context(|| format!("No clean run with id {id}"))?;
    run.delete(&mut conn)?;
    println!("deleted clean run {id}");
    Ok(())
}

fn run_print_config() -> anyhow::Result<()> {
    let config = load_config()?;
    println!("{config:#?}");
    Ok(())
}
