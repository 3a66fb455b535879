use clap::{Parser, Subcommand};

#[derive(Debug, Parser)] // requires `derive` feature
#[command(name = "upload-cleaner")]
#[command(about = "Removes uploaded files no longer referenced by any record", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan the upload roots and delete files no record references
    Clean {
        /// List obsolete files without deleting them
        #[arg(long)]
        dry_run: bool,
        /// Archive obsolete files into a zip bundle before deletion
        #[arg(long)]
        backup: bool,
    },
    /// List recorded clean runs
    History,
    /// Delete a recorded run along with its log and backup files
    DeleteRun {
        /// Id of the run record to delete
        id: i32,
    },
    /// Print configuration values
    PrintConfig,
}
