use std::path::PathBuf;

use diesel::sqlite::SqliteConnection;
use tracing::info;

use crate::actions::{self, OutputSink};
use crate::app_config::AppConfig;
use crate::collect;
use crate::db::clean_run::CleanRun;
use crate::error::CleanError;
use crate::reconcile;
use crate::records::RecordRegistry;
use crate::scan;
use crate::utils;

/// Flags for a single clean run.
#[derive(Debug, Clone, Copy, Default)]
pub struct CleanOptions {
    /// List obsolete files without deleting anything.
    pub dry_run: bool,
    /// Archive obsolete files before any deletion.
    pub backup: bool,
}

/// What a run saw and did, reported to the operator at the end.
#[derive(Debug)]
pub struct CleanSummary {
    pub run_id: i32,
    pub scanned: usize,
    pub referenced: usize,
    pub obsolete: usize,
    pub deleted: usize,
    pub failed: usize,
    pub log_file: Option<PathBuf>,
    pub backup_file: Option<PathBuf>,
}

impl CleanSummary {
    pub fn report(&self, sink: &mut dyn OutputSink) {
        sink.emit(&format!(
            "run {}: scanned {}, referenced {}, obsolete {}, deleted {}, failed {}",
            self.run_id, self.scanned, self.referenced, self.obsolete, self.deleted, self.failed
        ));
    }
}

/// Performs one reconciliation run: scan the upload roots, collect the
/// files still referenced by records, diff the two, optionally archive
/// the obsolete files, then either report them (dry run) or delete them,
/// and save the run record.
///
/// No step is retried. Every failure except a per-file delete is terminal
/// for the run; deletions already performed are not rolled back when the
/// final save fails.
pub fn do_clean(
    config: &AppConfig,
    conn: &mut SqliteConnection,
    registry: &RecordRegistry,
    options: CleanOptions,
    sink: &mut dyn OutputSink,
) -> Result<CleanSummary, CleanError> {
    let media_root = config.media_root();
    let reserved_dir = config.reserved_dir();
    let roots = utils::non_overlapping_directories(config.scan_roots());
    info!("scanning upload roots: {:?}", roots);

    let scanned = scan::files_at_paths(&roots)?;
    let referenced = collect::linked_files_from_all_records(conn, registry, &media_root)?;
    info!(
        "{} files on disk, {} referenced by records",
        scanned.len(),
        referenced.len()
    );

    let scanned_count = scanned.len();
    let obsolete = reconcile::filter_linked_files(scanned, &referenced, &reserved_dir);

    let mut run = CleanRun::create(conn, options.dry_run).map_err(CleanError::Persist)?;
    let run_dir = reserved_dir.join(run.dir_name());

    let mut summary = CleanSummary {
        run_id: run.id,
        scanned: scanned_count,
        referenced: referenced.len(),
        obsolete: obsolete.len(),
        deleted: 0,
        failed: 0,
        log_file: None,
        backup_file: None,
    };

    if options.backup {
        let bundle = actions::create_backup(&obsolete, &run_dir, &media_root)?;
        run.backup_file = Some(bundle.to_string_lossy().into_owned());
        summary.backup_file = Some(bundle);
    }

    if options.dry_run {
        actions::dry_run_report(&obsolete, sink);
    } else {
        let outcome = actions::delete_obsolete_files(&obsolete, &run_dir, sink)?;
        run.log_file = Some(outcome.log_path.to_string_lossy().into_owned());
        summary.deleted = outcome.deleted;
        summary.failed = outcome.failed;
        summary.log_file = Some(outcome.log_path);
    }

    run.save(conn).map_err(CleanError::Persist)?;

    summary.report(sink);
    Ok(summary)
}
