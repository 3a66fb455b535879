use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{ArchiveError, CleanError};

pub const BACKUP_FILE_NAME: &str = "backup.zip";
pub const LOG_FILE_NAME: &str = "deleted_files.log";

/// Destination for the per-file lines a run shows the operator.
pub trait OutputSink {
    fn emit(&mut self, line: &str);
}

/// Writes run output to stdout.
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn emit(&mut self, line: &str) {
        println!("{line}");
    }
}

/// What the delete step of a single run did.
#[derive(Debug)]
pub struct PurgeOutcome {
    pub log_path: PathBuf,
    pub deleted: usize,
    pub failed: usize,
}

/// Bundles every obsolete file into `backup.zip` under the run directory,
/// creating the directory and any missing parents first. Source files are
/// left in place. A file that became unreadable since the scan fails the
/// backup; partial bundles are not accepted silently.
pub fn create_backup(
    obsolete: &[PathBuf],
    run_dir: &Path,
    media_root: &Path,
) -> Result<PathBuf, CleanError> {
    let bundle_path = run_dir.join(BACKUP_FILE_NAME);

    write_bundle(obsolete, &bundle_path, run_dir, media_root).map_err(|source| {
        CleanError::Archive {
            path: bundle_path.clone(),
            source,
        }
    })?;

    info!("wrote backup bundle {}", bundle_path.display());
    Ok(bundle_path)
}

fn write_bundle(
    obsolete: &[PathBuf],
    bundle_path: &Path,
    run_dir: &Path,
    media_root: &Path,
) -> Result<(), ArchiveError> {
    fs::create_dir_all(run_dir)?;

    let file = File::create(bundle_path)?;
    let mut bundle = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in obsolete {
        bundle.start_file(entry_name(path, media_root), options)?;
        let mut source = File::open(path)?;
        io::copy(&mut source, &mut bundle)?;
    }

    bundle.finish()?.flush()?;
    Ok(())
}

/// Entry name for a file in the backup bundle: relative to the media root
/// when it lives under it, otherwise its absolute path with the leading
/// separator stripped.
fn entry_name(path: &Path, media_root: &Path) -> String {
    let relative = path.strip_prefix(media_root).unwrap_or(path);
    let name = relative.to_string_lossy().replace('\\', "/");
    name.trim_start_matches('/').to_string()
}

/// Lists the obsolete files without touching them.
pub fn dry_run_report(obsolete: &[PathBuf], sink: &mut dyn OutputSink) {
    for path in obsolete {
        sink.emit(&format!("dryrun: {}", path.display()));
    }
}

/// Deletes every obsolete file, recording each one in `deleted_files.log`
/// before the removal is attempted, so the log reflects intent even when a
/// delete fails. A file that cannot be removed is noted in the log and
/// counted; the run moves on to the next one.
pub fn delete_obsolete_files(
    obsolete: &[PathBuf],
    run_dir: &Path,
    sink: &mut dyn OutputSink,
) -> Result<PurgeOutcome, CleanError> {
    let log_path = run_dir.join(LOG_FILE_NAME);
    let log_io = |source: io::Error| CleanError::Log {
        path: log_path.clone(),
        source,
    };

    fs::create_dir_all(run_dir).map_err(&log_io)?;
    let mut log = BufWriter::new(File::create(&log_path).map_err(&log_io)?);

    let mut deleted = 0usize;
    let mut failed = 0usize;

    for path in obsolete {
        let line = format!("removing: {}", path.display());
        sink.emit(&line);
        writeln!(log, "{line}").map_err(&log_io)?;

        match fs::remove_file(path) {
            Ok(()) => {
                deleted += 1;
            }
            Err(err) => {
                failed += 1;
                warn!("could not remove {}: {}", path.display(), err);
                writeln!(log, "failed: {}: {}", path.display(), err).map_err(&log_io)?;
            }
        }
    }

    log.flush().map_err(&log_io)?;

    Ok(PurgeOutcome {
        log_path,
        deleted,
        failed,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    struct VecSink(Vec<String>);

    impl OutputSink for VecSink {
        fn emit(&mut self, line: &str) {
            self.0.push(line.to_string());
        }
    }

    #[test]
    fn entry_names_are_relative_to_media_root() {
        assert_eq!(
            "uploads/a.txt",
            entry_name(Path::new("/m/uploads/a.txt"), Path::new("/m"))
        );
        assert_eq!(
            "elsewhere/b.txt",
            entry_name(Path::new("/elsewhere/b.txt"), Path::new("/m"))
        );
    }

    #[test]
    fn dry_run_emits_one_line_per_file_and_mutates_nothing() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("stale.txt");
        fs::write(&file, b"stale").unwrap();

        let mut sink = VecSink(Vec::new());
        dry_run_report(&[file.clone()], &mut sink);

        assert_eq!(vec![format!("dryrun: {}", file.display())], sink.0);
        assert!(file.exists());
    }

    #[test]
    fn purge_deletes_files_and_logs_each_one() {
        let dir = tempdir().unwrap();
        let run_dir = dir.path().join("run");
        let one = dir.path().join("one.txt");
        let two = dir.path().join("two.txt");
        fs::write(&one, b"1").unwrap();
        fs::write(&two, b"2").unwrap();

        let mut sink = VecSink(Vec::new());
        let outcome =
            delete_obsolete_files(&[one.clone(), two.clone()], &run_dir, &mut sink).unwrap();

        assert_eq!(2, outcome.deleted);
        assert_eq!(0, outcome.failed);
        assert!(!one.exists());
        assert!(!two.exists());

        let log = fs::read_to_string(&outcome.log_path).unwrap();
        assert_eq!(
            format!(
                "removing: {}\nremoving: {}\n",
                one.display(),
                two.display()
            ),
            log
        );
        assert_eq!(2, sink.0.len());
    }

    #[test]
    fn purge_continues_past_a_file_that_cannot_be_removed() {
        let dir = tempdir().unwrap();
        let run_dir = dir.path().join("run");
        // A directory path cannot be removed with remove_file, regardless
        // of privileges.
        let stubborn = dir.path().join("stubborn");
        fs::create_dir(&stubborn).unwrap();
        let plain = dir.path().join("plain.txt");
        fs::write(&plain, b"p").unwrap();

        let mut sink = VecSink(Vec::new());
        let outcome =
            delete_obsolete_files(&[stubborn.clone(), plain.clone()], &run_dir, &mut sink)
                .unwrap();

        assert_eq!(1, outcome.deleted);
        assert_eq!(1, outcome.failed);
        assert!(stubborn.exists());
        assert!(!plain.exists());

        let log = fs::read_to_string(&outcome.log_path).unwrap();
        assert!(log.contains(&format!("removing: {}", stubborn.display())));
        assert!(log.contains(&format!("failed: {}", stubborn.display())));
        assert!(log.contains(&format!("removing: {}", plain.display())));
    }

    #[test]
    fn backup_bundles_files_without_removing_them() {
        let dir = tempdir().unwrap();
        let run_dir = dir.path().join("run");
        let file = dir.path().join("uploads").join("a.txt");
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(&file, b"payload").unwrap();

        let bundle = create_backup(&[file.clone()], &run_dir, dir.path()).unwrap();

        assert!(file.exists());
        let mut archive = zip::ZipArchive::new(File::open(&bundle).unwrap()).unwrap();
        assert_eq!(1, archive.len());
        let mut entry = archive.by_name("uploads/a.txt").unwrap();
        let mut contents = String::new();
        io::Read::read_to_string(&mut entry, &mut contents).unwrap();
        assert_eq!("payload", contents);
    }

    #[test]
    fn backup_fails_when_a_source_file_vanished() {
        let dir = tempdir().unwrap();
        let run_dir = dir.path().join("run");
        let gone = dir.path().join("gone.txt");

        let err = create_backup(&[gone], &run_dir, dir.path()).unwrap_err();
        assert!(matches!(err, CleanError::Archive { .. }));
    }
}
