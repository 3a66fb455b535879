use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::CleanError;
use crate::utils;

/// Lists every regular file under the given roots, depth first with
/// directory entries sorted by name, so repeated runs log in the same
/// order. A missing or unreadable root aborts the scan.
pub fn files_at_paths(roots: &[String]) -> Result<Vec<PathBuf>, CleanError> {
    let mut found = Vec::new();
    for root in roots {
        files_at_path(Path::new(root), &mut found)?;
    }
    Ok(found)
}

fn files_at_path(root: &Path, found: &mut Vec<PathBuf>) -> Result<(), CleanError> {
    debug!("scanning {}", root.display());

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(root).to_path_buf();
            CleanError::Scan {
                path,
                source: err.into(),
            }
        })?;

        let file_type = entry.file_type();
        // Symlinks count when they resolve to a regular file.
        if file_type.is_file() || (file_type.is_symlink() && entry.path().is_file()) {
            found.push(utils::absolutize(entry.path()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn lists_files_recursively_in_sorted_order() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("b.txt"), b"b").unwrap();
        fs::write(dir.path().join("a.txt"), b"a").unwrap();
        fs::write(dir.path().join("sub/c.txt"), b"c").unwrap();

        let files = files_at_paths(&[dir.path().to_string_lossy().into_owned()]).unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(vec!["a.txt", "b.txt", "c.txt"], names);
        assert!(files.iter().all(|path| path.is_absolute()));
    }

    #[test]
    fn directories_are_not_listed() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("empty/inner")).unwrap();

        let files = files_at_paths(&[dir.path().to_string_lossy().into_owned()]).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn missing_root_is_fatal() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");

        let err = files_at_paths(&[missing.to_string_lossy().into_owned()]).unwrap_err();
        assert!(matches!(err, CleanError::Scan { .. }));
    }
}
