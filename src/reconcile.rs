use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Given every file found on disk and every file the records still link,
/// returns the obsolete ones in scan order. Paths under the reserved
/// output directory are never candidates, so a clean cannot eat its own
/// logs or backups.
///
/// No normalization happens here beyond the absolute-path resolution the
/// scanner and collector already did; paths differing only in case or in
/// a trailing component separator are distinct.
pub fn filter_linked_files(
    scanned: Vec<PathBuf>,
    referenced: &HashSet<PathBuf>,
    reserved_dir: &Path,
) -> Vec<PathBuf> {
    scanned
        .into_iter()
        .filter(|path| !path.starts_with(reserved_dir))
        .filter(|path| !referenced.contains(path))
        .collect()
}
