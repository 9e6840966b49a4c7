use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Extensions recognized as reviewable source files.
pub const SOURCE_EXTENSIONS: &[&str] = &["py"];

/// Recursively collect source files under `root`, in directory-walk order.
///
/// A nonexistent root yields an empty list rather than an error so that a
/// repository without the expected layout never aborts a CI run.
pub fn find_source_files(root: impl AsRef<Path>) -> Vec<PathBuf> {
    let root = root.as_ref();
    if !root.exists() {
        debug!("source root {} does not exist", root.display());
        return Vec::new();
    }

    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map_or(false, |ext| SOURCE_EXTENSIONS.contains(&ext))
        })
        .map(|entry| entry.into_path())
        .collect()
}

/// Files to review for a pull request.
///
/// VCS change-set filtering is not wired up; this reviews the full tree,
/// which is what the CI workflow has always run against.
pub fn find_changed_files(root: impl AsRef<Path>) -> Vec<PathBuf> {
    find_source_files(root)
}
