//! Input discovery for single-file and directory mode.

use std::path::{Path, PathBuf};

use globset::GlobSet;
use walkdir::WalkDir;

use crate::error::{CliError, Result, ResultExt};

/// List the files to scan.
///
/// In single-file mode the path itself is the only input. In directory mode every regular file
/// below `root` whose root-relative path matches `include` is returned, sorted by path.
pub fn discover(root: &Path, directory: bool, include: &GlobSet) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(CliError::PathNotFound(root.to_path_buf()));
    }
    if !directory {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut inputs = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry.with_root(root)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        if include.is_match(relative) {
            inputs.push(entry.into_path());
        }
    }

    tracing::debug!(root = %root.display(), count = inputs.len(), "discovered inputs");
    Ok(inputs)
}
