//! Verbatim asset copying.

use std::fs;
use std::path::Path;

use holadoc_site::Asset;

use crate::error::BuildError;

/// Copy an asset file or directory to `output_dir`, at its target path.
///
/// Directories are copied recursively. Returns the number of files copied.
pub fn copy_asset(asset: &Asset, output_dir: &Path) -> Result<usize, BuildError> {
    copy_path(&asset.source, &output_dir.join(&asset.target))
}

fn copy_path(source: &Path, target: &Path) -> Result<usize, BuildError> {
    let metadata = fs::metadata(source).map_err(BuildError::io(source))?;
    if !metadata.is_dir() {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(BuildError::io(parent))?;
        }
        fs::copy(source, target).map_err(BuildError::io(target))?;
        return Ok(1);
    }

    fs::create_dir_all(target).map_err(BuildError::io(target))?;
    let mut copied = 0;
    for entry in fs::read_dir(source).map_err(BuildError::io(source))? {
        let entry = entry.map_err(BuildError::io(source))?;
        copied += copy_path(&entry.path(), &target.join(entry.file_name()))?;
    }
    Ok(copied)
}
