//! Template file copying with placeholder substitution

use crate::error::{Result, StencilError};
use crate::substitution::Substitutions;
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

/// Copy one file, rewriting its content with `subs`
///
/// Non UTF-8 files are copied byte for byte. Parent directories of the
/// destination are created as needed.
pub async fn copy_file(source: &Path, destination: &Path, subs: &Substitutions) -> Result<()> {
    let fail = |e: std::io::Error| StencilError::file_copy(source, destination, e);

    let bytes = fs::read(source).await.map_err(fail)?;
    let output = match String::from_utf8(bytes) {
        Ok(text) => subs.apply(&text).into_bytes(),
        Err(raw) => raw.into_bytes(),
    };

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).await.map_err(fail)?;
    }
    fs::write(destination, output).await.map_err(fail)?;
    Ok(())
}

/// Copy a directory tree, rewriting every file with `subs`
///
/// Returns the written files.
pub async fn copy_dir(
    source: &Path,
    destination: &Path,
    subs: &Substitutions,
) -> Result<Vec<PathBuf>> {
    let fail = |e: std::io::Error| StencilError::file_copy(source, destination, e);

    if !source.is_dir() {
        return Err(fail(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "source directory does not exist",
        )));
    }

    fs::create_dir_all(destination).await.map_err(fail)?;

    let mut written = Vec::new();
    for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| fail(e.into()))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| fail(std::io::Error::other(e)))?;
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).await.map_err(fail)?;
        } else {
            copy_file(entry.path(), &target, subs).await?;
            written.push(target);
        }
    }
    Ok(written)
}

/// Names of the immediate subdirectories of `dir`, sorted
pub fn first_level_dirs(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}
