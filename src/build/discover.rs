use super::BuildError;
use super::build_types::SourceFile;
use glob::{MatchOptions, Pattern};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Resolves `include` against `input_dir`.
///
/// Returned paths are relative to `input_dir` and sorted, so a fixed file system
/// snapshot always yields the same order. Directories are left out.
pub fn find_sources(input_dir: &Path, include: &str) -> Result<Vec<SourceFile>, BuildError> {
    fs::read_dir(input_dir).map_err(|source| BuildError::Enumeration {
        path: input_dir.to_path_buf(),
        message: source.to_string(),
    })?;

    let escaped_root = Pattern::escape(&input_dir.to_string_lossy());
    let pattern = format!("{}/{}", escaped_root.trim_end_matches('/'), include.trim_start_matches('/'));
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };

    let entries = glob::glob_with(&pattern, options).map_err(|e| BuildError::InvalidPattern {
        pattern: include.to_string(),
        message: e.msg.to_string(),
    })?;

    let mut sources = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_dir() => log::debug!("Ignoring directory {}", path.display()),
            Ok(path) => sources.push(SourceFile::new(relative_to(input_dir, &path))),
            Err(e) => log::warn!("Could not read {}: {}", e.path().display(), e.error()),
        }
    }

    sources.sort();
    Ok(sources)
}

fn relative_to(input_dir: &Path, path: &Path) -> PathBuf {
    let relative = path.strip_prefix(input_dir).unwrap_or(path);
    relative
        .components()
        .filter(|component| !matches!(component, Component::RootDir | Component::CurDir))
        .collect()
}
