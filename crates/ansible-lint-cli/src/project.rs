//! Discovery of the YAML files handed to the sensor.

use std::fs;
use std::path::{Path, PathBuf};

use ansible_host::{FileSystem, InputFile};
use tracing::debug;

use crate::errors::CliError;

/// Language tag given to discovered files.
pub(crate) const YAML_LANGUAGE: &str = "yaml";

const PROJECT_TARGET: &str = "ansible_lint_cli::project";

const YAML_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// Builds the file system of every YAML file below `base_dir`.
///
/// Hidden entries are skipped. Files are added in path order with keys
/// relative to `base_dir`.
pub(crate) fn collect(base_dir: &Path) -> Result<FileSystem, CliError> {
    if !base_dir.is_dir() {
        return Err(CliError::NotADirectory {
            path: base_dir.to_path_buf(),
        });
    }

    let mut paths = Vec::new();
    walk(base_dir, &mut paths)?;
    paths.sort();

    let mut file_system = FileSystem::new(base_dir);
    for path in paths {
        let lines = count_lines(&path)?;
        let key = path
            .strip_prefix(base_dir)
            .unwrap_or(&path)
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        debug!(target: PROJECT_TARGET, %key, lines, "input file found");
        file_system.add(
            InputFile::new(&path, YAML_LANGUAGE)?
                .with_key(key)
                .with_lines(lines),
        );
    }
    Ok(file_system)
}

fn walk(dir: &Path, paths: &mut Vec<PathBuf>) -> Result<(), CliError> {
    let entries = fs::read_dir(dir).map_err(|source| CliError::walk(dir, source))?;
    for entry in entries {
        let entry = entry.map_err(|source| CliError::walk(dir, source))?;
        let path = entry.path();
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let file_type = entry
            .file_type()
            .map_err(|source| CliError::walk(&path, source))?;
        if file_type.is_dir() {
            walk(&path, paths)?;
        } else if is_yaml(&path) {
            paths.push(path);
        }
    }
    Ok(())
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            YAML_EXTENSIONS
                .iter()
                .any(|yaml| extension.eq_ignore_ascii_case(yaml))
        })
}

fn count_lines(path: &Path) -> Result<u32, CliError> {
    let bytes = fs::read(path).map_err(|source| CliError::walk(path, source))?;
    let newlines = bytes.iter().filter(|byte| **byte == b'\n').count();
    let unterminated = usize::from(bytes.last().is_some_and(|byte| *byte != b'\n'));
    Ok(u32::try_from(newlines + unterminated).unwrap_or(u32::MAX))
}
