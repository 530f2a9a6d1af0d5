//! Map file validation utilities.

use std::path::{Path, PathBuf};

use thiserror::Error;

use maze_core::grid::GridGraph;
use maze_core::layout::MapLayout;

/// Error type for validation runs.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// The target directory could not be read.
    #[error("Failed to read map directory {path}: {source}")]
    DirectoryUnreadable {
        /// Directory that failed to open.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// One or more map files failed validation.
    #[error("{failed} of {total} map files failed validation")]
    FilesInvalid {
        /// Number of failing files.
        failed: usize,
        /// Number of files checked.
        total: usize,
    },
}

/// Outcome of checking a single map file.
#[derive(Debug)]
pub struct FileReport {
    /// Path of the checked file.
    pub path: PathBuf,
    /// `None` when the file is valid, otherwise the failure text.
    pub problem: Option<String>,
    /// Active cell count for valid files.
    pub active_cells: usize,
}

/// Validate a single map file.
#[must_use]
pub fn validate_map_file(path: &Path) -> FileReport {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            return FileReport {
                path: path.to_path_buf(),
                problem: Some(format!("unreadable: {e}")),
                active_cells: 0,
            }
        }
    };

    match MapLayout::parse(&text) {
        Ok(layout) => {
            let graph = GridGraph::build(&layout);
            let problem = if graph.active_count() == 0 {
                Some("no active cells".to_string())
            } else {
                None
            };
            FileReport {
                path: path.to_path_buf(),
                problem,
                active_cells: graph.active_count(),
            }
        }
        Err(e) => FileReport {
            path: path.to_path_buf(),
            problem: Some(e.to_string()),
            active_cells: 0,
        },
    }
}

/// Validate every `.map` file in a directory.
///
/// # Errors
///
/// [`ValidateError::DirectoryUnreadable`] when the directory cannot be
/// listed, [`ValidateError::FilesInvalid`] when any file fails. Each
/// file's result is logged either way.
pub fn validate_map_directory(path: &Path) -> Result<Vec<FileReport>, ValidateError> {
    let entries = std::fs::read_dir(path).map_err(|source| ValidateError::DirectoryUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "map"))
        .collect();
    files.sort();

    let mut reports = Vec::with_capacity(files.len());
    let mut failed = 0usize;
    for file in files {
        let report = validate_map_file(&file);
        match &report.problem {
            None => tracing::info!(
                path = %report.path.display(),
                active_cells = report.active_cells,
                "map ok"
            ),
            Some(problem) => {
                failed += 1;
                tracing::error!(path = %report.path.display(), %problem, "map invalid");
            }
        }
        reports.push(report);
    }

    if failed > 0 {
        return Err(ValidateError::FilesInvalid {
            failed,
            total: reports.len(),
        });
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_map(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(text.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_valid_directory_passes() {
        let dir = tempfile::tempdir().unwrap();
        write_map(dir.path(), "a.map", "3,2,1\n1,1,0\n1,0,1");
        write_map(dir.path(), "b.map", "1,1,1\n1");
        // Non-map files are ignored.
        write_map(dir.path(), "notes.txt", "not a map");

        let reports = validate_map_directory(dir.path()).unwrap();
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| r.problem.is_none()));
    }

    #[test]
    fn test_invalid_file_fails_the_run() {
        let dir = tempfile::tempdir().unwrap();
        write_map(dir.path(), "good.map", "1,1,1\n1");
        write_map(dir.path(), "bad.map", "3,2\n1,1,0");

        let result = validate_map_directory(dir.path());
        assert!(matches!(
            result,
            Err(ValidateError::FilesInvalid {
                failed: 1,
                total: 2,
            })
        ));
    }

    #[test]
    fn test_empty_grid_is_flagged() {
        let dir = tempfile::tempdir().unwrap();
        write_map(dir.path(), "empty.map", "2,1,1\n0,0");
        let result = validate_map_directory(dir.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let result = validate_map_directory(Path::new("definitely/not/here"));
        assert!(matches!(
            result,
            Err(ValidateError::DirectoryUnreadable { .. })
        ));
    }
}
