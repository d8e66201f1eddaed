use std::path::PathBuf;
use thiserror::Error;

/// Failures that stop a batch before any file is touched.
#[derive(Debug, Error)]
pub enum RenamerError {
    #[error("target directory does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("target path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("failed to scan directory {}", .path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

impl RenamerError {
    /// True for problems with the path the user passed in, as opposed to
    /// failures while reading it.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            RenamerError::DirectoryNotFound(_) | RenamerError::NotADirectory(_)
        )
    }
}
