use serde::{Deserialize, Serialize};
use std::{
    io, path::{Path, PathBuf},
};
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOpError {
    pub code: ErrorCode,
    pub path: PathBuf,
    pub message: String,
}
impl FileOpError {
    pub fn new(code: ErrorCode, path: &Path, message: impl Into<String>) -> Self {
        Self {
            code,
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
    pub fn from_io(path: &Path, err: &io::Error) -> Self {
        Self::new(ErrorCode::from_io_kind(err.kind()), path, err.to_string())
    }
    pub fn path(&self) -> &Path {
        &self.path
    }
}
impl std::fmt::Display for FileOpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}: {}", self.code, self.path.display(), self.message)
    }
}
impl std::error::Error for FileOpError {}
/// Error codes for failed filesystem mutations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    FileNotFound,
    PermissionDenied,
    AlreadyExists,
    DirectoryNotEmpty,
    InvalidPath,
    Unsupported,
    Unknown,
}
impl ErrorCode {
    pub fn from_io_kind(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            io::ErrorKind::AlreadyExists => ErrorCode::AlreadyExists,
            io::ErrorKind::InvalidInput | io::ErrorKind::InvalidData => {
                ErrorCode::InvalidPath
            }
            io::ErrorKind::Unsupported => ErrorCode::Unsupported,
            io::ErrorKind::DirectoryNotEmpty => ErrorCode::DirectoryNotEmpty,
            _ => ErrorCode::Unknown,
        }
    }
}
/// A batch refused before any mutation was attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    Empty,
    DuplicateSource(PathBuf),
    DuplicateDestination(PathBuf),
    DestinationExists(PathBuf),
}
impl std::fmt::Display for BatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchError::Empty => write!(f, "batch contains no operations"),
            BatchError::DuplicateSource(path) => {
                write!(f, "source appears more than once in batch: {}", path.display())
            }
            BatchError::DuplicateDestination(path) => {
                write!(
                    f, "destination appears more than once in batch: {}", path.display()
                )
            }
            BatchError::DestinationExists(path) => {
                write!(f, "destination already exists: {}", path.display())
            }
        }
    }
}
impl std::error::Error for BatchError {}
