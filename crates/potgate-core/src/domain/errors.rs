use super::ArchiveFormat;
use std::path::PathBuf;

/// Failure while unpacking an archive. Always recoverable for the resolver:
/// the archive is abandoned and the next source strategy is tried.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("'{path}' is not a recognized archive")]
    Unrecognized { path: PathBuf },
    #[error("unsupported {format} archive variant: {reason}")]
    Unsupported {
        format: ArchiveFormat,
        reason: String,
    },
    #[error("corrupt {format} archive '{path}': {detail}")]
    Corrupt {
        format: ArchiveFormat,
        path: PathBuf,
        detail: String,
    },
    #[error("extraction I/O failure at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A source strategy that produced nothing. Logged and skipped; never fatal
/// to the acquisition attempt.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("download failed for '{url}': {detail}")]
    Download { url: String, detail: String },
    #[error("download from '{url}' was empty")]
    EmptyDownload { url: String },
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error("no usable candidate: {0}")]
    NoCandidate(String),
    #[error("I/O failure at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The validator could not read the file at all. Kept distinct from content
/// invalidity (`ValidationResult::is_valid == false`) so callers can tell a
/// transient filesystem problem from a genuinely bad artifact.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("potential file not found: '{path}'")]
    NotFound { path: PathBuf },
    #[error("could not read potential file '{path}': {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
