//! Unified error type for the readshare library.
//!
//! Library code returns `ReadshareError`; the CLI wraps it in `anyhow::Result`
//! and adds context at the call site.
//!
//! # Error Categories
//!
//! - **Io**: File system operations (open, read, write, map)
//! - **Format**: Malformed bit-vector files or unparsable read records
//! - **UnknownFormat**: Read file that is neither FASTA nor FASTQ (plain or gzip)
//! - **Validation**: Invalid parameters (k-mer size, thresholds, set descriptors)
//! - **SizeMismatch**: Boolean algebra between bit vectors of different lengths
//! - **Allocation**: Bloom index or bit-vector buffer could not be allocated
//! - **Stalled**: An index pass consumed no reads from its source

use std::fmt;
use std::path::PathBuf;

/// Unified error type for the readshare library.
#[derive(Debug)]
pub enum ReadshareError {
    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: std::io::Error,
    },

    /// Invalid file content.
    Format { path: PathBuf, detail: String },

    /// First byte of a read file is neither `>` nor `@`, plain or gzipped.
    UnknownFormat { path: PathBuf },

    /// Validation error (invalid parameters, data invariants).
    Validation(String),

    /// Two bit vectors combined with different bit lengths.
    SizeMismatch { left: u64, right: u64 },

    /// A buffer of the given size could not be allocated.
    Allocation { bytes: usize },

    /// An index pass did not advance through its read source.
    Stalled { consumed: u64, total: u64 },
}

impl fmt::Display for ReadshareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadshareError::Io {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "I/O error during {} on '{}': {}",
                    operation,
                    path.display(),
                    source
                )
            }
            ReadshareError::Format { path, detail } => {
                write!(f, "Invalid format in '{}': {}", path.display(), detail)
            }
            ReadshareError::UnknownFormat { path } => {
                write!(
                    f,
                    "Unknown read format in '{}': expected FASTA or FASTQ, optionally gzipped",
                    path.display()
                )
            }
            ReadshareError::Validation(msg) => write!(f, "Validation error: {}", msg),
            ReadshareError::SizeMismatch { left, right } => {
                write!(
                    f,
                    "Bit vectors are not the same size: {} vs {} bits",
                    left, right
                )
            }
            ReadshareError::Allocation { bytes } => {
                write!(
                    f,
                    "Cannot allocate {} bytes for the index, try a lower k value or more RAM",
                    bytes
                )
            }
            ReadshareError::Stalled { consumed, total } => {
                write!(
                    f,
                    "Index pass made no progress: {} of {} reads consumed",
                    consumed, total
                )
            }
        }
    }
}

impl std::error::Error for ReadshareError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReadshareError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ReadshareError {
    fn from(err: std::io::Error) -> Self {
        ReadshareError::Io {
            path: PathBuf::new(),
            operation: "unknown",
            source: err,
        }
    }
}

/// Convenience type alias for Results using ReadshareError.
pub type Result<T> = std::result::Result<T, ReadshareError>;

// ============================================================================
// Helper constructors
// ============================================================================

impl ReadshareError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, operation: &'static str, source: std::io::Error) -> Self {
        ReadshareError::Io {
            path: path.into(),
            operation,
            source,
        }
    }

    /// Create a format error.
    pub fn format(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        ReadshareError::Format {
            path: path.into(),
            detail: detail.into(),
        }
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        ReadshareError::Validation(msg.into())
    }
}
