//! Error types for vfctl.
//!
//! All errors use `thiserror` for ergonomic error handling and proper error chains.

use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for vfctl operations.
pub type Result<T> = std::result::Result<T, VfError>;

/// Main error type for vfctl.
#[derive(Error, Debug)]
pub enum VfError {
    // Device errors
    #[error("Network device not found: {device} (no control directory at {path:?})")]
    DeviceNotFound { device: String, path: PathBuf },

    #[error("SR-IOV unsupported on {device}: driver reports zero virtual functions")]
    SriovUnsupported { device: String },

    // Control file errors
    #[error("Failed to read {path:?}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid integer {value:?} in {path:?}: {source}")]
    InvalidValue {
        path: PathBuf,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Failed to write {path:?}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to list {path:?}: {source}")]
    ListFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Configuration errors
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VfError {
    /// A control file could not be read or did not hold an integer.
    pub fn is_read_error(&self) -> bool {
        matches!(self, Self::ReadFailed { .. } | Self::InvalidValue { .. })
    }

    /// A control file write was refused, either by the filesystem or by the driver.
    pub fn is_write_error(&self) -> bool {
        matches!(self, Self::WriteFailed { .. })
    }

    pub fn is_list_error(&self) -> bool {
        matches!(self, Self::ListFailed { .. })
    }

    /// Path of the control file or directory involved, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::DeviceNotFound { path, .. }
            | Self::ReadFailed { path, .. }
            | Self::InvalidValue { path, .. }
            | Self::WriteFailed { path, .. }
            | Self::ListFailed { path, .. } => Some(path),
            _ => None,
        }
    }
}
