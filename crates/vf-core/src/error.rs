//! Unified error type for variantforge.
//!
//! Every stage of a transform run maps its failure into one [`Error`]
//! variant, tagged with the transform name so the caller can tell which
//! variant broke the batch.

use std::fmt;

/// Unified error type covering all failure modes in variantforge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Required construction options are missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The source file could not be identified or its format is not allowed.
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// The conversion engine failed to produce the variant.
    #[error("Conversion error [{transform}]: {message}")]
    Conversion {
        /// Transform that was being produced.
        transform: String,
        /// Human-readable error description.
        message: String,
    },

    /// The freshly written variant could not be re-identified.
    #[error("Inspection error [{transform}]: {message}")]
    Inspection {
        /// Transform that was being produced.
        transform: String,
        /// Human-readable error description.
        message: String,
    },

    /// Reading the size of the variant file failed.
    #[error("Stat error [{transform}]: {source}")]
    Stat {
        /// Transform that was being produced.
        transform: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// MIME detection on the variant file failed.
    #[error("Sniff error [{transform}]: {message}")]
    Sniff {
        /// Transform that was being produced.
        transform: String,
        /// Human-readable error description.
        message: String,
    },

    /// The storage backend failed to save or remove a variant.
    #[error("Storage error [{transform}]: {message}")]
    Storage {
        /// Transform whose blob was being saved or removed.
        transform: String,
        /// Human-readable error description.
        message: String,
    },

    /// An external tool (gm, magick, identify) returned an error.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors (e.g. a panicked task).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Name of the transform this error belongs to, if it was raised by a
    /// transform unit or a removal.
    pub fn transform(&self) -> Option<&str> {
        match self {
            Error::Conversion { transform, .. }
            | Error::Inspection { transform, .. }
            | Error::Stat { transform, .. }
            | Error::Sniff { transform, .. }
            | Error::Storage { transform, .. } => Some(transform),
            _ => None,
        }
    }

    /// Convenience constructor for [`Error::Configuration`].
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    /// Convenience constructor for [`Error::UnsupportedFormat`].
    pub fn unsupported(message: impl Into<String>) -> Self {
        Error::UnsupportedFormat(message.into())
    }

    /// Convenience constructor for [`Error::Conversion`].
    pub fn conversion(transform: impl Into<String>, message: impl fmt::Display) -> Self {
        Error::Conversion {
            transform: transform.into(),
            message: message.to_string(),
        }
    }

    /// Convenience constructor for [`Error::Inspection`].
    pub fn inspection(transform: impl Into<String>, message: impl fmt::Display) -> Self {
        Error::Inspection {
            transform: transform.into(),
            message: message.to_string(),
        }
    }

    /// Convenience constructor for [`Error::Stat`].
    pub fn stat(transform: impl Into<String>, source: std::io::Error) -> Self {
        Error::Stat {
            transform: transform.into(),
            source,
        }
    }

    /// Convenience constructor for [`Error::Sniff`].
    pub fn sniff(transform: impl Into<String>, message: impl fmt::Display) -> Self {
        Error::Sniff {
            transform: transform.into(),
            message: message.to_string(),
        }
    }

    /// Convenience constructor for [`Error::Storage`].
    pub fn storage(transform: impl Into<String>, message: impl fmt::Display) -> Self {
        Error::Storage {
            transform: transform.into(),
            message: message.to_string(),
        }
    }

    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
