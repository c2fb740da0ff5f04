//! Error types for extraction operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving, decoding or serializing a file.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Input path does not reference an existing file
    #[error("File '{}' does not exist.", path.display())]
    FileNotFound {
        /// The missing path
        path: PathBuf,
    },

    /// No suffix rule matches, or a container lacks the expected content
    #[error("{message}")]
    UnsupportedFormat {
        /// Description of what was not supported
        message: String,
    },

    /// Decoded array has a rank or width the pipeline cannot interpret
    #[error("{message}")]
    Dimension {
        /// Description of the offending shape
        message: String,
    },

    /// Payload could not be encoded into the output envelope
    #[error("{message}")]
    Serialization {
        /// Description of the offending type
        message: String,
    },

    /// Bytes of a recognized format are malformed or truncated
    #[error("Malformed {format} file: {message}")]
    Decode {
        /// Human-readable format name
        format: &'static str,
        /// What went wrong
        message: String,
    },

    /// Settings file is unreadable or invalid
    #[error("Invalid configuration: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// XML parsing error inside a GIFTI container
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Closed set of error kinds reported in the `exception` field of an
/// error envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FileNotFound,
    UnsupportedFormat,
    Dimension,
    Serialization,
    Decode,
    Config,
    Io,
}

impl ErrorKind {
    /// Name written to the envelope.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::FileNotFound => "FileNotFound",
            ErrorKind::UnsupportedFormat => "UnsupportedFormat",
            ErrorKind::Dimension => "DimensionError",
            ErrorKind::Serialization => "SerializationError",
            ErrorKind::Decode => "DecodeError",
            ErrorKind::Config => "ConfigError",
            ErrorKind::Io => "IOError",
        }
    }
}

impl ExtractError {
    /// Create a file-not-found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create an unsupported format error with a message.
    pub fn unsupported_format(message: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            message: message.into(),
        }
    }

    /// Create a dimension error with a message.
    pub fn dimension(message: impl Into<String>) -> Self {
        Self::Dimension {
            message: message.into(),
        }
    }

    /// Create a serialization error with a message.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a decode error for the named format.
    pub fn decode(format: &'static str, message: impl Into<String>) -> Self {
        Self::Decode {
            format,
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// The envelope-level kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractError::FileNotFound { .. } => ErrorKind::FileNotFound,
            ExtractError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            ExtractError::Dimension { .. } => ErrorKind::Dimension,
            ExtractError::Serialization { .. } => ErrorKind::Serialization,
            ExtractError::Decode { .. } | ExtractError::Xml(_) => ErrorKind::Decode,
            ExtractError::Config { .. } => ErrorKind::Config,
            ExtractError::Io(_) => ErrorKind::Io,
        }
    }
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, ExtractError>;
