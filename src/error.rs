//! Error types for type tree operations
//!
//! Building the tree, evaluating checkbox state and toggling nodes never fail.
//! Errors only come from the two boundaries of the crate: reading model
//! metadata, and calling out to the external viewer.
//!
//! # Error Codes
//!
//! Error codes follow the pattern: `E<category><number>`
//!
//! Categories:
//! - **E1xxx**: I/O errors
//! - **E2xxx**: Metadata decoding errors
//! - **E3xxx**: Viewer errors
//!
//! ## Common Error Codes
//!
//! - `E1001`: I/O error reading a metadata file
//! - `E2001`: JSON decoding error
//! - `E2002`: Invalid metadata document
//! - `E3001`: A viewer call failed
//! - `E3002`: The viewer was already destroyed

use std::io;
use thiserror::Error;

/// Result type for type tree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when loading metadata or driving a viewer
#[derive(Error, Debug)]
pub enum Error {
    /// IO error occurred while reading a metadata file
    ///
    /// **Error Code**: E1001
    ///
    /// **Common Causes**:
    /// - File not found
    /// - Insufficient permissions
    #[error("[E1001] I/O error: {0}")]
    Io(#[from] io::Error),

    /// The metadata document is not valid JSON or does not match the
    /// metamodel schema
    ///
    /// **Error Code**: E2001
    #[error("[E2001] JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The metadata document is structurally wrong
    ///
    /// **Error Code**: E2002
    ///
    /// **Common Causes**:
    /// - `metaObjects` is missing or not an array
    ///
    /// **Suggestions**:
    /// - Export the metadata with a metamodel-compatible converter
    #[error("[E2002] Invalid metadata: {0}")]
    InvalidMetadata(String),

    /// A call into the external viewer failed
    ///
    /// **Error Code**: E3001
    ///
    /// The checkbox state has already been committed when this is returned.
    /// Rolling it back is up to the caller.
    #[error("[E3001] Viewer error: {0}")]
    Viewer(String),

    /// The session's viewer was destroyed and can no longer be driven
    ///
    /// **Error Code**: E3002
    #[error("[E3002] Viewer already destroyed")]
    ViewerDestroyed,
}

impl Error {
    /// Create a viewer error from any displayable message
    pub fn viewer(message: impl Into<String>) -> Self {
        Error::Viewer(message.into())
    }

    /// Create an invalid metadata error
    pub fn invalid_metadata(message: impl Into<String>) -> Self {
        Error::InvalidMetadata(message.into())
    }

    /// Get the error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Error::Io(_) => "E1001",
            Error::Json(_) => "E2001",
            Error::InvalidMetadata(_) => "E2002",
            Error::Viewer(_) => "E3001",
            Error::ViewerDestroyed => "E3002",
        }
    }
}
