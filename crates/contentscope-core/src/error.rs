//! Unified error handling for contentscope
//!
//! One error type covers every failure the library crates can surface:
//! store queries, manifest and config loading, and filesystem access.

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for all contentscope operations
#[derive(Error, Debug)]
pub enum Error {
    // ==================== I/O Errors ====================

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File not found on disk
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    // ==================== Store Errors ====================

    /// The dependency oracle failed to answer a query
    #[error("Dependency query failed for '{node}': {message}")]
    StoreQuery {
        node: String,
        message: String,
    },

    /// Asset path unknown to the store
    #[error("Asset not found: {path}")]
    AssetNotFound {
        path: String,
    },

    /// Manifest could not be read or is malformed
    #[error("Invalid manifest: {message}")]
    InvalidManifest {
        message: String,
    },

    // ==================== Configuration Errors ====================

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        message: String,
    },

    // ==================== General Errors ====================

    /// Error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

/// Result type using the unified Error
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error with additional context
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Error::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create a store query error
    pub fn store_query(node: impl Into<String>, message: impl Into<String>) -> Self {
        Error::StoreQuery {
            node: node.into(),
            message: message.into(),
        }
    }

    /// Create an invalid manifest error
    pub fn invalid_manifest(message: impl Into<String>) -> Self {
        Error::InvalidManifest {
            message: message.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfig {
            message: message.into(),
        }
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::FileNotFound(_) | Error::AssetNotFound { .. } => true,
            Error::WithContext { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error came from the dependency oracle
    pub fn is_store_error(&self) -> bool {
        match self {
            Error::StoreQuery { .. } => true,
            Error::WithContext { source, .. } => source.is_store_error(),
            _ => false,
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
