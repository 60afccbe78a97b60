//! # Error Types
//!
//! Errors for the configuration layer. The resolution core itself never
//! fails: parsing is total, matching reports "no match" as a zero score
//! and resolution returns `None` when nothing applies. Errors only arise
//! around stylesheet files: loading, parsing and watching them.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or watching stylesheets.
#[derive(Error, Debug)]
pub enum StylistError {
    /// The stylesheet file does not exist.
    #[error("stylesheet not found: {path:?}")]
    StylesheetNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The stylesheet file could not be parsed.
    #[error("failed to parse stylesheet {path:?}: {details}")]
    StylesheetParse {
        /// The path of the file that failed to parse.
        path: PathBuf,
        /// Details about the parse error.
        details: String,
    },

    /// The stylesheet file has an extension the loader does not understand.
    #[error("unsupported stylesheet format: {path:?} (expected .toml or .json)")]
    UnsupportedFormat {
        /// The offending path.
        path: PathBuf,
    },

    /// Setting up or running the stylesheet file watcher failed.
    #[error("failed to watch stylesheet {path:?}: {source}")]
    Watch {
        /// The watched path.
        path: PathBuf,
        /// The underlying watcher error.
        #[source]
        source: notify::Error,
    },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
