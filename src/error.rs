use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error while generating or splicing dispatch code
#[derive(Debug, Error)]
pub enum GenError {
    /// An artifact lacks one of the marker lines delimiting a generated region
    #[error("sentinel `{sentinel}` not found in {}", .artifact.display())]
    SentinelNotFound { sentinel: String, artifact: PathBuf },

    /// Two entries in one list would declare the same dispatch field
    #[error("duplicate field `{alias}` in {list} list")]
    DuplicateAlias { alias: String, list: &'static str },

    #[error("extension `{name}` is listed more than once")]
    DuplicateExtension { name: String },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid tables: {0}")]
    Tables(#[from] serde_json::Error),
}

impl GenError {
    /// Render the error as a terminal line (no color)
    pub fn render(&self) -> String {
        format!("error: {}\n", self)
    }

    /// Render the error with ANSI color codes
    pub fn render_color(&self) -> String {
        format!("\x1b[1;31merror\x1b[0m: \x1b[1m{}\x1b[0m\n", self)
    }
}
