use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading and parsing a keyframe animation file.
///
/// Every variant is fatal to the whole import: no partial document is ever
/// handed to later stages. Line numbers are 0-based indices into the source
/// file, counting every physical line (comment-only and blank lines included).
#[derive(Debug, Error)]
pub enum ImportError {
    /// The animation file could not be opened.
    #[error("failed to open animation file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The underlying reader failed mid-stream.
    #[error("I/O error while reading animation data: {0}")]
    Io(#[from] io::Error),

    /// A line held a malformed token.
    #[error("malformed value at line {line}: {detail}")]
    Parse { line: usize, detail: String },

    /// The stream ended before the declared header counts were satisfied.
    #[error("animation file ended while reading {context}")]
    Truncated { context: &'static str },

    /// The node table describes an impossible tree (cycle, out-of-range or
    /// unreachable entries).
    #[error("malformed node hierarchy: {detail}")]
    Hierarchy { detail: String },
}
