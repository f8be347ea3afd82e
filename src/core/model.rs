//! Result model and error taxonomy
//!
//! Every search produces an ordered list of [`Hit`]s before any rendering happens.

use serde::Serialize;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for search operations
pub type FindResult<T> = Result<T, FindError>;

/// Fatal errors. Anything recoverable (undecodable files, unreadable entries)
/// is logged and skipped instead.
#[derive(Debug, Error)]
pub enum FindError {
    #[error("invalid usage: {0}")]
    Usage(String),

    #[error("input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("symlink target not found: {}", .0.display())]
    TargetNotFound(PathBuf),

    #[error("symlink cycle detected while resolving {}", .0.display())]
    SymlinkCycle(PathBuf),

    #[error("input is neither a regular file nor a directory: {}", .0.display())]
    UnsupportedInput(PathBuf),

    #[error("cannot read ignore rules from {}: {source}", path.display())]
    IgnoreRules {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FindError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        FindError::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            FindError::Usage(_) => 2,
            _ => 1,
        }
    }
}

/// Half-open byte range `[start, end)` into a string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

impl MatchSpan {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Shift the span right by `offset` bytes
    pub fn offset(self, offset: usize) -> Self {
        Self::new(self.start + offset, self.end + offset)
    }
}

/// What kind of entry a name hit refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HitKind {
    File,
    Dir,
}

/// One matching line inside a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineHit {
    /// 1-indexed line number
    pub number: usize,
    pub text: String,
    /// Occurrences of the literal word form, left to right
    pub spans: Vec<MatchSpan>,
}

/// A single search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Hit {
    /// A file or directory whose name matched
    Name {
        entry: HitKind,
        path: String,
        /// Position of the match inside `path`
        span: MatchSpan,
    },
    /// A file with at least one matching line
    Content { path: String, lines: Vec<LineHit> },
}

impl Hit {
    pub fn path(&self) -> &str {
        match self {
            Hit::Name { path, .. } | Hit::Content { path, .. } => path,
        }
    }
}
