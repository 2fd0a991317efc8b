//! Error types for stream reading, decomposition and output.

use std::path::PathBuf;

use jointspace_types::DynamicsError;
use thiserror::Error;

/// Errors raised by the analysis pipeline.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// An input or output file could not be opened.
    #[error("cannot open {path}: {source}")]
    Open {
        /// File that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Reading an already open stream failed.
    #[error("read failed on {stream} after line {line}: {source}")]
    Read {
        /// Stream name.
        stream: String,
        /// Last line read successfully.
        line: usize,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Writing an output table failed.
    #[error("write failed on {target}: {source}")]
    Write {
        /// Output table name.
        target: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A token in a data row is not a finite number.
    #[error("{stream} line {line}: cannot parse '{token}' as a number")]
    Malformed {
        /// Stream name.
        stream: String,
        /// 1-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },

    /// A data row has the wrong number of columns.
    #[error("{stream} line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        /// Stream name.
        stream: String,
        /// 1-based line number.
        line: usize,
        /// Expected column count.
        expected: usize,
        /// Columns present.
        found: usize,
    },

    /// Streams disagree on the time stamp of a row.
    #[error("frame {frame}: {stream} is at t = {time}, states stream is at t = {expected}")]
    Misaligned {
        /// 0-based frame index.
        frame: usize,
        /// Stream whose time differs.
        stream: String,
        /// Time read from that stream.
        time: f64,
        /// Reference time from the states stream.
        expected: f64,
    },

    /// Streams ended after different numbers of rows.
    #[error("{ended} ended after {rows} rows while {longer} has more data")]
    LengthMismatch {
        /// First stream found exhausted.
        ended: String,
        /// Number of complete frames read.
        rows: usize,
        /// A stream that still had data.
        longer: String,
    },

    /// A configured body label is not present in the model.
    #[error("model has no body named '{name}' ({role})")]
    MissingBody {
        /// Logical role of the body (e.g. "right contact").
        role: &'static str,
        /// Configured body name.
        name: String,
    },

    /// Two contact points share an output name.
    #[error("duplicate point name: {0}")]
    DuplicatePointName(String),

    /// A point output name cannot be used as a file name.
    #[error("invalid point name '{0}'")]
    InvalidPointName(String),

    /// The multibody system rejected an operation.
    #[error(transparent)]
    Dynamics(#[from] DynamicsError),
}

impl AnalysisError {
    /// Create an open error for `path`.
    pub fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    /// Create a write error for `target`.
    pub fn write(target: impl Into<String>, source: std::io::Error) -> Self {
        Self::Write {
            target: target.into(),
            source,
        }
    }
}
