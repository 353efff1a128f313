use thiserror::Error;

use crate::transform::TransformStage;

/// Convenience result type for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Error type user-supplied transforms (each/filter/format/group) may return.
///
/// Transform failures are wrapped in [`ParseError::Transform`] with the failing
/// stage and 1-based line number, and abort the parse run.
pub type TransformError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type returned by [`crate::pipeline::Pipeline::parse`].
#[derive(Debug, Error)]
pub enum ParseError {
    /// Underlying I/O error (e.g. file not found, permission denied, read failure).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A source or target encoding label was not recognized.
    ///
    /// Labels are resolved up front, before any line is read. Invalid byte
    /// sequences *within* a recognized encoding are not an error: they are
    /// replaced during conversion (see [`crate::parsing::EncodingConverter`]).
    #[error("unknown encoding label '{label}'")]
    UnknownEncoding { label: String },

    /// A user-supplied transform failed.
    ///
    /// The original error is preserved as `source` and propagated unmodified;
    /// the run aborts with no partial result.
    #[error("{stage} failed at line {line}: {source}")]
    Transform {
        stage: TransformStage,
        line: usize,
        source: TransformError,
    },
}
