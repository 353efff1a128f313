//! `line-record-parser` is a small library for streaming, line-oriented parsing of
//! delimited (CSV/TSV/DSV) and free-text files into in-memory records, with a
//! user-configurable per-line transform chain.
//!
//! The primary entrypoint is [`Pipeline`]: pick a source
//! ([`Pipeline::from_path`] for a file, [`Pipeline::from_text`] for in-memory
//! content), configure it fluently, then call [`Pipeline::parse`].
//!
//! ## What a run does, per line
//!
//! 1. read the next physical line (1-based counter; `\n` / `\r\n` stripped)
//! 2. convert it from the source to the target encoding (lossy-permissive)
//! 3. split it into fields when a delimiter is configured
//!    (quote/escape-aware, see [`parsing::FieldSplitter`])
//! 4. build a [`types::Record`]: whole line, ordered row, or keyed record when
//!    field names are configured
//! 5. run the transform chain in fixed order: `each` → `filter` →
//!    per-field `format` → `group`
//! 6. append survivors to the result: a flat sequence, or per-group sequences
//!    when a grouping function is configured
//!
//! ## Quick example
//!
//! ```rust
//! use line_record_parser::{Pipeline, Value};
//!
//! # fn main() -> Result<(), line_record_parser::ParseError> {
//! let result = Pipeline::from_text("ada, 98 \ngrace, 99 \n")
//!     .delimiter(",")
//!     .field_names(["name", "score"])
//!     .format("score", |v| {
//!         let n: i64 = v.as_str().unwrap_or("").trim().parse()?;
//!         Ok(Value::Int64(n))
//!     })
//!     .filter(|rec, _line| {
//!         Ok(rec.field(&"name".into()).and_then(Value::as_str) != Some("ada"))
//!     })
//!     .parse()?;
//!
//! let records = result.into_records().unwrap();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].field(&"score".into()), Some(&Value::Int64(99)));
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure model
//!
//! - a missing/unreadable file fails the run with [`ParseError::Io`]
//! - an unrecognized encoding label fails up front with
//!   [`ParseError::UnknownEncoding`]; invalid byte *sequences* in a recognized
//!   encoding are replaced, not raised
//! - a failing user transform aborts the run with [`ParseError::Transform`]
//!   (stage + 1-based line + original error); there is no partial result, and
//!   the source handle is released on every exit path
//!
//! ## Modules
//!
//! - [`pipeline`]: builder, parse driver, source reader, observer hooks
//! - [`parsing`]: encoding conversion and field splitting
//! - [`transform`]: the each/filter/format/group chain
//! - [`types`]: record and result-collection types
//! - [`error`]: error types

pub mod error;
pub mod parsing;
pub mod pipeline;
pub mod transform;
pub mod types;

pub use error::{ParseError, ParseResult, TransformError};
pub use pipeline::Pipeline;
pub use types::{FieldKey, Groups, KeyedRecord, Parsed, Record, Value};
