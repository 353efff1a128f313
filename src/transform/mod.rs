//! Per-record transform chain.
//!
//! User-supplied callables are applied to every record in a fixed order:
//!
//! 1. `each` — per-line mutator (may change record shape)
//! 2. `filter` — predicate; `false` drops the record entirely
//! 3. `format` — per-field formatters, composed in registration order
//! 4. `group` — grouping-key function deciding the result bucket
//!
//! Any callable failure aborts the run as [`crate::ParseError::Transform`].

pub mod chain;

pub use chain::{ChainOutcome, EachFn, FilterFn, FormatFn, GroupFn, TransformChain, TransformStage};
