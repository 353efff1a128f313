//! Leaf parsing components.
//!
//! - [`encoding`]: character-encoding conversion applied to each raw line
//! - [`splitter`]: quote/escape-aware field splitting
//!
//! Both are driven per line by [`crate::pipeline::Pipeline::parse`]; conversion
//! runs *before* splitting, so delimiter/quote/escape characters are matched in
//! the already-converted text.

pub mod encoding;
pub mod splitter;

pub use encoding::EncodingConverter;
pub use splitter::FieldSplitter;
