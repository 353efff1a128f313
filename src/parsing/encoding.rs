//! Character-encoding conversion for raw input lines.

use encoding_rs::{Encoding, UTF_8};

use crate::error::{ParseError, ParseResult};

/// Converts raw line bytes from a declared source encoding into Rust strings,
/// honoring a declared target encoding.
///
/// Labels are resolved with [`Encoding::for_label`] (WHATWG names: `"UTF-8"`,
/// `"ISO-8859-1"`, `"windows-1252"`, `"Shift_JIS"`, ...); an unrecognized label
/// is reported as [`ParseError::UnknownEncoding`] before any line is read.
///
/// Conversion is lossy-permissive: byte sequences invalid in the source encoding
/// are replaced with U+FFFD instead of failing the line. When the target
/// encoding is not UTF-8, the decoded text is additionally funneled through a
/// lossy encode to the target and back, so characters the target cannot
/// represent degrade exactly as a real transcode would (in-memory values are
/// always Rust strings, i.e. UTF-8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingConverter {
    source: &'static Encoding,
    target: &'static Encoding,
}

impl EncodingConverter {
    /// Resolve both encoding labels.
    pub fn new(source_label: &str, target_label: &str) -> ParseResult<Self> {
        Ok(Self {
            source: resolve(source_label)?,
            target: resolve(target_label)?,
        })
    }

    /// Convert one raw line.
    ///
    /// BOM bytes are not given special treatment; they decode like any other
    /// byte sequence of the source encoding.
    pub fn convert(&self, raw: &[u8]) -> String {
        let (text, _) = self.source.decode_without_bom_handling(raw);
        if self.target == UTF_8 {
            return text.into_owned();
        }
        let (encoded, _, _) = self.target.encode(&text);
        let (back, _) = self.target.decode_without_bom_handling(&encoded);
        back.into_owned()
    }
}

impl Default for EncodingConverter {
    /// UTF-8 to UTF-8 (the default for both labels).
    fn default() -> Self {
        Self {
            source: UTF_8,
            target: UTF_8,
        }
    }
}

fn resolve(label: &str) -> ParseResult<&'static Encoding> {
    Encoding::for_label(label.as_bytes()).ok_or_else(|| ParseError::UnknownEncoding {
        label: label.to_owned(),
    })
}
