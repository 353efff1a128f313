//! Line acquisition from a file path or in-memory text.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::PathBuf;

use crate::error::ParseResult;

/// Where a parse run reads its lines from.
///
/// The two variants split lines identically: an in-memory text behaves exactly
/// like a file with the same bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A named file, opened for a single sequential read pass at parse time.
    Path(PathBuf),
    /// Literal text content.
    Text(String),
}

impl Source {
    /// Open the source for reading.
    ///
    /// File open failures surface as [`crate::ParseError::Io`]. The returned
    /// reader is owned by the parse run and dropped (releasing the file
    /// handle) on every exit path, including transform failures.
    pub(crate) fn open(&self) -> ParseResult<Box<dyn BufRead + '_>> {
        match self {
            Source::Path(path) => Ok(Box::new(BufReader::new(File::open(path)?))),
            Source::Text(text) => Ok(Box::new(Cursor::new(text.as_bytes()))),
        }
    }
}

/// Reads physical lines as raw bytes, maintaining the 1-based line counter.
///
/// Lines are delimited by `\n`; a final line without a terminator is still a
/// line. The terminator (`\n` or `\r\n`) is stripped before the line is handed
/// to encoding conversion and splitting.
pub(crate) struct LineReader<'a> {
    inner: Box<dyn BufRead + 'a>,
    buf: Vec<u8>,
    line_no: usize,
}

impl<'a> LineReader<'a> {
    pub(crate) fn new(inner: Box<dyn BufRead + 'a>) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            line_no: 0,
        }
    }

    /// Next physical line, or `None` at end of source.
    pub(crate) fn next_line(&mut self) -> io::Result<Option<(usize, &[u8])>> {
        self.buf.clear();
        let n = self.inner.read_until(b'\n', &mut self.buf)?;
        if n == 0 {
            return Ok(None);
        }
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        self.line_no += 1;
        Ok(Some((self.line_no, &self.buf)))
    }

    /// Number of lines read so far.
    pub(crate) fn lines_read(&self) -> usize {
        self.line_no
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(text: &str) -> Vec<(usize, Vec<u8>)> {
        let source = Source::Text(text.to_string());
        let mut reader = LineReader::new(source.open().unwrap());
        let mut out = Vec::new();
        while let Some((no, raw)) = reader.next_line().unwrap() {
            out.push((no, raw.to_vec()));
        }
        out
    }

    #[test]
    fn numbers_lines_from_one() {
        let lines = read_all("a\nb\nc\n");
        assert_eq!(
            lines,
            vec![(1, b"a".to_vec()), (2, b"b".to_vec()), (3, b"c".to_vec())]
        );
    }

    #[test]
    fn strips_crlf_and_lf_terminators() {
        let lines = read_all("a\r\nb\n");
        assert_eq!(lines, vec![(1, b"a".to_vec()), (2, b"b".to_vec())]);
    }

    #[test]
    fn final_unterminated_line_is_still_a_line() {
        let lines = read_all("a\nb");
        assert_eq!(lines, vec![(1, b"a".to_vec()), (2, b"b".to_vec())]);
    }

    #[test]
    fn blank_line_is_a_line_with_empty_bytes() {
        let lines = read_all("a\n\nb\n");
        assert_eq!(
            lines,
            vec![(1, b"a".to_vec()), (2, Vec::new()), (3, b"b".to_vec())]
        );
    }

    #[test]
    fn empty_source_yields_no_lines() {
        assert!(read_all("").is_empty());
    }

    #[test]
    fn lone_cr_is_not_a_terminator() {
        // Only \n and \r\n delimit lines; a bare \r stays in the content.
        let lines = read_all("a\rb\n");
        assert_eq!(lines, vec![(1, b"a\rb".to_vec())]);
    }

    #[test]
    fn missing_file_fails_to_open() {
        let source = Source::Path(PathBuf::from("definitely/not/here.csv"));
        assert!(source.open().is_err());
    }
}
