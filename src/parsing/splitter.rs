//! Quote/escape-aware field splitting for a single line.

/// Splits one line of text into ordered field strings.
///
/// Semantics are CSV-standard, applied per line (line terminators are stripped
/// by the source reader before splitting):
///
/// - fields are separated by unquoted occurrences of the delimiter (which may
///   be more than one character, e.g. `"||"`)
/// - a field may be wrapped in quote characters; delimiters inside are literal
/// - escape-before-quote and doubled quotes both yield a literal quote inside
///   a quoted field
///
/// An empty line yields a single empty field; a trailing delimiter yields a
/// trailing empty field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSplitter {
    delimiter: String,
    quote: char,
    escape: char,
}

impl FieldSplitter {
    /// Create a splitter. `delimiter` must be non-empty.
    pub fn new(delimiter: impl Into<String>, quote: char, escape: char) -> Self {
        let delimiter = delimiter.into();
        assert!(!delimiter.is_empty(), "delimiter must be non-empty");
        Self {
            delimiter,
            quote,
            escape,
        }
    }

    /// Split `line` into fields.
    pub fn split(&self, line: &str) -> Vec<String> {
        let mut fields = Vec::new();
        let mut field = String::new();
        let mut in_quotes = false;

        let mut chars = line.char_indices().peekable();
        while let Some((at, c)) = chars.next() {
            if in_quotes {
                if c == self.escape && self.peek_is(&mut chars, self.quote) {
                    field.push(self.quote);
                    chars.next();
                } else if c == self.quote {
                    if self.peek_is(&mut chars, self.quote) {
                        // Doubled quote: literal quote, still quoted.
                        field.push(self.quote);
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                } else {
                    field.push(c);
                }
            } else if line[at..].starts_with(self.delimiter.as_str()) {
                fields.push(std::mem::take(&mut field));
                // Consume the delimiter's remaining characters.
                let mut taken = c.len_utf8();
                while taken < self.delimiter.len() {
                    match chars.next() {
                        Some((_, d)) => taken += d.len_utf8(),
                        None => break,
                    }
                }
            } else if c == self.quote {
                in_quotes = true;
            } else {
                field.push(c);
            }
        }

        fields.push(field);
        fields
    }

    fn peek_is(&self, chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>, want: char) -> bool {
        matches!(chars.peek(), Some(&(_, c)) if c == want)
    }
}
