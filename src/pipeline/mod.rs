//! Pipeline builder and parse driver.
//!
//! [`Pipeline`] is the configuration surface: pick a source with
//! [`Pipeline::from_path`] or [`Pipeline::from_text`], chain configuration
//! calls in any order, then invoke [`Pipeline::parse`]. Configuration is
//! immutable during a run: `parse` takes `&self` and all registered callables
//! are `Fn`.
//!
//! Per-line order of operations: read raw line (terminator stripped) →
//! encoding conversion → field splitting (when a delimiter is configured) →
//! record building (when field names are configured) → transform chain
//! (each → filter → format → group) → result accumulation.

pub mod observability;
pub mod source;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{ParseResult, TransformError};
use crate::parsing::{EncodingConverter, FieldSplitter};
use crate::transform::{ChainOutcome, TransformChain};
use crate::types::{FieldKey, Groups, Parsed, Record, Value};

pub use observability::{
    CompositeObserver, ParseContext, ParseObserver, ParseSeverity, ParseStats, SourceLabel,
    StdErrObserver,
};
pub use source::Source;

use observability::severity_for_error;
use source::LineReader;

const DEFAULT_ENCODING: &str = "UTF-8";

/// A configured line-parsing pipeline.
///
/// # Examples
///
/// Delimited text into ordered rows:
///
/// ```rust
/// use line_record_parser::{Pipeline, Record};
///
/// # fn main() -> Result<(), line_record_parser::ParseError> {
/// let result = Pipeline::from_text("a,b,c\n1,2,3\n").delimiter(",").parse()?;
/// let rows = result.into_records().unwrap();
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[0], Record::Row(vec!["a".into(), "b".into(), "c".into()]));
/// # Ok(())
/// # }
/// ```
///
/// Named fields, a per-field formatter, and grouping:
///
/// ```rust
/// use line_record_parser::{Pipeline, Value};
///
/// # fn main() -> Result<(), line_record_parser::ParseError> {
/// let result = Pipeline::from_text("ada,98\ngrace,99\nada,97\n")
///     .delimiter(",")
///     .field_names(["name", "score"])
///     .format("score", |v| {
///         let n: i64 = v.as_str().unwrap_or("").trim().parse()?;
///         Ok(Value::Int64(n))
///     })
///     .group_by(|rec| {
///         Ok(rec.field(&"name".into()).and_then(Value::as_str).unwrap_or("").to_string())
///     })
///     .parse()?;
///
/// let groups = result.groups().unwrap();
/// assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["ada", "grace"]);
/// assert_eq!(groups.get("ada").unwrap().len(), 2);
/// # Ok(())
/// # }
/// ```
///
/// Free text (no delimiter): each record is the whole line:
///
/// ```rust
/// use line_record_parser::{Pipeline, Record};
///
/// # fn main() -> Result<(), line_record_parser::ParseError> {
/// let result = Pipeline::from_text("first\nsecond\n")
///     .filter(|rec, _line| {
///         Ok(rec.field(&0.into()).and_then(|v| v.as_str()) != Some("second"))
///     })
///     .parse()?;
/// assert_eq!(result.records().unwrap(), &[Record::Line("first".into())]);
/// # Ok(())
/// # }
/// ```
pub struct Pipeline {
    source: Source,
    delimiter: Option<String>,
    quote: char,
    escape: char,
    from_encoding: String,
    to_encoding: String,
    field_names: Option<Arc<[String]>>,
    chain: TransformChain,
    observer: Option<Arc<dyn ParseObserver>>,
    alert_at_or_above: ParseSeverity,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("source", &SourceLabel::for_source(&self.source))
            .field("delimiter", &self.delimiter)
            .field("quote", &self.quote)
            .field("escape", &self.escape)
            .field("from_encoding", &self.from_encoding)
            .field("to_encoding", &self.to_encoding)
            .field("field_names", &self.field_names)
            .field("chain", &self.chain)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Pipeline {
    fn new(source: Source) -> Self {
        Self {
            source,
            delimiter: None,
            quote: '"',
            escape: '\\',
            from_encoding: DEFAULT_ENCODING.to_string(),
            to_encoding: DEFAULT_ENCODING.to_string(),
            field_names: None,
            chain: TransformChain::default(),
            observer: None,
            alert_at_or_above: ParseSeverity::Critical,
        }
    }

    /// Parse a file, opened for one sequential read pass at parse time.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        Self::new(Source::Path(path.as_ref().to_path_buf()))
    }

    /// Parse literal text content, with line semantics identical to a file of
    /// the same bytes.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(Source::Text(text.into()))
    }

    /// Set the field delimiter (single or multi-character).
    ///
    /// Without a delimiter, lines are not split and each record is the whole
    /// converted line.
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    /// Set the quote character (default `"`).
    pub fn quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    /// Set the escape character (default `\`).
    pub fn escape(mut self, escape: char) -> Self {
        self.escape = escape;
        self
    }

    /// Set source and target encoding labels (both default to `"UTF-8"`).
    ///
    /// Labels are resolved when `parse` starts; an unrecognized label fails
    /// the run with [`crate::ParseError::UnknownEncoding`].
    pub fn encoding(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.from_encoding = from.into();
        self.to_encoding = to.into();
        self
    }

    /// Configure field names, producing keyed records instead of ordered rows.
    ///
    /// Fields are paired with names positionally: a line with fewer fields
    /// than names yields [`Value::Null`] for the trailing names; extra fields
    /// are dropped. Names only apply when a delimiter is configured.
    pub fn field_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Register a per-field formatter.
    ///
    /// Multiple formatters on the same key compose left-to-right in
    /// registration order. A key the record does not have is a no-op for that
    /// record.
    pub fn format<K, F>(mut self, key: K, f: F) -> Self
    where
        K: Into<FieldKey>,
        F: Fn(Value) -> Result<Value, TransformError> + 'static,
    {
        self.chain.add_formatter(key.into(), Box::new(f));
        self
    }

    /// Register the per-line predicate; records for which it returns `false`
    /// are dropped entirely.
    pub fn filter<F>(mut self, f: F) -> Self
    where
        F: Fn(&Record, usize) -> Result<bool, TransformError> + 'static,
    {
        self.chain.set_filter(Box::new(f));
        self
    }

    /// Register the per-line mutator, applied before the filter. It may
    /// replace the record with one of a different shape.
    pub fn each<F>(mut self, f: F) -> Self
    where
        F: Fn(Record, usize) -> Result<Record, TransformError> + 'static,
    {
        self.chain.set_each(Box::new(f));
        self
    }

    /// Register the grouping-key function. Its presence switches the result
    /// to [`Parsed::Grouped`].
    pub fn group_by<F>(mut self, f: F) -> Self
    where
        F: Fn(&Record) -> Result<String, TransformError> + 'static,
    {
        self.chain.set_group(Box::new(f));
        self
    }

    /// Attach an observer notified of the run outcome.
    pub fn observer(mut self, observer: Arc<dyn ParseObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Severity threshold at or above which the observer's `on_alert` fires
    /// (default [`ParseSeverity::Critical`]).
    pub fn alert_at_or_above(mut self, severity: ParseSeverity) -> Self {
        self.alert_at_or_above = severity;
        self
    }

    /// Run the pipeline and return the completed result collection.
    ///
    /// Lines are processed strictly in source order, one at a time. The first
    /// failing transform aborts the run with no partial result; the source
    /// handle is released on every exit path.
    pub fn parse(&self) -> ParseResult<Parsed> {
        let result = self.run();

        if let Some(obs) = self.observer.as_ref() {
            let ctx = ParseContext {
                source: SourceLabel::for_source(&self.source),
            };
            match &result {
                Ok((parsed, lines)) => obs.on_success(
                    &ctx,
                    ParseStats {
                        lines: *lines,
                        records: parsed.record_count(),
                    },
                ),
                Err(e) => {
                    let sev = severity_for_error(e);
                    obs.on_failure(&ctx, sev, e);
                    if sev >= self.alert_at_or_above {
                        obs.on_alert(&ctx, sev, e);
                    }
                }
            }
        }

        result.map(|(parsed, _)| parsed)
    }

    fn run(&self) -> ParseResult<(Parsed, usize)> {
        let converter = EncodingConverter::new(&self.from_encoding, &self.to_encoding)?;
        let splitter = self
            .delimiter
            .as_ref()
            .map(|d| FieldSplitter::new(d.as_str(), self.quote, self.escape));

        let mut reader = LineReader::new(self.source.open()?);

        let mut flat: Vec<Record> = Vec::new();
        let mut groups = Groups::default();
        let grouped = self.chain.has_group();

        while let Some((line_no, raw)) = reader.next_line()? {
            let text = converter.convert(raw);
            let record = match &splitter {
                Some(splitter) => {
                    let fields = splitter.split(&text).into_iter().map(Value::Utf8).collect();
                    Record::build(fields, self.field_names.as_ref())
                }
                None => Record::Line(Value::Utf8(text)),
            };

            match self.chain.apply(record, line_no)? {
                ChainOutcome::Dropped => {}
                ChainOutcome::Kept(record, Some(key)) => groups.push(key, record),
                ChainOutcome::Kept(record, None) => flat.push(record),
            }
        }

        let parsed = if grouped {
            Parsed::Grouped(groups)
        } else {
            Parsed::Records(flat)
        };
        Ok((parsed, reader.lines_read()))
    }
}
