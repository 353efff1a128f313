use std::fmt;

use crate::error::{ParseError, ParseResult, TransformError};
use crate::types::{FieldKey, Record, Value};

/// Per-line mutator: receives the record and 1-based line number, returns the
/// replacement record.
pub type EachFn = Box<dyn Fn(Record, usize) -> Result<Record, TransformError>>;

/// Per-line predicate: `false` drops the record.
pub type FilterFn = Box<dyn Fn(&Record, usize) -> Result<bool, TransformError>>;

/// Per-field formatter: replaces one field value.
pub type FormatFn = Box<dyn Fn(Value) -> Result<Value, TransformError>>;

/// Grouping-key function over the fully formatted record.
pub type GroupFn = Box<dyn Fn(&Record) -> Result<String, TransformError>>;

/// Which stage of the chain a transform failure occurred in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformStage {
    /// The `each` mutator.
    Each,
    /// The `filter` predicate.
    Filter,
    /// A formatter registered for the given field key.
    Format(FieldKey),
    /// The grouping-key function.
    Group,
}

impl fmt::Display for TransformStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformStage::Each => write!(f, "each transform"),
            TransformStage::Filter => write!(f, "filter predicate"),
            TransformStage::Format(key) => write!(f, "formatter for field {key}"),
            TransformStage::Group => write!(f, "grouping function"),
        }
    }
}

/// What the chain decided for one record.
#[derive(Debug, PartialEq)]
pub enum ChainOutcome {
    /// Record survives; carries the grouping key when grouping is configured.
    Kept(Record, Option<String>),
    /// The filter predicate rejected the record.
    Dropped,
}

/// The ordered set of user transforms owned by a pipeline configuration.
///
/// Formatters are stored as an ordered list of `(key, formatters)` entries:
/// keys keep registration order, and multiple formatters on one key compose
/// left-to-right. A formatter whose key is absent from a record is a no-op for
/// that record.
#[derive(Default)]
pub struct TransformChain {
    each: Option<EachFn>,
    filter: Option<FilterFn>,
    formatters: Vec<(FieldKey, Vec<FormatFn>)>,
    group: Option<GroupFn>,
}

impl fmt::Debug for TransformChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformChain")
            .field("each_set", &self.each.is_some())
            .field("filter_set", &self.filter.is_some())
            .field(
                "formatter_keys",
                &self.formatters.iter().map(|(k, _)| k.clone()).collect::<Vec<_>>(),
            )
            .field("group_set", &self.group.is_some())
            .finish()
    }
}

impl TransformChain {
    pub(crate) fn set_each(&mut self, f: EachFn) {
        self.each = Some(f);
    }

    pub(crate) fn set_filter(&mut self, f: FilterFn) {
        self.filter = Some(f);
    }

    pub(crate) fn add_formatter(&mut self, key: FieldKey, f: FormatFn) {
        match self.formatters.iter_mut().find(|(k, _)| *k == key) {
            Some((_, fns)) => fns.push(f),
            None => self.formatters.push((key, vec![f])),
        }
    }

    pub(crate) fn set_group(&mut self, f: GroupFn) {
        self.group = Some(f);
    }

    /// Whether a grouping function is configured (decides the result shape).
    pub(crate) fn has_group(&self) -> bool {
        self.group.is_some()
    }

    /// Run the full chain for one record.
    pub(crate) fn apply(&self, record: Record, line: usize) -> ParseResult<ChainOutcome> {
        let mut record = match &self.each {
            Some(each) => each(record, line)
                .map_err(|source| transform_error(TransformStage::Each, line, source))?,
            None => record,
        };

        if let Some(filter) = &self.filter {
            let keep = filter(&record, line)
                .map_err(|source| transform_error(TransformStage::Filter, line, source))?;
            if !keep {
                return Ok(ChainOutcome::Dropped);
            }
        }

        for (key, fns) in &self.formatters {
            let Some(slot) = record.field_mut(key) else {
                continue;
            };
            for f in fns {
                let current = std::mem::replace(slot, Value::Null);
                *slot = f(current).map_err(|source| {
                    transform_error(TransformStage::Format(key.clone()), line, source)
                })?;
            }
        }

        let group_key = match &self.group {
            Some(group) => Some(
                group(&record)
                    .map_err(|source| transform_error(TransformStage::Group, line, source))?,
            ),
            None => None,
        };

        Ok(ChainOutcome::Kept(record, group_key))
    }
}

fn transform_error(stage: TransformStage, line: usize, source: TransformError) -> ParseError {
    ParseError::Transform {
        stage,
        line,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Record {
        Record::Row(fields.iter().map(|&f| f.into()).collect())
    }

    #[test]
    fn empty_chain_keeps_record_unchanged() {
        let chain = TransformChain::default();
        let outcome = chain.apply(row(&["a", "b"]), 1).unwrap();
        assert_eq!(outcome, ChainOutcome::Kept(row(&["a", "b"]), None));
    }

    #[test]
    fn each_runs_before_filter() {
        let mut chain = TransformChain::default();
        chain.set_each(Box::new(|rec, _| {
            let Record::Row(mut fields) = rec else {
                unreachable!()
            };
            fields[0] = "rewritten".into();
            Ok(Record::Row(fields))
        }));
        // The filter sees the each-transformed value.
        chain.set_filter(Box::new(|rec, _| {
            Ok(rec.field(&0.into()).and_then(Value::as_str) == Some("rewritten"))
        }));

        let outcome = chain.apply(row(&["original"]), 1).unwrap();
        assert_eq!(outcome, ChainOutcome::Kept(row(&["rewritten"]), None));
    }

    #[test]
    fn filter_false_drops_record_before_formatters() {
        let mut chain = TransformChain::default();
        chain.set_filter(Box::new(|_, _| Ok(false)));
        chain.add_formatter(
            FieldKey::Index(0),
            Box::new(|_| panic!("formatter must not run on dropped records")),
        );

        assert_eq!(chain.apply(row(&["a"]), 1).unwrap(), ChainOutcome::Dropped);
    }

    #[test]
    fn formatters_compose_in_registration_order() {
        let mut chain = TransformChain::default();
        chain.add_formatter(
            FieldKey::Index(0),
            Box::new(|v| Ok(Value::Utf8(format!("{}f", v.as_str().unwrap_or(""))))),
        );
        chain.add_formatter(
            FieldKey::Index(0),
            Box::new(|v| Ok(Value::Utf8(format!("{}g", v.as_str().unwrap_or(""))))),
        );

        let ChainOutcome::Kept(record, _) = chain.apply(row(&["x"]), 1).unwrap() else {
            panic!("record was dropped");
        };
        // g(f(value)), never f(g(value)).
        assert_eq!(record, row(&["xfg"]));
    }

    #[test]
    fn formatter_on_absent_key_is_a_no_op() {
        let mut chain = TransformChain::default();
        chain.add_formatter(FieldKey::Index(9), Box::new(|_| Ok(Value::Null)));
        chain.add_formatter(FieldKey::Name("missing".to_string()), Box::new(|_| Ok(Value::Null)));

        let outcome = chain.apply(row(&["a"]), 1).unwrap();
        assert_eq!(outcome, ChainOutcome::Kept(row(&["a"]), None));
    }

    #[test]
    fn formatter_can_retype_a_field() {
        let mut chain = TransformChain::default();
        chain.add_formatter(
            FieldKey::Index(0),
            Box::new(|v| {
                let n: i64 = v.as_str().unwrap_or("").trim().parse()?;
                Ok(Value::Int64(n))
            }),
        );

        let ChainOutcome::Kept(record, _) = chain.apply(row(&["  5 "]), 1).unwrap() else {
            panic!("record was dropped");
        };
        assert_eq!(record, Record::Row(vec![Value::Int64(5)]));
    }

    #[test]
    fn group_key_is_computed_after_formatting() {
        let mut chain = TransformChain::default();
        chain.add_formatter(
            FieldKey::Index(0),
            Box::new(|v| Ok(Value::Utf8(v.as_str().unwrap_or("").to_uppercase()))),
        );
        chain.set_group(Box::new(|rec| {
            Ok(rec.field(&0.into()).and_then(Value::as_str).unwrap_or("").to_string())
        }));

        let ChainOutcome::Kept(_, key) = chain.apply(row(&["a"]), 1).unwrap() else {
            panic!("record was dropped");
        };
        assert_eq!(key.as_deref(), Some("A"));
    }

    #[test]
    fn failing_transform_reports_stage_and_line() {
        let mut chain = TransformChain::default();
        chain.set_filter(Box::new(|_, _| Err("bad line".into())));

        let err = chain.apply(row(&["a"]), 7).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("filter predicate"));
        assert!(msg.contains("line 7"));
        assert!(msg.contains("bad line"));
    }
}
