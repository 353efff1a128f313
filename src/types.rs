//! Core data model for parsed records.
//!
//! A parse run turns each surviving input line into a [`Record`] whose shape is
//! fixed for the whole run by configuration:
//!
//! - no delimiter: [`Record::Line`] (the whole converted line)
//! - delimiter, no field names: [`Record::Row`] (ordered fields)
//! - delimiter + field names: [`Record::Keyed`] (name -> value mapping)
//!
//! The run's output is a [`Parsed`] collection: a flat record sequence, or
//! [`Groups`] when a grouping key function is configured.

use std::fmt;
use std::sync::Arc;

/// A single field value in a [`Record`].
///
/// Splitting always produces [`Value::Utf8`]; formatters may re-type a field
/// (e.g. trim a string and parse it into [`Value::Int64`]).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/absent value (e.g. a named field the line had no column for).
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Returns the string content for `Utf8` values, `None` otherwise.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Utf8(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Utf8(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Utf8(s)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

/// Identifies a record field, either by position or by configured name.
///
/// Formatters are registered against a `FieldKey`; `usize`, `&str` and `String`
/// convert into it, so callers write `.format(0, ...)` or `.format("name", ...)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKey {
    /// 0-based field position.
    Index(usize),
    /// Configured field name (keyed records only).
    Name(String),
}

impl From<usize> for FieldKey {
    fn from(idx: usize) -> Self {
        FieldKey::Index(idx)
    }
}

impl From<&str> for FieldKey {
    fn from(name: &str) -> Self {
        FieldKey::Name(name.to_owned())
    }
}

impl From<String> for FieldKey {
    fn from(name: String) -> Self {
        FieldKey::Name(name)
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::Index(idx) => write!(f, "#{idx}"),
            FieldKey::Name(name) => write!(f, "'{name}'"),
        }
    }
}

/// A record with named fields.
///
/// Field names are shared across every record of a run (`Arc<[String]>`); values
/// are stored positionally and looked up by name through the shared name list.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedRecord {
    names: Arc<[String]>,
    values: Vec<Value>,
}

impl KeyedRecord {
    /// Pair `values` positionally with `names`.
    ///
    /// Missing trailing values become [`Value::Null`]; values beyond the name
    /// list are dropped.
    pub fn new(names: Arc<[String]>, mut values: Vec<Value>) -> Self {
        values.truncate(names.len());
        values.resize(names.len(), Value::Null);
        Self { names, values }
    }

    /// Field names, in configured order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Field values, in name order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Look up a field value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.index_of(name).map(|i| &self.values[i])
    }

    /// Mutable lookup by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.index_of(name).map(|i| &mut self.values[i])
    }

    /// Iterate `(name, value)` pairs in configured order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.names.iter().map(String::as_str).zip(self.values.iter())
    }
}

/// The structured result of parsing one line.
///
/// The shape is decided once by configuration and holds for the whole run
/// (an `each` transform may still replace a record with a different shape).
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// The whole converted line (no delimiter configured).
    Line(Value),
    /// Ordered field values (delimiter configured, no field names).
    Row(Vec<Value>),
    /// Named fields (delimiter + field names configured).
    Keyed(KeyedRecord),
}

impl Record {
    /// Build a record from split field values and the optionally configured names.
    pub(crate) fn build(fields: Vec<Value>, names: Option<&Arc<[String]>>) -> Self {
        match names {
            Some(names) => Record::Keyed(KeyedRecord::new(Arc::clone(names), fields)),
            None => Record::Row(fields),
        }
    }

    /// Look up a field by key.
    ///
    /// - `Line` records expose their single value at index 0.
    /// - `Row` records resolve index keys only.
    /// - `Keyed` records resolve both names and positions.
    pub fn field(&self, key: &FieldKey) -> Option<&Value> {
        match (self, key) {
            (Record::Line(v), FieldKey::Index(0)) => Some(v),
            (Record::Line(_), _) => None,
            (Record::Row(values), FieldKey::Index(i)) => values.get(*i),
            (Record::Row(_), FieldKey::Name(_)) => None,
            (Record::Keyed(rec), FieldKey::Index(i)) => rec.values.get(*i),
            (Record::Keyed(rec), FieldKey::Name(name)) => rec.get(name),
        }
    }

    /// Mutable variant of [`Record::field`].
    pub fn field_mut(&mut self, key: &FieldKey) -> Option<&mut Value> {
        match (self, key) {
            (Record::Line(v), FieldKey::Index(0)) => Some(v),
            (Record::Line(_), _) => None,
            (Record::Row(values), FieldKey::Index(i)) => values.get_mut(*i),
            (Record::Row(_), FieldKey::Name(_)) => None,
            (Record::Keyed(rec), FieldKey::Index(i)) => rec.values.get_mut(*i),
            (Record::Keyed(rec), FieldKey::Name(name)) => rec.get_mut(name),
        }
    }

    /// Number of fields in the record (1 for `Line`).
    pub fn len(&self) -> usize {
        match self {
            Record::Line(_) => 1,
            Record::Row(values) => values.len(),
            Record::Keyed(rec) => rec.values.len(),
        }
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Grouped result collection: grouping key -> records, in encounter order.
///
/// Keys appear in first-encounter order; records within a key keep line order.
/// Lookup is positional (linear scan), which is fine for the group cardinalities
/// this crate targets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Groups {
    entries: Vec<(String, Vec<Record>)>,
}

impl Groups {
    /// Append `record` to the group for `key`, creating the group on first use.
    pub(crate) fn push(&mut self, key: String, record: Record) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, records)) => records.push(record),
            None => self.entries.push((key, vec![record])),
        }
    }

    /// Records for `key`, if any were produced.
    pub fn get(&self, key: &str) -> Option<&[Record]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, records)| records.as_slice())
    }

    /// Group keys in first-encounter order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Iterate `(key, records)` pairs in first-encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Record])> {
        self.entries.iter().map(|(k, r)| (k.as_str(), r.as_slice()))
    }

    /// Number of distinct groups.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no group was produced.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of records across all groups.
    pub fn record_count(&self) -> usize {
        self.entries.iter().map(|(_, r)| r.len()).sum()
    }
}

/// Completed result of a parse run.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    /// Flat record sequence, in line order (no grouping configured).
    Records(Vec<Record>),
    /// Records bucketed by grouping key (grouping configured).
    Grouped(Groups),
}

impl Parsed {
    /// The flat record list, or `None` for grouped output.
    pub fn records(&self) -> Option<&[Record]> {
        match self {
            Parsed::Records(records) => Some(records),
            Parsed::Grouped(_) => None,
        }
    }

    /// Consume into the flat record list, or `None` for grouped output.
    pub fn into_records(self) -> Option<Vec<Record>> {
        match self {
            Parsed::Records(records) => Some(records),
            Parsed::Grouped(_) => None,
        }
    }

    /// The grouped collection, or `None` for flat output.
    pub fn groups(&self) -> Option<&Groups> {
        match self {
            Parsed::Records(_) => None,
            Parsed::Grouped(groups) => Some(groups),
        }
    }

    /// Total number of records in the result.
    pub fn record_count(&self) -> usize {
        match self {
            Parsed::Records(records) => records.len(),
            Parsed::Grouped(groups) => groups.record_count(),
        }
    }
}
