//! The dynamic value model traversed by key paths.
//!
//! A [`Value`] is a tagged union over the shapes the resolver understands:
//! scalars, sequences, keyed maps, records and boxed optionals. Values can be
//! built from JSON, from Rust primitives and collections through `From`, or
//! from any `Serialize` type through [`to_value`](crate::convert::to_value).

use crate::enums::ValueKind;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Duration;

static NULL: Value = Value::Null;

// ─── Key ────────────────────────────────────────────────────────────────────

/// Key of a [`Value::Map`] entry.
///
/// Integer keys keep their width so that a path segment is matched the way
/// a map with that key type would be indexed: `"300"` never matches an `I8` key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    String(String),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
}

impl Key {
    /// Whether `segment`, converted to this key's type, equals the key.
    ///
    /// Returns `false` when the segment cannot be converted.
    pub fn matches(&self, segment: &str) -> bool {
        match self {
            Key::String(k) => k == segment,
            Key::I8(k) => segment.parse::<i8>().is_ok_and(|n| n == *k),
            Key::I16(k) => segment.parse::<i16>().is_ok_and(|n| n == *k),
            Key::I32(k) => segment.parse::<i32>().is_ok_and(|n| n == *k),
            Key::I64(k) => segment.parse::<i64>().is_ok_and(|n| n == *k),
            Key::U8(k) => segment.parse::<u8>().is_ok_and(|n| n == *k),
            Key::U16(k) => segment.parse::<u16>().is_ok_and(|n| n == *k),
            Key::U32(k) => segment.parse::<u32>().is_ok_and(|n| n == *k),
            Key::U64(k) => segment.parse::<u64>().is_ok_and(|n| n == *k),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::String(k) => f.write_str(k),
            Key::I8(k) => write!(f, "{}", k),
            Key::I16(k) => write!(f, "{}", k),
            Key::I32(k) => write!(f, "{}", k),
            Key::I64(k) => write!(f, "{}", k),
            Key::U8(k) => write!(f, "{}", k),
            Key::U16(k) => write!(f, "{}", k),
            Key::U32(k) => write!(f, "{}", k),
            Key::U64(k) => write!(f, "{}", k),
        }
    }
}

impl From<String> for Key {
    fn from(k: String) -> Self {
        Key::String(k)
    }
}

impl From<&str> for Key {
    fn from(k: &str) -> Self {
        Key::String(k.to_string())
    }
}

macro_rules! key_from_int {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Key {
                fn from(k: $ty) -> Self {
                    Key::$variant(k)
                }
            }
        )*
    };
}

key_from_int!(
    i8 => I8, i16 => I16, i32 => I32, i64 => I64,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64,
);

// ─── Record ─────────────────────────────────────────────────────────────────

/// A struct-like value with named fields in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    /// Type name, when known. Not used for resolution.
    pub name: Option<String>,
    pub fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Record::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Record {
            name: Some(name.into()),
            fields: Vec::new(),
        }
    }

    /// Appends a field and returns the record, for literal construction.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((field.into(), value.into()));
        self
    }

    /// Looks up a field by exact, case-sensitive name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, v)| v)
    }
}

// ─── Value ──────────────────────────────────────────────────────────────────

/// A runtime-typed value.
///
/// `Null` is distinct from an empty container: it cannot be descended into,
/// while an empty sequence still answers quantifier segments.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Duration(Duration),
    Sequence(Vec<Value>),
    /// Keyed map in insertion order.
    Map(Vec<(Key, Value)>),
    Record(Record),
    /// Optional or pointer wrapper; `Boxed(None)` behaves like `Null`.
    Boxed(Option<Box<Value>>),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) | Value::UInt(_) => ValueKind::Integer,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Duration(_) => ValueKind::Duration,
            Value::Sequence(_) => ValueKind::Sequence,
            Value::Map(_) => ValueKind::Map,
            Value::Record(_) => ValueKind::Record,
            Value::Boxed(_) => ValueKind::Boxed,
        }
    }

    /// Follows nested boxes to the innermost value. An empty box yields `Null`.
    pub fn unboxed(&self) -> &Value {
        let mut current = self;
        loop {
            match current {
                Value::Boxed(Some(inner)) => current = inner,
                Value::Boxed(None) => return &NULL,
                other => return other,
            }
        }
    }

    /// True for `Null` and for boxes that are empty after unwrapping.
    pub fn is_null(&self) -> bool {
        matches!(self.unboxed(), Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.unboxed() {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.unboxed() {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.unboxed() {
            Value::Int(n) => Some(*n),
            Value::UInt(n) => i64::try_from(*n).ok(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self.unboxed() {
            Value::Int(n) => u64::try_from(*n).ok(),
            Value::UInt(n) => Some(*n),
            _ => None,
        }
    }

    /// Any numeric value widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self.unboxed() {
            Value::Int(n) => Some(*n as f64),
            Value::UInt(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self.unboxed() {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(Key, Value)]> {
        match self.unboxed() {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self.unboxed() {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Looks up a map entry whose key matches `segment` after conversion to
    /// the key's own type.
    pub fn get_key(&self, segment: &str) -> Option<&Value> {
        self.as_map()?
            .iter()
            .find(|(key, _)| key.matches(segment))
            .map(|(_, v)| v)
    }

    /// Length of a string (in chars) or container; `None` for scalars.
    pub fn len(&self) -> Option<usize> {
        match self.unboxed() {
            Value::String(s) => Some(s.chars().count()),
            Value::Sequence(items) => Some(items.len()),
            Value::Map(entries) => Some(entries.len()),
            Value::Record(record) => Some(record.fields.len()),
            _ => None,
        }
    }
}

// ─── Conversions ────────────────────────────────────────────────────────────

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! value_from_signed {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Int(n as i64)
                }
            }
        )*
    };
}

macro_rules! value_from_unsigned {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::UInt(n as u64)
                }
            }
        )*
    };
}

value_from_signed!(i8, i16, i32, i64, isize);
value_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(n as f64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Duration> for Value {
    fn from(d: Duration) -> Self {
        Value::Duration(d)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        Value::Boxed(opt.map(|v| Box::new(v.into())))
    }
}

impl<K: Into<Key>, V: Into<Value>> From<BTreeMap<K, V>> for Value {
    fn from(map: BTreeMap<K, V>) -> Self {
        Value::Map(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Entries are sorted by key so that iteration order is deterministic.
impl<K: Into<Key>, V: Into<Value>> From<HashMap<K, V>> for Value {
    fn from(map: HashMap<K, V>) -> Self {
        let mut entries: Vec<(Key, Value)> =
            map.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Value::Map(entries)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    n.as_f64().map(Value::Float).unwrap_or(Value::Null)
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (Key::String(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(json: &serde_json::Value) -> Self {
        Value::from(json.clone())
    }
}
