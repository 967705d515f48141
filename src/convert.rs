//! Runtime introspection of Rust values through `serde`.
//!
//! [`to_value`] turns anything that implements `Serialize` into a [`Value`],
//! preserving the shapes the path resolver cares about:
//!
//! | Rust                               | Value                          |
//! |------------------------------------|--------------------------------|
//! | struct, struct variant             | `Record` (fields in order)     |
//! | `Option<T>`                        | `Boxed`                        |
//! | `Vec<T>`, slices, tuples, sets     | `Sequence`                     |
//! | maps with string or integer keys   | `Map` (key width preserved)    |
//! | unit variant                       | `String` (variant name)        |
//! | newtype / tuple variant            | single-entry `Map`             |
//!
//! ```rust
//! use checkit::convert::to_value;
//! use checkit::path::resolve_path;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Order {
//!     id: u32,
//!     note: Option<String>,
//! }
//!
//! let value = to_value(&Order { id: 7, note: None }).unwrap();
//! assert_eq!(resolve_path("id", &value).and_then(|v| v.as_u64()), Some(7));
//! assert!(resolve_path("note", &value).unwrap().is_null());
//! ```

use crate::error::ConversionError;
use crate::value::{Key, Record, Value};
use serde::ser::{self, Impossible, Serialize};

/// Converts any `Serialize` value into a [`Value`].
///
/// # Errors
///
/// Returns [`ConversionError`] for map keys that are neither strings nor
/// integers, for 128-bit integers that fit neither `i64` nor `u64`, and for
/// errors raised by the type's own `Serialize` implementation.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, ConversionError> {
    value.serialize(ValueSerializer)
}

fn conversion_error(message: impl Into<String>) -> ConversionError {
    ConversionError {
        message: message.into(),
    }
}

/// Serializer whose output is a [`Value`].
pub struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = ConversionError;
    type SerializeSeq = SerializeSequence;
    type SerializeTuple = SerializeSequence;
    type SerializeTupleStruct = SerializeSequence;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeRecord;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Value, ConversionError> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, ConversionError> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<Value, ConversionError> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<Value, ConversionError> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<Value, ConversionError> {
        Ok(Value::Int(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value, ConversionError> {
        if let Ok(n) = i64::try_from(v) {
            Ok(Value::Int(n))
        } else if let Ok(n) = u64::try_from(v) {
            Ok(Value::UInt(n))
        } else {
            Err(conversion_error(format!("integer {} is out of range", v)))
        }
    }

    fn serialize_u8(self, v: u8) -> Result<Value, ConversionError> {
        Ok(Value::UInt(u64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<Value, ConversionError> {
        Ok(Value::UInt(u64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<Value, ConversionError> {
        Ok(Value::UInt(u64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<Value, ConversionError> {
        Ok(Value::UInt(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Value, ConversionError> {
        u64::try_from(v)
            .map(Value::UInt)
            .map_err(|_| conversion_error(format!("integer {} is out of range", v)))
    }

    fn serialize_f32(self, v: f32) -> Result<Value, ConversionError> {
        Ok(Value::Float(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Value, ConversionError> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value, ConversionError> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value, ConversionError> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, ConversionError> {
        Ok(Value::Sequence(
            v.iter().map(|b| Value::UInt(u64::from(*b))).collect(),
        ))
    }

    fn serialize_none(self) -> Result<Value, ConversionError> {
        Ok(Value::Boxed(None))
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Value, ConversionError> {
        Ok(Value::Boxed(Some(Box::new(to_value(value)?))))
    }

    fn serialize_unit(self) -> Result<Value, ConversionError> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value, ConversionError> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value, ConversionError> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value, ConversionError> {
        to_value(value)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, ConversionError> {
        Ok(Value::Map(vec![(Key::from(variant), to_value(value)?)]))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeSequence, ConversionError> {
        Ok(SerializeSequence {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeSequence, ConversionError> {
        ser::Serializer::serialize_seq(self, Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SerializeSequence, ConversionError> {
        ser::Serializer::serialize_seq(self, Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant, ConversionError> {
        Ok(SerializeTupleVariant {
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap, ConversionError> {
        Ok(SerializeMap {
            entries: Vec::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<SerializeRecord, ConversionError> {
        Ok(SerializeRecord {
            record: Record {
                name: Some(name.to_string()),
                fields: Vec::with_capacity(len),
            },
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeStructVariant, ConversionError> {
        Ok(SerializeStructVariant {
            variant,
            record: Record {
                name: Some(variant.to_string()),
                fields: Vec::with_capacity(len),
            },
        })
    }
}

// ─── Compound serializers ───────────────────────────────────────────────────

pub struct SerializeSequence {
    items: Vec<Value>,
}

impl ser::SerializeSeq for SerializeSequence {
    type Ok = Value;
    type Error = ConversionError;

    fn serialize_element<T: Serialize + ?Sized>(
        &mut self,
        value: &T,
    ) -> Result<(), ConversionError> {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, ConversionError> {
        Ok(Value::Sequence(self.items))
    }
}

impl ser::SerializeTuple for SerializeSequence {
    type Ok = Value;
    type Error = ConversionError;

    fn serialize_element<T: Serialize + ?Sized>(
        &mut self,
        value: &T,
    ) -> Result<(), ConversionError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, ConversionError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeSequence {
    type Ok = Value;
    type Error = ConversionError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ConversionError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, ConversionError> {
        ser::SerializeSeq::end(self)
    }
}

pub struct SerializeTupleVariant {
    variant: &'static str,
    items: Vec<Value>,
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Value;
    type Error = ConversionError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ConversionError> {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, ConversionError> {
        Ok(Value::Map(vec![(
            Key::from(self.variant),
            Value::Sequence(self.items),
        )]))
    }
}

pub struct SerializeMap {
    entries: Vec<(Key, Value)>,
    next_key: Option<Key>,
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = ConversionError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), ConversionError> {
        self.next_key = Some(key.serialize(KeySerializer)?);
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ConversionError> {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| conversion_error("map value serialized before its key"))?;
        self.entries.push((key, to_value(value)?));
        Ok(())
    }

    fn end(self) -> Result<Value, ConversionError> {
        Ok(Value::Map(self.entries))
    }
}

pub struct SerializeRecord {
    record: Record,
}

impl ser::SerializeStruct for SerializeRecord {
    type Ok = Value;
    type Error = ConversionError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), ConversionError> {
        self.record.fields.push((key.to_string(), to_value(value)?));
        Ok(())
    }

    fn end(self) -> Result<Value, ConversionError> {
        Ok(Value::Record(self.record))
    }
}

pub struct SerializeStructVariant {
    variant: &'static str,
    record: Record,
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = ConversionError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), ConversionError> {
        self.record.fields.push((key.to_string(), to_value(value)?));
        Ok(())
    }

    fn end(self) -> Result<Value, ConversionError> {
        Ok(Value::Map(vec![(
            Key::from(self.variant),
            Value::Record(self.record),
        )]))
    }
}

// ─── Map keys ───────────────────────────────────────────────────────────────

/// Serializer for map keys: strings, chars, unit variants and integers of
/// every width up to 64 bits.
struct KeySerializer;

fn unsupported_key(kind: &str) -> ConversionError {
    conversion_error(format!(
        "map keys must be strings or integers, found {}",
        kind
    ))
}

impl ser::Serializer for KeySerializer {
    type Ok = Key;
    type Error = ConversionError;
    type SerializeSeq = Impossible<Key, ConversionError>;
    type SerializeTuple = Impossible<Key, ConversionError>;
    type SerializeTupleStruct = Impossible<Key, ConversionError>;
    type SerializeTupleVariant = Impossible<Key, ConversionError>;
    type SerializeMap = Impossible<Key, ConversionError>;
    type SerializeStruct = Impossible<Key, ConversionError>;
    type SerializeStructVariant = Impossible<Key, ConversionError>;

    fn serialize_bool(self, _v: bool) -> Result<Key, ConversionError> {
        Err(unsupported_key("bool"))
    }

    fn serialize_i8(self, v: i8) -> Result<Key, ConversionError> {
        Ok(Key::I8(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Key, ConversionError> {
        Ok(Key::I16(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Key, ConversionError> {
        Ok(Key::I32(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Key, ConversionError> {
        Ok(Key::I64(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Key, ConversionError> {
        Ok(Key::U8(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Key, ConversionError> {
        Ok(Key::U16(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Key, ConversionError> {
        Ok(Key::U32(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Key, ConversionError> {
        Ok(Key::U64(v))
    }

    fn serialize_f32(self, _v: f32) -> Result<Key, ConversionError> {
        Err(unsupported_key("float"))
    }

    fn serialize_f64(self, _v: f64) -> Result<Key, ConversionError> {
        Err(unsupported_key("float"))
    }

    fn serialize_char(self, v: char) -> Result<Key, ConversionError> {
        Ok(Key::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Key, ConversionError> {
        Ok(Key::String(v.to_string()))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Key, ConversionError> {
        Err(unsupported_key("bytes"))
    }

    fn serialize_none(self) -> Result<Key, ConversionError> {
        Err(unsupported_key("option"))
    }

    fn serialize_some<T: Serialize + ?Sized>(self, _value: &T) -> Result<Key, ConversionError> {
        Err(unsupported_key("option"))
    }

    fn serialize_unit(self) -> Result<Key, ConversionError> {
        Err(unsupported_key("unit"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Key, ConversionError> {
        Err(unsupported_key(name))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Key, ConversionError> {
        Ok(Key::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Key, ConversionError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Key, ConversionError> {
        Err(unsupported_key(name))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, ConversionError> {
        Err(unsupported_key("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, ConversionError> {
        Err(unsupported_key("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, ConversionError> {
        Err(unsupported_key(name))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, ConversionError> {
        Err(unsupported_key(name))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, ConversionError> {
        Err(unsupported_key("map"))
    }

    fn serialize_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, ConversionError> {
        Err(unsupported_key(name))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, ConversionError> {
        Err(unsupported_key(name))
    }
}
