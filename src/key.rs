//! Cache Key Builder
//!
//! Builds deterministic cache keys from a prefix and a flat parameter set.
//!
//! Keys have the shape `prefix:"name1":<json>|"name2":<json>` with names
//! sorted lexicographically and both names and values rendered with
//! `serde_json`, so `{status: "open", limit: 10}` under `projects` becomes
//! `projects:"limit":10|"status":"open"`. Quoting names keeps a name holding
//! `:` or `|` from spelling out another parameter set's key.

use serde::ser::{self, Serialize};
use serde_json::Value;

use crate::error::{CacheError, Result};

/// Separator placed between rendered parameters
pub const PARAM_SEPARATOR: &str = "|";

/// Builds a cache key from `prefix` and `params`.
///
/// `params` must serialize to a JSON object: a struct, a map with string
/// keys, or a `serde_json::json!({...})` literal. Parameter order never
/// affects the key, and values are type-sensitive (`1` and `"1"` differ).
///
/// # Errors
/// - [`CacheError::KeyEncoding`] if a value cannot be serialized, including
///   NaN and infinite floats, which JSON cannot represent
/// - [`CacheError::InvalidParams`] if `params` is not an object
pub fn create_cache_key<P>(prefix: &str, params: &P) -> Result<String>
where
    P: Serialize + ?Sized,
{
    // serde_json writes non-finite floats as null, which would collide with None
    params.serialize(FiniteFloats)?;

    let params = match serde_json::to_value(params)? {
        Value::Object(map) => map,
        other => {
            return Err(CacheError::InvalidParams(format!(
                "expected a name/value mapping, got {}",
                value_kind(&other)
            )))
        }
    };

    let mut names: Vec<&String> = params.keys().collect();
    names.sort();

    let mut rendered = Vec::with_capacity(names.len());
    for name in names {
        let encoded_name = serde_json::to_string(name)?;
        let encoded_value = serde_json::to_string(&params[name.as_str()])?;
        rendered.push(format!("{encoded_name}:{encoded_value}"));
    }

    Ok(format!("{prefix}:{}", rendered.join(PARAM_SEPARATOR)))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// == Float Check ==
/// Serializer that only walks the data and fails on a non-finite float.
struct FiniteFloats;

type Check = std::result::Result<(), serde_json::Error>;

fn check_finite(value: f64) -> Check {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ser::Error::custom(format!("{value} has no JSON encoding")))
    }
}

macro_rules! accept_scalars {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method(self, _value: $ty) -> Check {
                Ok(())
            }
        )*
    };
}

impl ser::Serializer for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    accept_scalars!(
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_i128(i128),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_u128(u128),
        serialize_char(char),
        serialize_str(&str),
        serialize_bytes(&[u8]),
    );

    fn serialize_f32(self, value: f32) -> Check {
        check_finite(f64::from(value))
    }

    fn serialize_f64(self, value: f64) -> Check {
        check_finite(value)
    }

    fn serialize_none(self) -> Check {
        Ok(())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Check {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Check {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Check {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
    ) -> Check {
        Ok(())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Check {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Check {
        value.serialize(self)
    }

    fn serialize_seq(self, _len: Option<usize>) -> std::result::Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_tuple(self, _len: usize) -> std::result::Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> std::result::Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> std::result::Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_map(self, _len: Option<usize>) -> std::result::Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> std::result::Result<Self, serde_json::Error> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> std::result::Result<Self, serde_json::Error> {
        Ok(self)
    }
}

impl ser::SerializeSeq for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Check {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeTuple for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Check {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Check {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Check {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeMap for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Check {
        key.serialize(FiniteFloats)
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Check {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeStruct for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _key: &'static str, value: &T) -> Check {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeStructVariant for FiniteFloats {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _key: &'static str, value: &T) -> Check {
        value.serialize(FiniteFloats)
    }

    fn end(self) -> Check {
        Ok(())
    }
}
