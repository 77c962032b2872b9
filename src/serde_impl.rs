use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde::de::value::BorrowedStrDeserializer;
use serde::de::{DeserializeOwned, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{forward_to_deserialize_any, Deserialize, Serialize, Serializer};

use crate::int::ZiInteger;
use crate::value::ZiValue;
use crate::{DecodeLimits, ErrorCode, ZiError};

impl Serialize for ZiValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Nil => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => match (i.as_i64(), i.as_u64()) {
                (Some(v), _) => serializer.serialize_i64(v),
                (None, Some(u)) => serializer.serialize_u64(u),
                (None, None) => Err(serde::ser::Error::custom("integer out of range")),
            },
            Self::Float(v) => serializer.serialize_f64(*v),
            Self::Str(s) => serializer.serialize_str(s),
            Self::Bin(b) => serializer.serialize_bytes(b),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(entries) => {
                let mut m = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    m.serialize_entry(k, v)?;
                }
                m.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for ZiValue {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ZiValueVisitor)
    }
}

struct ZiValueVisitor;

impl<'de> Visitor<'de> for ZiValueVisitor {
    type Value = ZiValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a ZiProto value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E> {
        Ok(ZiValue::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
        Ok(ZiValue::Int(ZiInteger::from(v)))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
        Ok(ZiValue::Int(ZiInteger::from(v)))
    }

    fn visit_i128<E>(self, v: i128) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        ZiInteger::try_from(v)
            .map(ZiValue::Int)
            .map_err(|_| E::custom("integer out of range"))
    }

    fn visit_u128<E>(self, v: u128) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        u64::try_from(v)
            .map(|u| ZiValue::Int(ZiInteger::from(u)))
            .map_err(|_| E::custom("integer out of range"))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
        Ok(ZiValue::Float(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
        Ok(ZiValue::Str(String::from(v)))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E> {
        Ok(ZiValue::Str(v))
    }

    fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E> {
        Ok(ZiValue::Bin(v.to_vec()))
    }

    fn visit_byte_buf<E>(self, v: Vec<u8>) -> Result<Self::Value, E> {
        Ok(ZiValue::Bin(v))
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(ZiValue::Nil)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(ZiValue::Nil)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
        while let Some(item) = seq.next_element::<ZiValue>()? {
            items.push(item);
        }
        Ok(ZiValue::Array(items))
    }

    fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
    where
        M: serde::de::MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0).min(4096));
        while let Some(entry) = map.next_entry::<ZiValue, ZiValue>()? {
            entries.push(entry);
        }
        Ok(ZiValue::Map(entries))
    }
}

/// Serialize a Rust value into ZiProto bytes.
///
/// Structs become maps keyed by field name, unit enum variants become strings, and other enum
/// variants become single-entry maps `{variant: payload}`.
///
/// # Errors
///
/// Returns an error if the value cannot be represented (for example a `u128` above `u64::MAX`).
pub fn to_vec<T: Serialize>(value: &T) -> Result<Vec<u8>, ZiError> {
    let v = to_value(value)?;
    v.encode()
}

/// Deserialize a Rust value from ZiProto bytes holding exactly one value.
///
/// # Errors
///
/// Returns an error if bytes are invalid or if the decoded value doesn't match the target type.
pub fn from_slice<T: DeserializeOwned>(bytes: &[u8], limits: DecodeLimits) -> Result<T, ZiError> {
    let v = crate::decode_value(bytes, limits)?;
    from_value_ref(&v)
}

/// Convert a Rust value into a [`ZiValue`].
///
/// # Errors
///
/// Returns an error if the value cannot be represented.
pub fn to_value<T: Serialize>(value: &T) -> Result<ZiValue, ZiError> {
    value
        .serialize(ZiSerializer)
        .map_err(|err| ZiError::new(err.code, 0))
}

/// Deserialize a Rust value from a [`ZiValue`], borrowing strings and bytes where possible.
///
/// # Errors
///
/// Returns an error if the value doesn't match the target type.
pub fn from_value_ref<'de, T: Deserialize<'de>>(value: &'de ZiValue) -> Result<T, ZiError> {
    T::deserialize(ZiDeserializer::new(value)).map_err(|err| ZiError::new(err.code, 0))
}

#[derive(Debug, Clone, Copy)]
struct SerdeError {
    code: ErrorCode,
}

impl SerdeError {
    const fn with_code(code: ErrorCode) -> Self {
        Self { code }
    }

    const fn mismatch() -> Self {
        Self::with_code(ErrorCode::SerdeError)
    }
}

impl fmt::Display for SerdeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "serde conversion error")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SerdeError {}

impl serde::ser::Error for SerdeError {
    fn custom<T: fmt::Display>(_msg: T) -> Self {
        Self::mismatch()
    }
}

impl serde::de::Error for SerdeError {
    fn custom<T: fmt::Display>(_msg: T) -> Self {
        Self::mismatch()
    }
}

struct ZiSerializer;

impl Serializer for ZiSerializer {
    type Ok = ZiValue;
    type Error = SerdeError;

    type SerializeSeq = SeqSerializer;
    type SerializeTuple = SeqSerializer;
    type SerializeTupleStruct = SeqSerializer;
    type SerializeTupleVariant = VariantSerializer<SeqSerializer>;
    type SerializeMap = MapSerializer;
    type SerializeStruct = MapSerializer;
    type SerializeStructVariant = VariantSerializer<MapSerializer>;

    fn serialize_bool(self, v: bool) -> Result<Self::Ok, Self::Error> {
        Ok(ZiValue::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Self::Ok, Self::Error> {
        Ok(ZiValue::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Self::Ok, Self::Error> {
        Ok(ZiValue::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Self::Ok, Self::Error> {
        Ok(ZiValue::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Self::Ok, Self::Error> {
        Ok(ZiValue::from(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Self::Ok, Self::Error> {
        ZiInteger::try_from(v)
            .map(ZiValue::Int)
            .map_err(|err| SerdeError::with_code(err.code))
    }

    fn serialize_u8(self, v: u8) -> Result<Self::Ok, Self::Error> {
        Ok(ZiValue::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Self::Ok, Self::Error> {
        Ok(ZiValue::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Self::Ok, Self::Error> {
        Ok(ZiValue::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Self::Ok, Self::Error> {
        Ok(ZiValue::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Self::Ok, Self::Error> {
        u64::try_from(v)
            .map(ZiValue::from)
            .map_err(|_| SerdeError::with_code(ErrorCode::IntegerOverflow))
    }

    fn serialize_f32(self, v: f32) -> Result<Self::Ok, Self::Error> {
        Ok(ZiValue::Float(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Self::Ok, Self::Error> {
        Ok(ZiValue::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok, Self::Error> {
        let mut buf = [0u8; 4];
        Ok(ZiValue::from(&*v.encode_utf8(&mut buf)))
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok, Self::Error> {
        Ok(ZiValue::from(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Self::Ok, Self::Error> {
        Ok(ZiValue::from(v))
    }

    fn serialize_none(self) -> Result<Self::Ok, Self::Error> {
        Ok(ZiValue::Nil)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Self::Ok, Self::Error> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok, Self::Error> {
        Ok(ZiValue::Nil)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok, Self::Error> {
        Ok(ZiValue::Nil)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok, Self::Error> {
        Ok(ZiValue::from(variant))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Self::Ok, Self::Error> {
        let inner = value.serialize(Self)?;
        Ok(enum_map(variant, inner))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Ok(SeqSerializer::new(len))
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        Ok(SeqSerializer::new(Some(len)))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        Ok(SeqSerializer::new(Some(len)))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Ok(VariantSerializer {
            variant,
            inner: SeqSerializer::new(Some(len)),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Ok(MapSerializer::new(len))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Ok(MapSerializer::new(Some(len)))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Ok(VariantSerializer {
            variant,
            inner: MapSerializer::new(Some(len)),
        })
    }
}

fn enum_map(variant: &str, value: ZiValue) -> ZiValue {
    ZiValue::Map(alloc::vec![(ZiValue::from(variant), value)])
}

struct SeqSerializer {
    items: Vec<ZiValue>,
}

impl SeqSerializer {
    fn new(len: Option<usize>) -> Self {
        let items = len.map_or_else(Vec::new, Vec::with_capacity);
        Self { items }
    }
}

impl SerializeSeq for SeqSerializer {
    type Ok = ZiValue;
    type Error = SerdeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        self.items.push(value.serialize(ZiSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(ZiValue::Array(self.items))
    }
}

impl serde::ser::SerializeTuple for SeqSerializer {
    type Ok = ZiValue;
    type Error = SerdeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        SerializeSeq::end(self)
    }
}

impl serde::ser::SerializeTupleStruct for SeqSerializer {
    type Ok = ZiValue;
    type Error = SerdeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        SerializeSeq::end(self)
    }
}

struct MapSerializer {
    entries: Vec<(ZiValue, ZiValue)>,
    next_key: Option<ZiValue>,
}

impl MapSerializer {
    fn new(len: Option<usize>) -> Self {
        let entries = len.map_or_else(Vec::new, Vec::with_capacity);
        Self {
            entries,
            next_key: None,
        }
    }
}

impl SerializeMap for MapSerializer {
    type Ok = ZiValue;
    type Error = SerdeError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), Self::Error> {
        self.next_key = Some(key.serialize(ZiSerializer)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        let key = self.next_key.take().ok_or_else(SerdeError::mismatch)?;
        let val = value.serialize(ZiSerializer)?;
        self.entries.push((key, val));
        Ok(())
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(ZiValue::Map(self.entries))
    }
}

impl serde::ser::SerializeStruct for MapSerializer {
    type Ok = ZiValue;
    type Error = SerdeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        let val = value.serialize(ZiSerializer)?;
        self.entries.push((ZiValue::from(key), val));
        Ok(())
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        SerializeMap::end(self)
    }
}

struct VariantSerializer<S> {
    variant: &'static str,
    inner: S,
}

impl serde::ser::SerializeTupleVariant for VariantSerializer<SeqSerializer> {
    type Ok = ZiValue;
    type Error = SerdeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Self::Error> {
        SerializeSeq::serialize_element(&mut self.inner, value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(enum_map(self.variant, SerializeSeq::end(self.inner)?))
    }
}

impl serde::ser::SerializeStructVariant for VariantSerializer<MapSerializer> {
    type Ok = ZiValue;
    type Error = SerdeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), Self::Error> {
        serde::ser::SerializeStruct::serialize_field(&mut self.inner, key, value)
    }

    fn end(self) -> Result<Self::Ok, Self::Error> {
        Ok(enum_map(self.variant, SerializeMap::end(self.inner)?))
    }
}

struct ZiDeserializer<'de> {
    value: &'de ZiValue,
}

impl<'de> ZiDeserializer<'de> {
    const fn new(value: &'de ZiValue) -> Self {
        Self { value }
    }
}

impl<'de> serde::de::Deserializer<'de> for ZiDeserializer<'de> {
    type Error = SerdeError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            ZiValue::Nil => visitor.visit_unit(),
            ZiValue::Bool(b) => visitor.visit_bool(*b),
            ZiValue::Int(i) => match (i.as_u64(), i.as_i64()) {
                (Some(u), _) => visitor.visit_u64(u),
                (None, Some(v)) => visitor.visit_i64(v),
                (None, None) => Err(SerdeError::mismatch()),
            },
            ZiValue::Float(v) => visitor.visit_f64(*v),
            ZiValue::Str(s) => visitor.visit_borrowed_str(s),
            ZiValue::Bin(b) => visitor.visit_borrowed_bytes(b),
            ZiValue::Array(items) => visitor.visit_seq(SeqAccess { items, idx: 0 }),
            ZiValue::Map(entries) => visitor.visit_map(MapAccess::new(entries)),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        if self.value.is_nil() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            ZiValue::Str(variant) => visitor.visit_enum(EnumAccess {
                variant,
                value: None,
            }),
            ZiValue::Map(entries) => match entries.as_slice() {
                [(ZiValue::Str(variant), value)] => visitor.visit_enum(EnumAccess {
                    variant,
                    value: Some(value),
                }),
                _ => Err(SerdeError::mismatch()),
            },
            _ => Err(SerdeError::mismatch()),
        }
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct identifier
    }
}

struct SeqAccess<'de> {
    items: &'de [ZiValue],
    idx: usize,
}

impl<'de> serde::de::SeqAccess<'de> for SeqAccess<'de> {
    type Error = SerdeError;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, Self::Error>
    where
        T: serde::de::DeserializeSeed<'de>,
    {
        let Some(value) = self.items.get(self.idx) else {
            return Ok(None);
        };
        self.idx += 1;
        seed.deserialize(ZiDeserializer::new(value)).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len() - self.idx)
    }
}

struct MapAccess<'de> {
    entries: core::slice::Iter<'de, (ZiValue, ZiValue)>,
    pending: Option<&'de ZiValue>,
}

impl<'de> MapAccess<'de> {
    fn new(entries: &'de [(ZiValue, ZiValue)]) -> Self {
        Self {
            entries: entries.iter(),
            pending: None,
        }
    }
}

impl<'de> serde::de::MapAccess<'de> for MapAccess<'de> {
    type Error = SerdeError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: serde::de::DeserializeSeed<'de>,
    {
        match self.entries.next() {
            None => Ok(None),
            Some((key, value)) => {
                self.pending = Some(value);
                seed.deserialize(ZiDeserializer::new(key)).map(Some)
            }
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Self::Error>
    where
        V: serde::de::DeserializeSeed<'de>,
    {
        let value = self.pending.take().ok_or_else(SerdeError::mismatch)?;
        seed.deserialize(ZiDeserializer::new(value))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

struct EnumAccess<'de> {
    variant: &'de str,
    value: Option<&'de ZiValue>,
}

impl<'de> serde::de::EnumAccess<'de> for EnumAccess<'de> {
    type Error = SerdeError;
    type Variant = VariantAccess<'de>;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant), Self::Error>
    where
        V: serde::de::DeserializeSeed<'de>,
    {
        let val = seed.deserialize(BorrowedStrDeserializer::<SerdeError>::new(self.variant))?;
        Ok((val, VariantAccess { value: self.value }))
    }
}

struct VariantAccess<'de> {
    value: Option<&'de ZiValue>,
}

impl<'de> serde::de::VariantAccess<'de> for VariantAccess<'de> {
    type Error = SerdeError;

    fn unit_variant(self) -> Result<(), Self::Error> {
        match self.value {
            None => Ok(()),
            Some(v) if v.is_nil() => Ok(()),
            _ => Err(SerdeError::mismatch()),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value, Self::Error>
    where
        T: serde::de::DeserializeSeed<'de>,
    {
        let value = self.value.ok_or_else(SerdeError::mismatch)?;
        seed.deserialize(ZiDeserializer::new(value))
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.value.and_then(ZiValue::as_array).map_or_else(
            || Err(SerdeError::mismatch()),
            |items| visitor.visit_seq(SeqAccess { items, idx: 0 }),
        )
    }

    fn struct_variant<V>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.value.and_then(ZiValue::as_map).map_or_else(
            || Err(SerdeError::mismatch()),
            |entries| visitor.visit_map(MapAccess::new(entries)),
        )
    }
}
