use alloc::string::String;
use alloc::vec::Vec;

use crate::head::ZiKind;
use crate::int::ZiInteger;
use crate::ZiError;

/// An owned ZiProto value.
///
/// Maps keep wire order and allow keys of any kind; duplicate keys are preserved.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ZiValue {
    /// `nil`.
    #[default]
    Nil,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(ZiInteger),
    /// A float.
    Float(f64),
    /// A UTF-8 string.
    Str(String),
    /// A binary blob.
    Bin(Vec<u8>),
    /// An array.
    Array(Vec<ZiValue>),
    /// A map as ordered `(key, value)` pairs.
    Map(Vec<(ZiValue, ZiValue)>),
}

impl ZiValue {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ZiKind {
        match self {
            Self::Nil => ZiKind::Nil,
            Self::Bool(_) => ZiKind::Bool,
            Self::Int(_) => ZiKind::Int,
            Self::Float(_) => ZiKind::Float,
            Self::Str(_) => ZiKind::Str,
            Self::Bin(_) => ZiKind::Bin,
            Self::Array(_) => ZiKind::Array,
            Self::Map(_) => ZiKind::Map,
        }
    }

    /// Returns `true` iff this is `nil`.
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Returns the boolean, if this is one.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer, if this is one.
    #[must_use]
    pub const fn as_integer(&self) -> Option<ZiInteger> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the integer as `i64`, if this is an integer that fits.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => i.as_i64(),
            _ => None,
        }
    }

    /// Returns the float, if this is one.
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the string, if this is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the binary payload, if this is one.
    #[must_use]
    pub fn as_bin(&self) -> Option<&[u8]> {
        match self {
            Self::Bin(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the elements, if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries, if this is a map.
    #[must_use]
    pub fn as_map(&self) -> Option<&[(Self, Self)]> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up a string key in a map. The first matching entry wins.
    ///
    /// Returns `None` if this is not a map or the key is absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_map()?
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    /// Encodes this value into a fresh buffer.
    ///
    /// # Errors
    ///
    /// Returns `LengthOverflow` if a length exceeds `u32::MAX`, or `AllocationFailed`.
    pub fn encode(&self) -> Result<Vec<u8>, ZiError> {
        crate::encode::encode(self)
    }
}

impl From<bool> for ZiValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<ZiInteger> for ZiValue {
    fn from(v: ZiInteger) -> Self {
        Self::Int(v)
    }
}

macro_rules! value_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ZiValue {
                fn from(v: $t) -> Self {
                    Self::Int(ZiInteger::from(v))
                }
            }
        )*
    };
}

value_from_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl From<f64> for ZiValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<f32> for ZiValue {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<&str> for ZiValue {
    fn from(v: &str) -> Self {
        Self::Str(String::from(v))
    }
}

impl From<String> for ZiValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&[u8]> for ZiValue {
    fn from(v: &[u8]) -> Self {
        Self::Bin(v.to_vec())
    }
}

impl From<Vec<u8>> for ZiValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Bin(v)
    }
}

impl From<Vec<Self>> for ZiValue {
    fn from(v: Vec<Self>) -> Self {
        Self::Array(v)
    }
}

impl From<Vec<(Self, Self)>> for ZiValue {
    fn from(v: Vec<(Self, Self)>) -> Self {
        Self::Map(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for ZiValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Nil, Into::into)
    }
}
