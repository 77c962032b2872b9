//! Borrowed, zero-copy views over ZiProto bytes.
//!
//! A [`Decoder`] is a `Copy` handle onto one encoded value inside a larger buffer. It never owns
//! or mutates bytes: navigating to a child or a sibling produces a new view, and typed getters
//! borrow their payload from the original buffer. Offsets reported in errors are always relative
//! to that original buffer.

use crate::head::{payload, read_header, Arg, Header, ZiKind};
use crate::iter::{ArrayIter, MapIter};
use crate::int::{ZiInteger, ZiNumber};
use crate::walk::{enforce_len_limits, ensure_room, value_end};
use crate::{DecodeLimits, ErrorCode, Expected, ZiError};

#[cfg(feature = "alloc")]
use crate::value::ZiValue;

/// A path element for navigating inside a ZiProto value.
///
/// Map lookups by `Key` match string keys only; use [`Decoder::get_key_value`] for keys of any
/// other type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathElem<'p> {
    /// Select a string key from a map.
    Key(&'p str),
    /// Select an index from an array.
    Index(usize),
}

impl<'p> From<&'p str> for PathElem<'p> {
    fn from(key: &'p str) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathElem<'_> {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// A borrowed view positioned at the start of one encoded value.
///
/// The view carries the whole buffer, the value's start offset, and the limits used whenever a
/// container has to be walked. Child and sibling views inherit the same buffer and limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoder<'a> {
    data: &'a [u8],
    pos: usize,
    limits: DecodeLimits,
}

impl<'a> Decoder<'a> {
    /// View the value at the start of `bytes`, with [`DecodeLimits::unlimited`] limits.
    ///
    /// Only nesting depth is bounded; every length is checked against the buffer itself. Use
    /// [`Decoder::with_limits`] or [`validate`](crate::validate) to bound untrusted input.
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self::from_parts(bytes, 0, DecodeLimits::unlimited())
    }

    /// View the value at the start of `bytes` with explicit limits.
    ///
    /// # Errors
    ///
    /// Returns `MessageLenLimitExceeded` if `bytes` exceeds `limits.max_input_bytes`.
    pub const fn with_limits(bytes: &'a [u8], limits: DecodeLimits) -> Result<Self, ZiError> {
        if bytes.len() > limits.max_input_bytes {
            return Err(ZiError::new(ErrorCode::MessageLenLimitExceeded, 0));
        }
        Ok(Self::from_parts(bytes, 0, limits))
    }

    #[inline]
    pub(crate) const fn from_parts(data: &'a [u8], pos: usize, limits: DecodeLimits) -> Self {
        Self { data, pos, limits }
    }

    /// Returns the offset of this value within the original buffer.
    #[inline]
    #[must_use]
    pub const fn position(self) -> usize {
        self.pos
    }

    /// Returns the limits this view walks containers with.
    #[inline]
    #[must_use]
    pub const fn limits(self) -> DecodeLimits {
        self.limits
    }

    /// Returns the whole buffer this view points into.
    #[inline]
    #[must_use]
    pub const fn buffer(self) -> &'a [u8] {
        self.data
    }

    /// Returns true when the view sits at or past the end of its buffer.
    ///
    /// This is where [`Decoder::next`] lands after the last value of a buffer.
    #[inline]
    #[must_use]
    pub const fn is_end(self) -> bool {
        self.pos >= self.data.len()
    }

    #[inline]
    fn header(self) -> Result<Header, ZiError> {
        read_header(self.data, self.pos)
    }

    #[inline]
    fn expect(self, kind: ZiKind) -> Result<Header, ZiError> {
        let h = self.header()?;
        if h.kind != kind {
            return Err(ZiError::mismatch(Expected::Kind(kind), h.kind, self.pos));
        }
        enforce_len_limits(h, self.limits, self.pos)?;
        Ok(h)
    }

    #[inline]
    const fn at_offset(self, pos: usize) -> Self {
        Self::from_parts(self.data, pos, self.limits)
    }

    /// Returns the kind of the value at this position.
    ///
    /// # Errors
    ///
    /// Returns `UnknownHead` for an unassigned head byte, `BufferUnderrun` past the end.
    pub fn get_type(self) -> Result<ZiKind, ZiError> {
        self.header().map(|h| h.kind)
    }

    fn is_kind(self, kind: ZiKind) -> bool {
        matches!(self.get_type(), Ok(k) if k == kind)
    }

    /// Returns `true` iff the value is `nil`.
    #[must_use]
    pub fn is_nil(self) -> bool {
        self.is_kind(ZiKind::Nil)
    }

    /// Returns `true` iff the value is a boolean.
    #[must_use]
    pub fn is_bool(self) -> bool {
        self.is_kind(ZiKind::Bool)
    }

    /// Returns `true` iff the value is an integer.
    #[must_use]
    pub fn is_int(self) -> bool {
        self.is_kind(ZiKind::Int)
    }

    /// Returns `true` iff the value is a float.
    #[must_use]
    pub fn is_float(self) -> bool {
        self.is_kind(ZiKind::Float)
    }

    /// Returns `true` iff the value is a string.
    #[must_use]
    pub fn is_str(self) -> bool {
        self.is_kind(ZiKind::Str)
    }

    /// Returns `true` iff the value is a binary blob.
    #[must_use]
    pub fn is_bin(self) -> bool {
        self.is_kind(ZiKind::Bin)
    }

    /// Returns `true` iff the value is an array.
    #[must_use]
    pub fn is_array(self) -> bool {
        self.is_kind(ZiKind::Array)
    }

    /// Returns `true` iff the value is a map.
    #[must_use]
    pub fn is_map(self) -> bool {
        self.is_kind(ZiKind::Map)
    }

    /// Decodes a boolean.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the value is not a boolean.
    pub fn get_bool(self) -> Result<bool, ZiError> {
        let h = self.header()?;
        match (h.kind, h.arg) {
            (ZiKind::Bool, Arg::Bool(b)) => Ok(b),
            (kind, _) => Err(ZiError::mismatch(Expected::Kind(ZiKind::Bool), kind, self.pos)),
        }
    }

    /// Decodes an integer of any width and sign.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the value is not an integer.
    pub fn get_integer(self) -> Result<ZiInteger, ZiError> {
        let h = self.header()?;
        match (h.kind, h.arg) {
            (ZiKind::Int, Arg::Uint(u)) => Ok(ZiInteger::from(u)),
            (ZiKind::Int, Arg::Int(i)) => Ok(ZiInteger::from(i)),
            (kind, _) => Err(ZiError::mismatch(Expected::Kind(ZiKind::Int), kind, self.pos)),
        }
    }

    /// Decodes an integer as `i64`.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the value is not an integer, `IntegerOverflow` for a `uint64`
    /// above `i64::MAX`.
    pub fn get_int(self) -> Result<i64, ZiError> {
        self.get_integer()?
            .as_i64()
            .ok_or_else(|| ZiError::new(ErrorCode::IntegerOverflow, self.pos))
    }

    /// Decodes a non-negative integer as `u64`.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the value is not an integer, `IntegerOverflow` if it is negative.
    pub fn get_u64(self) -> Result<u64, ZiError> {
        self.get_integer()?
            .as_u64()
            .ok_or_else(|| ZiError::new(ErrorCode::IntegerOverflow, self.pos))
    }

    /// Decodes a float. Single-precision values are widened to `f64`.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the value is not a float.
    pub fn get_float(self) -> Result<f64, ZiError> {
        let h = self.header()?;
        match (h.kind, h.arg) {
            (ZiKind::Float, Arg::Float(v)) => Ok(v),
            (kind, _) => Err(ZiError::mismatch(Expected::Kind(ZiKind::Float), kind, self.pos)),
        }
    }

    /// Decodes an integer or a float.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` for every other kind.
    pub fn get_number(self) -> Result<ZiNumber, ZiError> {
        let h = self.header()?;
        match h.arg {
            Arg::Uint(u) if h.kind == ZiKind::Int => Ok(ZiNumber::Int(ZiInteger::from(u))),
            Arg::Int(i) if h.kind == ZiKind::Int => Ok(ZiNumber::Int(ZiInteger::from(i))),
            Arg::Float(v) => Ok(ZiNumber::Float(v)),
            _ => Err(ZiError::mismatch(Expected::Number, h.kind, self.pos)),
        }
    }

    /// Decodes a string, borrowing it from the buffer.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the value is not a string, `BufferUnderrun` if the payload is
    /// truncated, `Utf8Invalid` if it is not UTF-8.
    pub fn get_str(self) -> Result<&'a str, ZiError> {
        let h = self.expect(ZiKind::Str)?;
        let bytes = payload(self.data, h, self.pos)?;
        crate::utf8::validate(bytes, self.pos)
    }

    /// Decodes a binary blob, borrowing it from the buffer.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the value is not binary, `BufferUnderrun` if the payload is
    /// truncated.
    pub fn get_bin(self) -> Result<&'a [u8], ZiError> {
        let h = self.expect(ZiKind::Bin)?;
        payload(self.data, h, self.pos)
    }

    /// Materializes the whole value into an owned [`ZiValue`].
    ///
    /// # Errors
    ///
    /// Returns the first malformed-input or limit error met while reading the value.
    #[cfg(feature = "alloc")]
    #[cfg_attr(docsrs, doc(cfg(feature = "alloc")))]
    pub fn get(self) -> Result<ZiValue, ZiError> {
        crate::decode::materialize(self.data, self.pos, self.limits).map(|(v, _)| v)
    }

    /// Returns the offset just past this value.
    ///
    /// For containers this walks every descendant.
    ///
    /// # Errors
    ///
    /// Returns the first malformed-input or limit error met while walking the value.
    pub fn end(self) -> Result<usize, ZiError> {
        value_end(self.data, self.pos, self.limits)
    }

    /// Returns a view of the value immediately following this one.
    ///
    /// After the last value of the buffer the returned view is [`Decoder::is_end`].
    ///
    /// # Errors
    ///
    /// Returns the first malformed-input or limit error met while walking this value.
    #[allow(clippy::should_implement_trait)]
    pub fn next(self) -> Result<Self, ZiError> {
        Ok(self.at_offset(self.end()?))
    }

    /// Returns the exact encoded bytes of this value.
    ///
    /// # Errors
    ///
    /// Returns the first malformed-input or limit error met while walking this value.
    pub fn get_bytes(self) -> Result<&'a [u8], ZiError> {
        let end = self.end()?;
        Ok(&self.data[self.pos..end])
    }

    /// Compute the SHA-256 digest of this value's encoded bytes.
    ///
    /// # Errors
    ///
    /// Returns the first malformed-input or limit error met while walking this value.
    #[cfg(feature = "sha2")]
    #[cfg_attr(docsrs, doc(cfg(feature = "sha2")))]
    pub fn sha256(self) -> Result<[u8; 32], ZiError> {
        use sha2::{Digest, Sha256};
        let mut h = Sha256::new();
        h.update(self.get_bytes()?);
        let out = h.finalize();
        let mut digest = [0u8; 32];
        digest.copy_from_slice(out.as_slice());
        Ok(digest)
    }

    /// Reads a container header and returns `(declared length, first child view)`.
    fn container(self, expected: Expected) -> Result<(usize, Self), ZiError> {
        let h = self.header()?;
        let ok = match expected {
            Expected::Kind(k) => h.kind == k,
            _ => h.kind.is_container(),
        };
        if !ok {
            return Err(ZiError::mismatch(expected, h.kind, self.pos));
        }
        enforce_len_limits(h, self.limits, self.pos)?;
        ensure_room(self.data, h, self.pos)?;
        Ok((h.arg_len(), self.at_offset(h.body)))
    }

    /// Returns the element count of an array or the pair count of a map.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` for any other kind, or a length-limit error when the declared count
    /// exceeds this view's limits.
    pub fn len(self) -> Result<usize, ZiError> {
        self.container(Expected::Container).map(|(n, _)| n)
    }

    /// Returns whether an array or map has no entries.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` for any other kind.
    pub fn is_empty(self) -> Result<bool, ZiError> {
        self.len().map(|n| n == 0)
    }

    /// Iterates over the elements of an array.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the value is not an array.
    pub fn elements(self) -> Result<ArrayIter<'a>, ZiError> {
        let (len, first) = self.container(Expected::Kind(ZiKind::Array))?;
        Ok(ArrayIter::new(first, len))
    }

    /// Iterates over the `(key, value)` pairs of a map in wire order.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the value is not a map.
    pub fn items(self) -> Result<MapIter<'a>, ZiError> {
        let (len, first) = self.container(Expected::Kind(ZiKind::Map))?;
        Ok(MapIter::new(first, len))
    }

    /// Returns the array element at `index`, or `None` if out of bounds.
    ///
    /// Walks every preceding sibling.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the value is not an array, or the first malformed-input error
    /// met while skipping siblings.
    pub fn get_index(self, index: usize) -> Result<Option<Self>, ZiError> {
        let (len, mut cur) = self.container(Expected::Kind(ZiKind::Array))?;
        if index >= len {
            return Ok(None);
        }
        for _ in 0..index {
            cur = cur.next()?;
        }
        Ok(Some(cur))
    }

    /// Returns the value stored under the string key `key`, or `None` if absent.
    ///
    /// Non-string keys are skipped without being decoded. The first matching entry wins.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the value is not a map, or the first malformed-input error met
    /// while scanning entries.
    pub fn get_key(self, key: &str) -> Result<Option<Self>, ZiError> {
        for entry in self.items()? {
            let (k, v) = entry?;
            if k.is_str() && k.get_str()? == key {
                return Ok(Some(v));
            }
        }
        Ok(None)
    }

    /// Returns the value stored under a key equal to `key`, or `None` if absent.
    ///
    /// Each key is materialized and compared structurally, so keys of any kind can be matched.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the value is not a map, or the first malformed-input error met
    /// while scanning entries.
    #[cfg(feature = "alloc")]
    #[cfg_attr(docsrs, doc(cfg(feature = "alloc")))]
    pub fn get_key_value(self, key: &ZiValue) -> Result<Option<Self>, ZiError> {
        for entry in self.items()? {
            let (k, v) = entry?;
            if k.get()? == *key {
                return Ok(Some(v));
            }
        }
        Ok(None)
    }

    /// Traverses a nested path starting from this value.
    ///
    /// Returns `Ok(None)` if any map key is missing or any array index is out of bounds.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` when a step meets the wrong container kind, or a malformed-input
    /// error.
    pub fn at(self, path: &[PathElem<'_>]) -> Result<Option<Self>, ZiError> {
        let mut cur = self;
        for pe in path {
            let step = match *pe {
                PathElem::Key(k) => cur.get_key(k)?,
                PathElem::Index(i) => cur.get_index(i)?,
            };
            match step {
                Some(v) => cur = v,
                None => return Ok(None),
            }
        }
        Ok(Some(cur))
    }
}
