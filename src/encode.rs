use alloc::vec::Vec;

use crate::alloc_util::try_reserve;
use crate::decoder::Decoder;
use crate::int::ZiInteger;
use crate::limits::DEFAULT_MAX_DEPTH;
use crate::value::ZiValue;
use crate::{ErrorCode, ZiError};

trait Sink {
    fn write(&mut self, bytes: &[u8]) -> Result<(), ZiError>;

    fn write_u8(&mut self, byte: u8) -> Result<(), ZiError> {
        self.write(&[byte])
    }

    fn position(&self) -> usize;
}

struct VecSink {
    buf: Vec<u8>,
}

impl VecSink {
    const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    fn with_capacity(capacity: usize) -> Self {
        let mut buf = Vec::new();
        let _ = buf.try_reserve(capacity);
        Self { buf }
    }

    #[inline]
    fn reserve(&mut self, additional: usize) -> Result<(), ZiError> {
        let available = self.buf.capacity().saturating_sub(self.buf.len());
        if additional <= available {
            return Ok(());
        }
        let offset = self.buf.len();
        try_reserve(&mut self.buf, additional, offset)
    }
}

impl Sink for VecSink {
    fn write(&mut self, bytes: &[u8]) -> Result<(), ZiError> {
        self.reserve(bytes.len())?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    fn write_u8(&mut self, byte: u8) -> Result<(), ZiError> {
        if self.buf.len() == self.buf.capacity() {
            self.reserve(1)?;
        }
        self.buf.push(byte);
        Ok(())
    }

    fn position(&self) -> usize {
        self.buf.len()
    }
}

fn err_at<S: Sink>(sink: &S, code: ErrorCode) -> ZiError {
    ZiError::new(code, sink.position())
}

fn head_with<S: Sink, const N: usize>(
    sink: &mut S,
    head: u8,
    arg: [u8; N],
) -> Result<(), ZiError> {
    let mut buf = [0u8; 9];
    buf[0] = head;
    buf[1..=N].copy_from_slice(&arg);
    sink.write(&buf[..=N])
}

fn encode_uint<S: Sink>(sink: &mut S, v: u64) -> Result<(), ZiError> {
    if let Ok(v8) = u8::try_from(v) {
        if v8 <= 0x7f {
            // positive fixint
            return sink.write_u8(v8);
        }
        return head_with(sink, 0xcc, [v8]);
    }
    if let Ok(v16) = u16::try_from(v) {
        return head_with(sink, 0xcd, v16.to_be_bytes());
    }
    if let Ok(v32) = u32::try_from(v) {
        return head_with(sink, 0xce, v32.to_be_bytes());
    }
    head_with(sink, 0xcf, v.to_be_bytes())
}

fn encode_int<S: Sink>(sink: &mut S, v: i64) -> Result<(), ZiError> {
    if let Ok(u) = u64::try_from(v) {
        return encode_uint(sink, u);
    }
    if v >= -32 {
        // negative fixint
        return sink.write_u8(v.to_be_bytes()[7]);
    }
    if let Ok(v8) = i8::try_from(v) {
        return head_with(sink, 0xd0, v8.to_be_bytes());
    }
    if let Ok(v16) = i16::try_from(v) {
        return head_with(sink, 0xd1, v16.to_be_bytes());
    }
    if let Ok(v32) = i32::try_from(v) {
        return head_with(sink, 0xd2, v32.to_be_bytes());
    }
    head_with(sink, 0xd3, v.to_be_bytes())
}

/// Writes a length header: the fix form when `fix` is set and `len` fits under it, then the
/// 8/16/32-bit forms from `wide` (0 marks a missing form).
fn encode_len<S: Sink>(
    sink: &mut S,
    len: usize,
    fix: Option<(u8, usize)>,
    wide: [u8; 3],
) -> Result<(), ZiError> {
    let n = u32::try_from(len).map_err(|_| err_at(sink, ErrorCode::LengthOverflow))?;
    if let (Some((base, limit)), Ok(n8)) = (fix, u8::try_from(n)) {
        if usize::from(n8) < limit {
            return sink.write_u8(base | n8);
        }
    }
    if wide[0] != 0 {
        if let Ok(n8) = u8::try_from(n) {
            return head_with(sink, wide[0], [n8]);
        }
    }
    if let Ok(n16) = u16::try_from(n) {
        return head_with(sink, wide[1], n16.to_be_bytes());
    }
    head_with(sink, wide[2], n.to_be_bytes())
}

fn encode_str<S: Sink>(sink: &mut S, s: &str) -> Result<(), ZiError> {
    let b = s.as_bytes();
    encode_len(sink, b.len(), Some((0xa0, 32)), [0xd9, 0xda, 0xdb])?;
    sink.write(b)
}

fn encode_bin<S: Sink>(sink: &mut S, b: &[u8]) -> Result<(), ZiError> {
    encode_len(sink, b.len(), None, [0xc4, 0xc5, 0xc6])?;
    sink.write(b)
}

fn array_header<S: Sink>(sink: &mut S, len: usize) -> Result<(), ZiError> {
    encode_len(sink, len, Some((0x90, 16)), [0, 0xdc, 0xdd])
}

fn map_header<S: Sink>(sink: &mut S, len: usize) -> Result<(), ZiError> {
    encode_len(sink, len, Some((0x80, 16)), [0, 0xde, 0xdf])
}

/// Encode a [`ZiValue`] into a fresh buffer using the smallest form for every header.
///
/// # Errors
///
/// Returns `DepthLimitExceeded` past [`DEFAULT_MAX_DEPTH`] nested containers, `LengthOverflow` if a
/// length exceeds `u32::MAX`, or `AllocationFailed`.
pub fn encode(value: &ZiValue) -> Result<Vec<u8>, ZiError> {
    let mut enc = Encoder::new();
    enc.value(value)?;
    Ok(enc.into_vec())
}

/// Streaming encoder that writes ZiProto directly into a `Vec<u8>`.
///
/// Every integer and length uses its smallest wire form. Floats passed to [`Encoder::float`] are
/// always written as binary64.
pub struct Encoder {
    sink: VecSink,
}

impl Encoder {
    /// Create a new encoder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sink: VecSink::new(),
        }
    }

    /// Create an encoder with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sink: VecSink::with_capacity(capacity),
        }
    }

    /// Return the number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sink.buf.len()
    }

    /// Returns `true` if no bytes have been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sink.buf.is_empty()
    }

    /// Consume and return the encoded bytes.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.sink.buf
    }

    /// Borrow the bytes emitted so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.sink.buf
    }

    /// Encode `nil`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the underlying buffer fails.
    pub fn nil(&mut self) -> Result<(), ZiError> {
        self.sink.write_u8(0xc0)
    }

    /// Encode a boolean.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the underlying buffer fails.
    pub fn bool(&mut self, v: bool) -> Result<(), ZiError> {
        self.sink.write_u8(if v { 0xc3 } else { 0xc2 })
    }

    /// Encode a signed integer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the underlying buffer fails.
    pub fn int(&mut self, v: i64) -> Result<(), ZiError> {
        encode_int(&mut self.sink, v)
    }

    /// Encode an unsigned integer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the underlying buffer fails.
    pub fn uint(&mut self, v: u64) -> Result<(), ZiError> {
        encode_uint(&mut self.sink, v)
    }

    /// Encode an integer of either sign.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the underlying buffer fails.
    pub fn integer(&mut self, v: ZiInteger) -> Result<(), ZiError> {
        match v.as_u64() {
            Some(u) => self.uint(u),
            None => match v.as_i64() {
                Some(i) => self.int(i),
                None => Err(err_at(&self.sink, ErrorCode::IntegerOverflow)),
            },
        }
    }

    /// Encode a binary64 float.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the underlying buffer fails.
    pub fn float(&mut self, v: f64) -> Result<(), ZiError> {
        head_with(&mut self.sink, 0xcb, v.to_be_bytes())
    }

    /// Encode a binary32 float.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the underlying buffer fails.
    pub fn float32(&mut self, v: f32) -> Result<(), ZiError> {
        head_with(&mut self.sink, 0xca, v.to_be_bytes())
    }

    /// Encode a string.
    ///
    /// # Errors
    ///
    /// Returns `LengthOverflow` above `u32::MAX` bytes, or a write error.
    pub fn str(&mut self, s: &str) -> Result<(), ZiError> {
        encode_str(&mut self.sink, s)
    }

    /// Encode a binary blob.
    ///
    /// # Errors
    ///
    /// Returns `LengthOverflow` above `u32::MAX` bytes, or a write error.
    pub fn bin(&mut self, b: &[u8]) -> Result<(), ZiError> {
        encode_bin(&mut self.sink, b)
    }

    /// Splice the encoded bytes of an existing value verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if the source value is malformed or writing fails.
    pub fn raw(&mut self, v: Decoder<'_>) -> Result<(), ZiError> {
        let bytes = v.get_bytes()?;
        self.sink.write(bytes)
    }

    /// Encode an owned value tree.
    ///
    /// Nesting is bounded by [`DEFAULT_MAX_DEPTH`], the same bound decoding applies by default.
    ///
    /// # Errors
    ///
    /// Returns `DepthLimitExceeded` for deeper trees, `LengthOverflow` if a length exceeds
    /// `u32::MAX`, or a write error.
    pub fn value(&mut self, v: &ZiValue) -> Result<(), ZiError> {
        self.value_at(v, 0)
    }

    /// `depth` counts the containers enclosing `v`.
    fn value_at(&mut self, v: &ZiValue, depth: usize) -> Result<(), ZiError> {
        match v {
            ZiValue::Nil => self.nil(),
            ZiValue::Bool(b) => self.bool(*b),
            ZiValue::Int(i) => self.integer(*i),
            ZiValue::Float(f) => self.float(*f),
            ZiValue::Str(s) => self.str(s),
            ZiValue::Bin(b) => self.bin(b),
            ZiValue::Array(_) | ZiValue::Map(_) if depth >= DEFAULT_MAX_DEPTH => {
                Err(err_at(&self.sink, ErrorCode::DepthLimitExceeded))
            }
            ZiValue::Array(items) => self.array(items.len(), |a| {
                for item in items {
                    a.consume_one()?.value_at(item, depth + 1)?;
                }
                Ok(())
            }),
            ZiValue::Map(entries) => self.map(entries.len(), |m| {
                for (k, val) in entries {
                    m.write_entry(|e| e.value_at(k, depth + 1), |e| e.value_at(val, depth + 1))?;
                }
                Ok(())
            }),
        }
    }

    /// Encode an array of `len` elements and fill it via the provided builder.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or if the builder emits a different number of items.
    /// The output is left as it was before the call.
    pub fn array<F>(&mut self, len: usize, f: F) -> Result<(), ZiError>
    where
        F: FnOnce(&mut ArrayEncoder<'_>) -> Result<(), ZiError>,
    {
        let start = self.sink.buf.len();
        if let Err(err) = array_header(&mut self.sink, len) {
            self.sink.buf.truncate(start);
            return Err(err);
        }
        let mut a = ArrayEncoder {
            enc: self,
            remaining: len,
        };
        if let Err(err) = f(&mut a) {
            self.sink.buf.truncate(start);
            return Err(err);
        }
        if a.remaining != 0 {
            let err = err_at(&self.sink, ErrorCode::ArrayLenMismatch);
            self.sink.buf.truncate(start);
            return Err(err);
        }
        Ok(())
    }

    /// Encode a map of `len` entries and fill it via the provided builder.
    ///
    /// Entries are written in the order given; keys are neither sorted nor deduplicated.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or if the builder emits a different number of entries.
    /// The output is left as it was before the call.
    pub fn map<F>(&mut self, len: usize, f: F) -> Result<(), ZiError>
    where
        F: FnOnce(&mut MapEncoder<'_>) -> Result<(), ZiError>,
    {
        let start = self.sink.buf.len();
        if let Err(err) = map_header(&mut self.sink, len) {
            self.sink.buf.truncate(start);
            return Err(err);
        }
        let mut m = MapEncoder {
            enc: self,
            remaining: len,
        };
        if let Err(err) = f(&mut m) {
            self.sink.buf.truncate(start);
            return Err(err);
        }
        if m.remaining != 0 {
            let err = err_at(&self.sink, ErrorCode::MapLenMismatch);
            self.sink.buf.truncate(start);
            return Err(err);
        }
        Ok(())
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for writing array elements.
pub struct ArrayEncoder<'a> {
    enc: &'a mut Encoder,
    remaining: usize,
}

#[allow(missing_docs)]
impl ArrayEncoder<'_> {
    fn consume_one(&mut self) -> Result<&mut Encoder, ZiError> {
        if self.remaining == 0 {
            return Err(err_at(&self.enc.sink, ErrorCode::ArrayLenMismatch));
        }
        self.remaining -= 1;
        Ok(&mut *self.enc)
    }

    /// Returns how many elements are still owed.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn nil(&mut self) -> Result<(), ZiError> {
        self.consume_one()?.nil()
    }

    pub fn bool(&mut self, v: bool) -> Result<(), ZiError> {
        self.consume_one()?.bool(v)
    }

    pub fn int(&mut self, v: i64) -> Result<(), ZiError> {
        self.consume_one()?.int(v)
    }

    pub fn uint(&mut self, v: u64) -> Result<(), ZiError> {
        self.consume_one()?.uint(v)
    }

    pub fn integer(&mut self, v: ZiInteger) -> Result<(), ZiError> {
        self.consume_one()?.integer(v)
    }

    pub fn float(&mut self, v: f64) -> Result<(), ZiError> {
        self.consume_one()?.float(v)
    }

    pub fn float32(&mut self, v: f32) -> Result<(), ZiError> {
        self.consume_one()?.float32(v)
    }

    pub fn str(&mut self, s: &str) -> Result<(), ZiError> {
        self.consume_one()?.str(s)
    }

    pub fn bin(&mut self, b: &[u8]) -> Result<(), ZiError> {
        self.consume_one()?.bin(b)
    }

    pub fn raw(&mut self, v: Decoder<'_>) -> Result<(), ZiError> {
        self.consume_one()?.raw(v)
    }

    pub fn value(&mut self, v: &ZiValue) -> Result<(), ZiError> {
        self.consume_one()?.value(v)
    }

    /// Encode a nested array.
    ///
    /// # Errors
    ///
    /// Returns an error if the array length is exceeded or if encoding fails.
    pub fn array<F>(&mut self, len: usize, f: F) -> Result<(), ZiError>
    where
        F: FnOnce(&mut ArrayEncoder<'_>) -> Result<(), ZiError>,
    {
        self.consume_one()?.array(len, f)
    }

    /// Encode a nested map.
    ///
    /// # Errors
    ///
    /// Returns an error if the array length is exceeded or if encoding fails.
    pub fn map<F>(&mut self, len: usize, f: F) -> Result<(), ZiError>
    where
        F: FnOnce(&mut MapEncoder<'_>) -> Result<(), ZiError>,
    {
        self.consume_one()?.map(len, f)
    }
}

/// Builder for writing map entries.
pub struct MapEncoder<'a> {
    enc: &'a mut Encoder,
    remaining: usize,
}

impl MapEncoder<'_> {
    fn write_entry<K, F>(&mut self, write_key: K, f: F) -> Result<(), ZiError>
    where
        K: FnOnce(&mut Encoder) -> Result<(), ZiError>,
        F: FnOnce(&mut Encoder) -> Result<(), ZiError>,
    {
        if self.remaining == 0 {
            return Err(err_at(&self.enc.sink, ErrorCode::MapLenMismatch));
        }
        let entry_start = self.enc.sink.buf.len();
        if let Err(err) = write_key(self.enc) {
            return self.fail_entry(entry_start, err);
        }
        if let Err(err) = f(self.enc) {
            return self.fail_entry(entry_start, err);
        }
        self.remaining -= 1;
        Ok(())
    }

    fn fail_entry<T>(&mut self, entry_start: usize, err: ZiError) -> Result<T, ZiError> {
        self.enc.sink.buf.truncate(entry_start);
        Err(err)
    }

    /// Returns how many entries are still owed.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.remaining
    }

    /// Insert an entry with a string key. The value is written by `f`, which must emit exactly
    /// one value.
    ///
    /// # Errors
    ///
    /// Returns an error if the map length is exceeded or if encoding fails.
    pub fn entry<F>(&mut self, key: &str, f: F) -> Result<(), ZiError>
    where
        F: FnOnce(&mut Encoder) -> Result<(), ZiError>,
    {
        self.write_entry(|e| e.str(key), f)
    }

    /// Insert an entry with a key of any kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the map length is exceeded or if encoding fails.
    pub fn entry_value<F>(&mut self, key: &ZiValue, f: F) -> Result<(), ZiError>
    where
        F: FnOnce(&mut Encoder) -> Result<(), ZiError>,
    {
        self.write_entry(|e| e.value(key), f)
    }

    /// Insert an entry whose key is written by `k`.
    ///
    /// # Errors
    ///
    /// Returns an error if the map length is exceeded or if encoding fails.
    pub fn entry_with<K, F>(&mut self, k: K, f: F) -> Result<(), ZiError>
    where
        K: FnOnce(&mut Encoder) -> Result<(), ZiError>,
        F: FnOnce(&mut Encoder) -> Result<(), ZiError>,
    {
        self.write_entry(k, f)
    }
}
