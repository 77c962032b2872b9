//! The static head-byte table.
//!
//! Every ZiProto value starts with one head byte. [`head_of`] maps that byte to the semantic
//! [`ZiKind`] and to a parser that decodes the rest of the header: either the scalar itself or the
//! payload length/element count. The table is a `static` built by a `const fn`, so dispatch is a
//! single indexed load.

use core::fmt;

use crate::{ErrorCode, ZiError};

/// The data model of the ZiProto format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZiKind {
    /// `nil`.
    Nil,
    /// `true` / `false`.
    Bool,
    /// Signed or unsigned integer up to 64 bits.
    Int,
    /// IEEE-754 binary32 or binary64.
    Float,
    /// UTF-8 string.
    Str,
    /// Opaque byte string.
    Bin,
    /// Ordered sequence of values.
    Array,
    /// Ordered sequence of key/value pairs.
    Map,
}

impl ZiKind {
    /// Lowercase name used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Bin => "bin",
            Self::Array => "array",
            Self::Map => "map",
        }
    }

    /// Returns true for `Array` and `Map`.
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Array | Self::Map)
    }
}

impl fmt::Display for ZiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The decoded header argument: a scalar value, or a payload length / element count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arg {
    None,
    Bool(bool),
    Uint(u64),
    Int(i64),
    Float(f64),
    Len(usize),
}

/// Header parser: `(head, bytes after head, offset of head)` to `(arg, header bytes consumed)`.
pub type ParseHead = fn(u8, &[u8], usize) -> Result<(Arg, usize), ZiError>;

#[derive(Clone, Copy)]
pub struct Head {
    pub kind: Option<ZiKind>,
    pub parse: ParseHead,
}

impl Head {
    const fn new(kind: ZiKind, parse: ParseHead) -> Self {
        Self {
            kind: Some(kind),
            parse,
        }
    }

    const UNASSIGNED: Self = Self {
        kind: None,
        parse: unassigned,
    };
}

static HEADS: [Head; 256] = build_table();

/// Returns the table entry for `b`.
#[inline]
pub fn head_of(b: u8) -> Head {
    HEADS[usize::from(b)]
}

#[allow(clippy::cast_possible_truncation)]
const fn build_table() -> [Head; 256] {
    let mut table = [Head::UNASSIGNED; 256];
    let mut i = 0usize;
    while i < 256 {
        table[i] = head_for(i as u8);
        i += 1;
    }
    table
}

const fn head_for(b: u8) -> Head {
    match b {
        0x00..=0x7f => Head::new(ZiKind::Int, fix_uint),
        0x80..=0x8f => Head::new(ZiKind::Map, fix_len4),
        0x90..=0x9f => Head::new(ZiKind::Array, fix_len4),
        0xa0..=0xbf => Head::new(ZiKind::Str, fix_len5),
        0xc0 => Head::new(ZiKind::Nil, nil),
        0xc2 | 0xc3 => Head::new(ZiKind::Bool, boolean),
        0xc4 | 0xd9 => Head::new(if b == 0xc4 { ZiKind::Bin } else { ZiKind::Str }, len8),
        0xc5 | 0xda => Head::new(if b == 0xc5 { ZiKind::Bin } else { ZiKind::Str }, len16),
        0xc6 | 0xdb => Head::new(if b == 0xc6 { ZiKind::Bin } else { ZiKind::Str }, len32),
        0xca => Head::new(ZiKind::Float, float32),
        0xcb => Head::new(ZiKind::Float, float64),
        0xcc => Head::new(ZiKind::Int, uint8),
        0xcd => Head::new(ZiKind::Int, uint16),
        0xce => Head::new(ZiKind::Int, uint32),
        0xcf => Head::new(ZiKind::Int, uint64),
        0xd0 => Head::new(ZiKind::Int, int8),
        0xd1 => Head::new(ZiKind::Int, int16),
        0xd2 => Head::new(ZiKind::Int, int32),
        0xd3 => Head::new(ZiKind::Int, int64),
        0xdc => Head::new(ZiKind::Array, len16),
        0xdd => Head::new(ZiKind::Array, len32),
        0xde => Head::new(ZiKind::Map, len16),
        0xdf => Head::new(ZiKind::Map, len32),
        0xe0..=0xff => Head::new(ZiKind::Int, fix_neg),
        // 0xc1 is never used; 0xc7..=0xc9 and 0xd4..=0xd8 are ext types.
        _ => Head::UNASSIGNED,
    }
}

#[inline]
fn take<const N: usize>(rest: &[u8], off: usize) -> Result<[u8; N], ZiError> {
    let s = rest.get(..N).ok_or_else(|| ZiError::underrun(off))?;
    let mut out = [0u8; N];
    out.copy_from_slice(s);
    Ok(out)
}

#[inline]
fn to_len(n: u32, off: usize) -> Result<usize, ZiError> {
    usize::try_from(n).map_err(|_| ZiError::new(ErrorCode::LengthOverflow, off))
}

fn unassigned(b: u8, _: &[u8], off: usize) -> Result<(Arg, usize), ZiError> {
    Err(ZiError::new(ErrorCode::UnknownHead(b), off))
}

fn nil(_: u8, _: &[u8], _: usize) -> Result<(Arg, usize), ZiError> {
    Ok((Arg::None, 0))
}

fn boolean(b: u8, _: &[u8], _: usize) -> Result<(Arg, usize), ZiError> {
    Ok((Arg::Bool(b == 0xc3), 0))
}

fn fix_uint(b: u8, _: &[u8], _: usize) -> Result<(Arg, usize), ZiError> {
    Ok((Arg::Uint(u64::from(b)), 0))
}

fn fix_neg(b: u8, _: &[u8], _: usize) -> Result<(Arg, usize), ZiError> {
    Ok((Arg::Int(i64::from(i8::from_be_bytes([b]))), 0))
}

fn fix_len4(b: u8, _: &[u8], _: usize) -> Result<(Arg, usize), ZiError> {
    Ok((Arg::Len(usize::from(b & 0x0f)), 0))
}

fn fix_len5(b: u8, _: &[u8], _: usize) -> Result<(Arg, usize), ZiError> {
    Ok((Arg::Len(usize::from(b & 0x1f)), 0))
}

fn len8(_: u8, rest: &[u8], off: usize) -> Result<(Arg, usize), ZiError> {
    let [n] = take::<1>(rest, off)?;
    Ok((Arg::Len(usize::from(n)), 1))
}

fn len16(_: u8, rest: &[u8], off: usize) -> Result<(Arg, usize), ZiError> {
    let n = u16::from_be_bytes(take(rest, off)?);
    Ok((Arg::Len(usize::from(n)), 2))
}

fn len32(_: u8, rest: &[u8], off: usize) -> Result<(Arg, usize), ZiError> {
    let n = u32::from_be_bytes(take(rest, off)?);
    Ok((Arg::Len(to_len(n, off)?), 4))
}

fn uint8(_: u8, rest: &[u8], off: usize) -> Result<(Arg, usize), ZiError> {
    let [n] = take::<1>(rest, off)?;
    Ok((Arg::Uint(u64::from(n)), 1))
}

fn uint16(_: u8, rest: &[u8], off: usize) -> Result<(Arg, usize), ZiError> {
    Ok((Arg::Uint(u64::from(u16::from_be_bytes(take(rest, off)?))), 2))
}

fn uint32(_: u8, rest: &[u8], off: usize) -> Result<(Arg, usize), ZiError> {
    Ok((Arg::Uint(u64::from(u32::from_be_bytes(take(rest, off)?))), 4))
}

fn uint64(_: u8, rest: &[u8], off: usize) -> Result<(Arg, usize), ZiError> {
    Ok((Arg::Uint(u64::from_be_bytes(take(rest, off)?)), 8))
}

fn int8(_: u8, rest: &[u8], off: usize) -> Result<(Arg, usize), ZiError> {
    Ok((Arg::Int(i64::from(i8::from_be_bytes(take(rest, off)?))), 1))
}

fn int16(_: u8, rest: &[u8], off: usize) -> Result<(Arg, usize), ZiError> {
    Ok((Arg::Int(i64::from(i16::from_be_bytes(take(rest, off)?))), 2))
}

fn int32(_: u8, rest: &[u8], off: usize) -> Result<(Arg, usize), ZiError> {
    Ok((Arg::Int(i64::from(i32::from_be_bytes(take(rest, off)?))), 4))
}

fn int64(_: u8, rest: &[u8], off: usize) -> Result<(Arg, usize), ZiError> {
    Ok((Arg::Int(i64::from_be_bytes(take(rest, off)?)), 8))
}

fn float32(_: u8, rest: &[u8], off: usize) -> Result<(Arg, usize), ZiError> {
    let v = f32::from_be_bytes(take(rest, off)?);
    Ok((Arg::Float(f64::from(v)), 4))
}

fn float64(_: u8, rest: &[u8], off: usize) -> Result<(Arg, usize), ZiError> {
    Ok((Arg::Float(f64::from_be_bytes(take(rest, off)?)), 8))
}

/// A fully parsed header: the head's kind, its argument, and where the payload begins.
#[derive(Debug, Clone, Copy)]
pub struct Header {
    pub kind: ZiKind,
    pub arg: Arg,
    pub body: usize,
}

impl Header {
    /// Payload length for `Str`/`Bin`, element count for `Array`, pair count for `Map`.
    #[inline]
    pub const fn arg_len(self) -> usize {
        match self.arg {
            Arg::Len(n) => n,
            _ => 0,
        }
    }
}

/// Parses the header of the value starting at `data[pos]`.
///
/// # Errors
///
/// `BufferUnderrun` when `pos` is at or past the end or the header is truncated,
/// `UnknownHead` for unassigned head bytes.
pub fn read_header(data: &[u8], pos: usize) -> Result<Header, ZiError> {
    let b = *data.get(pos).ok_or_else(|| ZiError::underrun(pos))?;
    let head = head_of(b);
    let rest = &data[pos + 1..];
    let (arg, used) = (head.parse)(b, rest, pos)?;
    let kind = head
        .kind
        .ok_or_else(|| ZiError::new(ErrorCode::UnknownHead(b), pos))?;
    Ok(Header {
        kind,
        arg,
        body: pos + 1 + used,
    })
}

/// Returns the payload slice of a `Str`/`Bin` header, bounds-checked against `data`.
pub fn payload<'a>(data: &'a [u8], h: Header, off: usize) -> Result<&'a [u8], ZiError> {
    let end = h
        .body
        .checked_add(h.arg_len())
        .ok_or_else(|| ZiError::new(ErrorCode::LengthOverflow, off))?;
    data.get(h.body..end).ok_or_else(|| ZiError::underrun(off))
}
