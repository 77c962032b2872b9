use crate::decoder::Decoder;
use crate::head::{payload, read_header, Header, ZiKind};
use crate::{DecodeLimits, ErrorCode, ZiError};

#[cfg(feature = "alloc")]
use crate::alloc_util::try_reserve;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

#[cfg(not(feature = "alloc"))]
use crate::limits::DEFAULT_MAX_DEPTH;

#[cfg(feature = "alloc")]
const INLINE_FRAMES: usize = 64;
#[cfg(not(feature = "alloc"))]
const INLINE_FRAMES: usize = DEFAULT_MAX_DEPTH + 2;

/// Validate that `bytes` hold exactly one well-formed ZiProto value and return its root view.
///
/// String payloads are checked for UTF-8 along the way.
///
/// # Errors
///
/// Returns an error if the input exceeds `limits`, contains a malformed or truncated value,
/// or has trailing bytes after the value.
pub fn validate(bytes: &[u8], limits: DecodeLimits) -> Result<Decoder<'_>, ZiError> {
    if bytes.len() > limits.max_input_bytes {
        return Err(ZiError::new(ErrorCode::MessageLenLimitExceeded, 0));
    }
    let end = Walker::new(bytes, limits, true).skip(0)?;
    if end != bytes.len() {
        return Err(ZiError::new(ErrorCode::TrailingBytes, end));
    }
    Ok(Decoder::from_parts(bytes, 0, limits))
}

/// Returns the offset just past the value starting at `start`.
pub fn value_end(data: &[u8], start: usize, limits: DecodeLimits) -> Result<usize, ZiError> {
    Walker::new(data, limits, false).skip(start)
}

/// Checks a declared container count against the bytes left after its header.
///
/// Every element occupies at least one byte, so a count larger than the remainder can never be
/// satisfied.
#[inline]
pub fn ensure_room(data: &[u8], h: Header, off: usize) -> Result<usize, ZiError> {
    let n = h.arg_len();
    let items = if h.kind == ZiKind::Map {
        n.checked_mul(2)
            .ok_or_else(|| ZiError::new(ErrorCode::LengthOverflow, off))?
    } else {
        n
    };
    if items > data.len().saturating_sub(h.body) {
        return Err(ZiError::underrun(off));
    }
    Ok(items)
}

/// Enforces the per-header length limits shared by the walker and the materializer.
#[inline]
pub fn enforce_len_limits(h: Header, limits: DecodeLimits, off: usize) -> Result<(), ZiError> {
    let (max, code) = match h.kind {
        ZiKind::Str => (limits.max_str_len, ErrorCode::StrLenLimitExceeded),
        ZiKind::Bin => (limits.max_bin_len, ErrorCode::BinLenLimitExceeded),
        ZiKind::Array => (limits.max_array_len, ErrorCode::ArrayLenLimitExceeded),
        ZiKind::Map => (limits.max_map_len, ErrorCode::MapLenLimitExceeded),
        _ => return Ok(()),
    };
    if h.arg_len() > max {
        return Err(ZiError::new(code, off));
    }
    Ok(())
}

struct Walker<'a> {
    data: &'a [u8],
    limits: DecodeLimits,
    check_utf8: bool,
    items_seen: usize,
}

impl<'a> Walker<'a> {
    const fn new(data: &'a [u8], limits: DecodeLimits, check_utf8: bool) -> Self {
        Self {
            data,
            limits,
            check_utf8,
            items_seen: 0,
        }
    }

    fn bump_items(&mut self, add: usize, off: usize) -> Result<(), ZiError> {
        self.items_seen = self
            .items_seen
            .checked_add(add)
            .ok_or_else(|| ZiError::new(ErrorCode::LengthOverflow, off))?;
        if self.items_seen > self.limits.max_total_items {
            return Err(ZiError::new(ErrorCode::TotalItemsLimitExceeded, off));
        }
        Ok(())
    }

    /// Skips one value. The stack holds the number of values still owed by each open container;
    /// the bottom frame stands for the single root value.
    fn skip(&mut self, start: usize) -> Result<usize, ZiError> {
        let mut pos = start;
        let mut stack = SmallStack::<INLINE_FRAMES>::new();
        stack.push(1, start)?;

        while let Some(remaining) = stack.peek_mut() {
            if *remaining == 0 {
                stack.pop();
                continue;
            }
            *remaining -= 1;

            let off = pos;
            let h = read_header(self.data, pos)?;
            enforce_len_limits(h, self.limits, off)?;

            match h.kind {
                ZiKind::Str | ZiKind::Bin => {
                    let body = payload(self.data, h, off)?;
                    if self.check_utf8 && h.kind == ZiKind::Str {
                        crate::utf8::validate(body, off)?;
                    }
                    pos = h.body + body.len();
                }
                ZiKind::Array | ZiKind::Map => {
                    let items = ensure_room(self.data, h, off)?;
                    self.bump_items(items, off)?;
                    if stack.depth() > self.limits.max_depth {
                        return Err(ZiError::new(ErrorCode::DepthLimitExceeded, off));
                    }
                    pos = h.body;
                    if items > 0 {
                        stack.push(items, off)?;
                    }
                }
                _ => pos = h.body,
            }
        }

        Ok(pos)
    }
}

struct SmallStack<const N: usize> {
    inline: [usize; N],
    len: usize,
    #[cfg(feature = "alloc")]
    overflow: Vec<usize>,
}

impl<const N: usize> SmallStack<N> {
    const fn new() -> Self {
        Self {
            inline: [0; N],
            len: 0,
            #[cfg(feature = "alloc")]
            overflow: Vec::new(),
        }
    }

    fn depth(&self) -> usize {
        #[cfg(feature = "alloc")]
        {
            self.len + self.overflow.len()
        }
        #[cfg(not(feature = "alloc"))]
        {
            self.len
        }
    }

    fn push(&mut self, value: usize, off: usize) -> Result<(), ZiError> {
        #[cfg(feature = "alloc")]
        {
            if !self.overflow.is_empty() {
                try_reserve(&mut self.overflow, 1, off)?;
                self.overflow.push(value);
                return Ok(());
            }
        }

        if self.len < N {
            self.inline[self.len] = value;
            self.len += 1;
            return Ok(());
        }

        #[cfg(feature = "alloc")]
        {
            try_reserve(&mut self.overflow, 1, off)?;
            self.overflow.push(value);
            Ok(())
        }

        #[cfg(not(feature = "alloc"))]
        {
            Err(ZiError::new(ErrorCode::DepthLimitExceeded, off))
        }
    }

    fn peek_mut(&mut self) -> Option<&mut usize> {
        #[cfg(feature = "alloc")]
        {
            if let Some(v) = self.overflow.last_mut() {
                return Some(v);
            }
        }
        if self.len == 0 {
            None
        } else {
            Some(&mut self.inline[self.len - 1])
        }
    }

    fn pop(&mut self) -> Option<usize> {
        #[cfg(feature = "alloc")]
        {
            if let Some(v) = self.overflow.pop() {
                return Some(v);
            }
        }
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            Some(self.inline[self.len])
        }
    }
}
