use alloc::vec::Vec;

use crate::alloc_util::{
    try_reserve, try_string_from_str, try_vec_from_slice, try_vec_with_capacity,
};
use crate::head::{payload, read_header, Arg, ZiKind};
use crate::int::ZiInteger;
use crate::value::ZiValue;
use crate::walk::{enforce_len_limits, ensure_room};
use crate::{DecodeLimits, ErrorCode, ZiError};

/// Decode ZiProto bytes holding exactly one value into an owned [`ZiValue`].
///
/// Reports the same error codes and offsets as [`validate`](crate::validate).
///
/// # Errors
///
/// Returns an error if the input exceeds `limits`, is malformed or truncated, has trailing bytes,
/// or if allocation fails while building the value.
pub fn decode_value(bytes: &[u8], limits: DecodeLimits) -> Result<ZiValue, ZiError> {
    if bytes.len() > limits.max_input_bytes {
        return Err(ZiError::new(ErrorCode::MessageLenLimitExceeded, 0));
    }
    let (value, end) = materialize(bytes, 0, limits)?;
    if end != bytes.len() {
        return Err(ZiError::new(ErrorCode::TrailingBytes, end));
    }
    Ok(value)
}

enum Frame {
    Array {
        items: Vec<ZiValue>,
        remaining: usize,
    },
    Map {
        entries: Vec<(ZiValue, ZiValue)>,
        key: Option<ZiValue>,
        remaining: usize,
    },
}

/// Builds the value starting at `start` and returns it with the offset just past it.
pub fn materialize(
    data: &[u8],
    start: usize,
    limits: DecodeLimits,
) -> Result<(ZiValue, usize), ZiError> {
    let mut pos = start;
    let mut items_seen = 0usize;
    let mut stack: Vec<Frame> = Vec::new();

    loop {
        let off = pos;
        let h = read_header(data, pos)?;
        enforce_len_limits(h, limits, off)?;
        pos = h.body;

        let mut value = match (h.kind, h.arg) {
            (ZiKind::Nil, _) => ZiValue::Nil,
            (ZiKind::Bool, Arg::Bool(b)) => ZiValue::Bool(b),
            (ZiKind::Int, Arg::Uint(u)) => ZiValue::Int(ZiInteger::from(u)),
            (ZiKind::Int, Arg::Int(i)) => ZiValue::Int(ZiInteger::from(i)),
            (ZiKind::Float, Arg::Float(v)) => ZiValue::Float(v),
            (ZiKind::Str, _) => {
                let body = payload(data, h, off)?;
                let s = crate::utf8::validate(body, off)?;
                pos += body.len();
                ZiValue::Str(try_string_from_str(s, off)?)
            }
            (ZiKind::Bin, _) => {
                let body = payload(data, h, off)?;
                pos += body.len();
                ZiValue::Bin(try_vec_from_slice(body, off)?)
            }
            (ZiKind::Array | ZiKind::Map, _) => {
                let items = ensure_room(data, h, off)?;
                items_seen = items_seen
                    .checked_add(items)
                    .ok_or_else(|| ZiError::new(ErrorCode::LengthOverflow, off))?;
                if items_seen > limits.max_total_items {
                    return Err(ZiError::new(ErrorCode::TotalItemsLimitExceeded, off));
                }
                if stack.len() + 1 > limits.max_depth {
                    return Err(ZiError::new(ErrorCode::DepthLimitExceeded, off));
                }
                let n = h.arg_len();
                if n == 0 {
                    if h.kind == ZiKind::Array {
                        ZiValue::Array(Vec::new())
                    } else {
                        ZiValue::Map(Vec::new())
                    }
                } else {
                    try_reserve(&mut stack, 1, off)?;
                    if h.kind == ZiKind::Array {
                        stack.push(Frame::Array {
                            items: try_vec_with_capacity(n, off)?,
                            remaining: n,
                        });
                    } else {
                        stack.push(Frame::Map {
                            entries: try_vec_with_capacity(n, off)?,
                            key: None,
                            remaining: n,
                        });
                    }
                    continue;
                }
            }
            _ => return Err(ZiError::new(ErrorCode::UnknownHead(data[off]), off)),
        };

        // Attach the finished value to its parent, closing every container it completes.
        loop {
            let Some(mut frame) = stack.pop() else {
                return Ok((value, pos));
            };
            match &mut frame {
                Frame::Array { items, remaining } => {
                    items.push(value);
                    *remaining -= 1;
                    if *remaining > 0 {
                        stack.push(frame);
                        break;
                    }
                }
                Frame::Map {
                    entries,
                    key,
                    remaining,
                } => match key.take() {
                    None => {
                        *key = Some(value);
                        stack.push(frame);
                        break;
                    }
                    Some(k) => {
                        entries.push((k, value));
                        *remaining -= 1;
                        if *remaining > 0 {
                            stack.push(frame);
                            break;
                        }
                    }
                },
            }
            value = match frame {
                Frame::Array { items, .. } => ZiValue::Array(items),
                Frame::Map { entries, .. } => ZiValue::Map(entries),
            };
        }
    }
}
