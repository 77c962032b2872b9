use alloc::string::String;
use alloc::vec::Vec;
use core::alloc::Layout;

use crate::{ErrorCode, ZiError};

#[inline]
fn check_reserve_len<T>(len: usize, additional: usize, offset: usize) -> Result<(), ZiError> {
    let needed = len
        .checked_add(additional)
        .ok_or_else(|| ZiError::new(ErrorCode::LengthOverflow, offset))?;
    Layout::array::<T>(needed).map_err(|_| ZiError::new(ErrorCode::LengthOverflow, offset))?;
    Ok(())
}

#[inline]
pub fn try_reserve_exact<T>(
    v: &mut Vec<T>,
    additional: usize,
    offset: usize,
) -> Result<(), ZiError> {
    let needed = v
        .len()
        .checked_add(additional)
        .ok_or_else(|| ZiError::new(ErrorCode::LengthOverflow, offset))?;
    if needed <= v.capacity() {
        return Ok(());
    }
    check_reserve_len::<T>(v.len(), additional, offset)?;
    v.try_reserve_exact(additional)
        .map_err(|_| ZiError::new(ErrorCode::AllocationFailed, offset))
}

#[inline]
pub fn try_reserve<T>(v: &mut Vec<T>, additional: usize, offset: usize) -> Result<(), ZiError> {
    let needed = v
        .len()
        .checked_add(additional)
        .ok_or_else(|| ZiError::new(ErrorCode::LengthOverflow, offset))?;
    if needed <= v.capacity() {
        return Ok(());
    }
    check_reserve_len::<T>(v.len(), additional, offset)?;
    v.try_reserve(additional)
        .map_err(|_| ZiError::new(ErrorCode::AllocationFailed, offset))
}

#[inline]
pub fn try_vec_from_slice(bytes: &[u8], offset: usize) -> Result<Vec<u8>, ZiError> {
    let mut v = Vec::new();
    try_reserve_exact(&mut v, bytes.len(), offset)?;
    v.extend_from_slice(bytes);
    Ok(v)
}

#[inline]
pub fn try_string_from_str(s: &str, offset: usize) -> Result<String, ZiError> {
    let mut out = String::new();
    out.try_reserve_exact(s.len())
        .map_err(|_| ZiError::new(ErrorCode::AllocationFailed, offset))?;
    out.push_str(s);
    Ok(out)
}

#[inline]
pub fn try_vec_with_capacity<T>(cap: usize, offset: usize) -> Result<Vec<T>, ZiError> {
    let mut v: Vec<T> = Vec::new();
    try_reserve_exact(&mut v, cap, offset)?;
    Ok(v)
}
