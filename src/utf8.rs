#[cfg(feature = "simdutf8")]
use simdutf8::basic as simd_utf8;

use crate::{ErrorCode, ZiError};

/// Validates UTF-8 bytes and returns a borrowed `&str` on success.
///
/// `off` is the offset of the owning value's head byte.
#[inline]
pub fn validate(bytes: &[u8], off: usize) -> Result<&str, ZiError> {
    #[cfg(feature = "simdutf8")]
    {
        simd_utf8::from_utf8(bytes).map_err(|_| ZiError::new(ErrorCode::Utf8Invalid, off))
    }

    #[cfg(not(feature = "simdutf8"))]
    {
        core::str::from_utf8(bytes).map_err(|_| ZiError::new(ErrorCode::Utf8Invalid, off))
    }
}
