use core::fmt;

use crate::{ErrorCode, ZiError};

/// An integer in the full range of the wire format, `i64::MIN ..= u64::MAX`.
///
/// The representation is normalized: non-negative values are always stored unsigned, so an integer
/// compares equal regardless of the width it was encoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZiInteger(IntRepr);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum IntRepr {
    Neg(i64),
    Pos(u64),
}

impl ZiInteger {
    /// Returns `true` iff the integer is below zero.
    #[inline]
    #[must_use]
    pub const fn is_negative(self) -> bool {
        matches!(self.0, IntRepr::Neg(_))
    }

    /// Returns the value as `i64` if it fits.
    #[inline]
    #[allow(clippy::cast_possible_wrap)]
    #[must_use]
    pub const fn as_i64(self) -> Option<i64> {
        match self.0 {
            IntRepr::Neg(v) => Some(v),
            IntRepr::Pos(u) => {
                if u > i64::MAX as u64 {
                    None
                } else {
                    Some(u as i64)
                }
            }
        }
    }

    /// Returns the value as `u64` if it is non-negative.
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> Option<u64> {
        match self.0 {
            IntRepr::Pos(u) => Some(u),
            IntRepr::Neg(_) => None,
        }
    }

    /// Returns the value widened to `i128`. Always exact.
    #[inline]
    #[allow(clippy::cast_lossless)]
    #[must_use]
    pub const fn as_i128(self) -> i128 {
        match self.0 {
            IntRepr::Neg(v) => v as i128,
            IntRepr::Pos(u) => u as i128,
        }
    }
}

impl From<i64> for ZiInteger {
    fn from(v: i64) -> Self {
        match u64::try_from(v) {
            Ok(u) => Self(IntRepr::Pos(u)),
            Err(_) => Self(IntRepr::Neg(v)),
        }
    }
}

impl From<u64> for ZiInteger {
    fn from(u: u64) -> Self {
        Self(IntRepr::Pos(u))
    }
}

impl TryFrom<i128> for ZiInteger {
    type Error = ZiError;

    fn try_from(v: i128) -> Result<Self, Self::Error> {
        if let Ok(u) = u64::try_from(v) {
            return Ok(Self(IntRepr::Pos(u)));
        }
        i64::try_from(v)
            .map(|i| Self(IntRepr::Neg(i)))
            .map_err(|_| ZiError::new(ErrorCode::IntegerOverflow, 0))
    }
}

macro_rules! int_from {
    ($($via:ty => $($t:ty),*);*) => {
        $($(
            impl From<$t> for ZiInteger {
                fn from(v: $t) -> Self {
                    Self::from(<$via>::from(v))
                }
            }
        )*)*
    };
}

int_from!(i64 => i8, i16, i32; u64 => u8, u16, u32);

impl fmt::Display for ZiInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            IntRepr::Neg(v) => fmt::Display::fmt(&v, f),
            IntRepr::Pos(u) => fmt::Display::fmt(&u, f),
        }
    }
}

/// Either an integer or a float, as returned by [`Decoder::get_number`](crate::Decoder::get_number).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZiNumber {
    /// An integer of any wire width.
    Int(ZiInteger),
    /// A float; single precision is widened.
    Float(f64),
}

impl ZiNumber {
    /// Returns the number as `f64`. Large integers may lose precision.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i.as_i128() as f64,
            Self::Float(v) => v,
        }
    }
}
