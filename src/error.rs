use core::fmt;

use crate::head::ZiKind;

/// What an accessor asked for when it hit a [`ErrorCode::TypeMismatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// A single concrete kind.
    Kind(ZiKind),
    /// Either an integer or a float.
    Number,
    /// Either an array or a map.
    Container,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kind(kind) => fmt::Display::fmt(kind, f),
            Self::Number => f.write_str("number"),
            Self::Container => f.write_str("array or map"),
        }
    }
}

/// The broad class an [`ErrorCode`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The bytes are not a well-formed ZiProto value.
    Format,
    /// The caller asked for a type the value does not have.
    TypeMismatch,
    /// A header or payload runs past the end of the buffer.
    BufferUnderrun,
    /// A configured [`DecodeLimits`](crate::DecodeLimits) bound was exceeded.
    Limit,
    /// Encoding or conversion failure.
    Encode,
}

/// A structured error code identifying why an operation failed.
///
/// Codes are `Copy` and string-free so they can be matched on in `no_std` builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCode {
    /// The head byte is not assigned to any supported type (`0xc1` or an ext head).
    UnknownHead(u8),
    /// A declared length or fixed-width field runs past the end of the buffer.
    BufferUnderrun,
    /// Arithmetic overflow while computing a length/offset.
    LengthOverflow,
    /// Input contains trailing bytes after the single encoded value.
    TrailingBytes,
    /// Invalid UTF-8 in a string payload.
    Utf8Invalid,

    /// A typed accessor was called on a value of a different kind.
    TypeMismatch {
        /// The kind the accessor requires.
        expected: Expected,
        /// The kind actually found at the position.
        actual: ZiKind,
    },
    /// An integer does not fit the requested Rust type.
    IntegerOverflow,

    /// Input exceeds `max_input_bytes`.
    MessageLenLimitExceeded,
    /// Nesting depth limit exceeded.
    DepthLimitExceeded,
    /// Total items limit exceeded.
    TotalItemsLimitExceeded,
    /// Array length exceeds limits.
    ArrayLenLimitExceeded,
    /// Map length exceeds limits.
    MapLenLimitExceeded,
    /// String length exceeds limits.
    StrLenLimitExceeded,
    /// Binary length exceeds limits.
    BinLenLimitExceeded,

    /// Memory allocation failed while building owned structures.
    AllocationFailed,
    /// An array builder emitted a different number of items than declared.
    ArrayLenMismatch,
    /// A map builder emitted a different number of entries than declared.
    MapLenMismatch,
    /// Serde conversion failed.
    SerdeError,
}

impl ErrorCode {
    /// Returns the class this code belongs to.
    #[must_use]
    pub const fn kind(self) -> ErrorKind {
        match self {
            Self::UnknownHead(_) | Self::TrailingBytes | Self::Utf8Invalid => ErrorKind::Format,
            Self::TypeMismatch { .. } | Self::IntegerOverflow => ErrorKind::TypeMismatch,
            Self::BufferUnderrun | Self::LengthOverflow => ErrorKind::BufferUnderrun,
            Self::MessageLenLimitExceeded
            | Self::DepthLimitExceeded
            | Self::TotalItemsLimitExceeded
            | Self::ArrayLenLimitExceeded
            | Self::MapLenLimitExceeded
            | Self::StrLenLimitExceeded
            | Self::BinLenLimitExceeded => ErrorKind::Limit,
            Self::AllocationFailed
            | Self::ArrayLenMismatch
            | Self::MapLenMismatch
            | Self::SerdeError => ErrorKind::Encode,
        }
    }
}

/// A ZiProto error with a stable code and the byte offset where it was detected.
///
/// Offsets are relative to the start of the buffer the root [`Decoder`](crate::Decoder) was built
/// over. Encoder errors report the output length at the time of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZiError {
    /// The error code.
    pub code: ErrorCode,
    /// Byte offset where the error was detected.
    pub offset: usize,
}

impl ZiError {
    /// Construct an error at `offset`.
    #[inline]
    #[must_use]
    pub const fn new(code: ErrorCode, offset: usize) -> Self {
        Self { code, offset }
    }

    #[inline]
    pub(crate) const fn mismatch(expected: Expected, actual: ZiKind, offset: usize) -> Self {
        Self::new(ErrorCode::TypeMismatch { expected, actual }, offset)
    }

    #[inline]
    pub(crate) const fn underrun(offset: usize) -> Self {
        Self::new(ErrorCode::BufferUnderrun, offset)
    }

    /// Returns the class of this error.
    #[inline]
    #[must_use]
    pub const fn kind(self) -> ErrorKind {
        self.code.kind()
    }

    /// Returns true iff this is a type mismatch raised by a typed accessor.
    #[inline]
    #[must_use]
    pub const fn is_type_mismatch(self) -> bool {
        matches!(self.code, ErrorCode::TypeMismatch { .. })
    }
}

impl fmt::Display for ZiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.code {
            ErrorCode::UnknownHead(b) => {
                return write!(
                    f,
                    "ziproto decode failed at {}: unknown head byte 0x{b:02x}",
                    self.offset
                );
            }
            ErrorCode::TypeMismatch { expected, actual } => {
                return write!(
                    f,
                    "ziproto value at {} is not {expected} (found {actual})",
                    self.offset
                );
            }
            ErrorCode::BufferUnderrun => "unexpected end of input",
            ErrorCode::LengthOverflow => "length overflow",
            ErrorCode::TrailingBytes => "trailing bytes after single value",
            ErrorCode::Utf8Invalid => "string must be valid UTF-8",
            ErrorCode::IntegerOverflow => "integer out of range for requested type",

            ErrorCode::MessageLenLimitExceeded => "input exceeds decode limits",
            ErrorCode::DepthLimitExceeded => "nesting depth limit exceeded",
            ErrorCode::TotalItemsLimitExceeded => "total items limit exceeded",
            ErrorCode::ArrayLenLimitExceeded => "array length exceeds decode limits",
            ErrorCode::MapLenLimitExceeded => "map length exceeds decode limits",
            ErrorCode::StrLenLimitExceeded => "string length exceeds decode limits",
            ErrorCode::BinLenLimitExceeded => "binary length exceeds decode limits",

            ErrorCode::AllocationFailed => "allocation failed",
            ErrorCode::ArrayLenMismatch => "array length mismatch",
            ErrorCode::MapLenMismatch => "map length mismatch",
            ErrorCode::SerdeError => "serde conversion error",
        };

        match self.kind() {
            ErrorKind::Encode => write!(f, "ziproto encode failed at {}: {msg}", self.offset),
            _ => write!(f, "ziproto decode failed at {}: {msg}", self.offset),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ZiError {}
