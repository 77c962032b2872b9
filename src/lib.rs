//! # ziproto
//!
//! Zero-copy decoding of **ZiProto**, a compact self-describing binary serialization format from
//! the MessagePack family.
//!
//! ## Design principles
//!
//! - **Views, not trees.**
//!   A [`Decoder`] is a `Copy` view positioned at one value inside a borrowed buffer. Typed getters
//!   read the value in place; strings and blobs are returned as slices of the input.
//! - **Navigation is skipping.**
//!   [`Decoder::next`], [`Decoder::get_index`] and [`Decoder::get_key`] locate values by walking
//!   headers, never by materializing siblings.
//! - **Every read is bounds-checked.**
//!   Truncated or hostile input yields a [`ZiError`] with a byte offset, never a panic. Walking is
//!   iterative and bounded by [`DecodeLimits`].
//!
//! ## Wire format
//!
//! The first byte of every value (the *head*) determines its kind and header layout:
//!
//! | head | kind | header |
//! |------|------|--------|
//! | `0x00..=0x7f` | int | positive fixint |
//! | `0x80..=0x8f` | map | fixmap, `head & 0x0f` pairs |
//! | `0x90..=0x9f` | array | fixarray, `head & 0x0f` elements |
//! | `0xa0..=0xbf` | str | fixstr, `head & 0x1f` bytes |
//! | `0xc0` | nil | |
//! | `0xc2` / `0xc3` | bool | false / true |
//! | `0xc4..=0xc6` | bin | 8/16/32-bit length |
//! | `0xca` / `0xcb` | float | binary32 / binary64 |
//! | `0xcc..=0xcf` | int | uint 8/16/32/64 |
//! | `0xd0..=0xd3` | int | int 8/16/32/64 |
//! | `0xd9..=0xdb` | str | 8/16/32-bit length |
//! | `0xdc` / `0xdd` | array | 16/32-bit count |
//! | `0xde` / `0xdf` | map | 16/32-bit count |
//! | `0xe0..=0xff` | int | negative fixint |
//!
//! All multi-byte fields are big-endian. `0xc1` and the extension heads are rejected with
//! [`ErrorCode::UnknownHead`].
//!
//! ```
//! use ziproto::Decoder;
//!
//! let bytes = [0x92, 0x01, 0xa1, b'a'];
//! let d = Decoder::new(&bytes);
//! assert!(d.is_array());
//! assert_eq!(d.len()?, 2);
//! assert_eq!(d.get_index(1)?.map(|v| v.get_str()).transpose()?, Some("a"));
//! assert!(d.next()?.is_end());
//! # Ok::<(), ziproto::ZiError>(())
//! ```
//!
//! ## Feature flags
//!
//! - `std` *(default)*: implements `std::error::Error` for [`ZiError`].
//! - `alloc` *(default)*: enables owned values ([`ZiValue`]), the [`Encoder`], and [`zi!`].
//! - `sha2` *(default)*: enables [`Decoder::sha256`].
//! - `serde`: enables `to_vec` / `from_slice` and `Serialize`/`Deserialize` for [`ZiValue`].
//! - `simdutf8`: enables SIMD-accelerated UTF-8 validation where supported.
//!
//! ## `no_std`
//!
//! The crate is `no_std` compatible. Views and validation work without `alloc`; owned APIs require
//! an allocator.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
mod alloc_util;
mod decoder;
mod error;
mod head;
mod int;
mod iter;
mod limits;
pub(crate) mod utf8;
mod walk;

#[cfg(feature = "alloc")]
mod decode;
#[cfg(feature = "alloc")]
mod encode;
#[cfg(feature = "alloc")]
mod macros;
#[cfg(feature = "serde")]
mod serde_impl;
#[cfg(feature = "alloc")]
mod value;

pub use crate::decoder::{Decoder, PathElem};
pub use crate::error::{ErrorCode, ErrorKind, Expected, ZiError};
pub use crate::head::ZiKind;
pub use crate::iter::{ArrayIter, MapIter};
pub use crate::limits::{DecodeLimits, DEFAULT_MAX_CONTAINER_LEN, DEFAULT_MAX_DEPTH};
pub use crate::int::{ZiInteger, ZiNumber};
pub use crate::walk::validate;

#[cfg(feature = "alloc")]
pub use crate::decode::decode_value;
#[cfg(feature = "alloc")]
pub use crate::encode::{encode, ArrayEncoder, Encoder, MapEncoder};
#[cfg(feature = "alloc")]
#[doc(hidden)]
pub use crate::macros::__zi_macro;
#[cfg(feature = "alloc")]
pub use crate::value::ZiValue;

#[cfg(feature = "serde")]
pub use crate::serde_impl::{from_slice, from_value_ref, to_value, to_vec};

/// Construct a path slice for [`Decoder::at`].
///
/// ```
/// let p = ziproto::path!("users", 0, "name");
/// assert_eq!(p.len(), 3);
/// ```
#[macro_export]
macro_rules! path {
    ($($seg:expr),* $(,)?) => {
        &[$($crate::__path_elem!($seg)),*]
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __path_elem {
    ($seg:expr) => {
        $crate::PathElem::from($seg)
    };
}
