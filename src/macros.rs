//! ZiProto construction macro.
//!
//! This module provides [`zi!`], a JSON-like macro to build [`crate::ZiValue`] trees.
//!
//! - The macro is **fallible** and returns `Result<ZiValue, ZiError>`, failing on allocation
//!   errors and on 128-bit or pointer-sized integers outside `i64::MIN ..= u64::MAX`.
//! - `null` and `nil` both produce [`ZiValue::Nil`](crate::ZiValue::Nil).
//! - Map entries keep the order they are written in.
//!
//! Map key rules:
//! - `{ a: 1 }` uses the string key `"a"` (identifier stringized)
//! - `{ "a": 1 }` or `{ 7: 1 }` uses the literal as key
//! - `{ (k): 1 }` uses the expression `k` as key
//!
//! ```
//! # use ziproto::zi;
//! # fn demo() -> Result<(), ziproto::ZiError> {
//! let user_key = "dynamic";
//! let v = zi!({
//!     a: 1,
//!     (user_key): [true, nil, 1.5],
//! })?;
//! assert_eq!(v.get("a").and_then(|a| a.as_i64()), Some(1));
//! # Ok(()) }
//! # demo().unwrap();
//! ```

/// Construct a [`crate::ZiValue`] using a JSON-like literal syntax.
///
/// This macro returns `Result<crate::ZiValue, crate::ZiError>`.
///
/// Supported forms:
/// - `zi!(nil)` / `zi!(null)`
/// - `zi!(true)` / `zi!(false)`
/// - `zi!("text")`
/// - `zi!(b"bytes")`
/// - `zi!([ ... ])`
/// - `zi!({ key: value, "key": value, (expr_key): value, ... })`
/// - `zi!(expr)` for primitives, `String`, `Vec<u8>`, `ZiInteger`, `ZiValue` and `Option`s of them.
#[cfg(feature = "alloc")]
#[cfg_attr(docsrs, doc(cfg(feature = "alloc")))]
#[macro_export]
macro_rules! zi {
    (nil) => {
        ::core::result::Result::<$crate::ZiValue, $crate::ZiError>::Ok($crate::ZiValue::Nil)
    };
    (null) => {
        ::core::result::Result::<$crate::ZiValue, $crate::ZiError>::Ok($crate::ZiValue::Nil)
    };
    (true) => {
        ::core::result::Result::<$crate::ZiValue, $crate::ZiError>::Ok($crate::ZiValue::Bool(true))
    };
    (false) => {
        ::core::result::Result::<$crate::ZiValue, $crate::ZiError>::Ok($crate::ZiValue::Bool(
            false,
        ))
    };

    ([ $($elem:tt),* $(,)? ]) => {{
        (|| -> ::core::result::Result<$crate::ZiValue, $crate::ZiError> {
            let mut items = $crate::__zi_macro::Vec::new();
            $crate::__zi_macro::try_reserve_exact(
                &mut items,
                0usize $(+ { let _ = stringify!($elem); 1usize })*,
            )?;
            $(
                items.push($crate::zi!($elem)?);
            )*
            ::core::result::Result::Ok($crate::ZiValue::Array(items))
        })()
    }};

    ({ $($key:tt : $value:tt),* $(,)? }) => {{
        (|| -> ::core::result::Result<$crate::ZiValue, $crate::ZiError> {
            let mut entries = $crate::__zi_macro::Vec::new();
            $crate::__zi_macro::try_reserve_exact(
                &mut entries,
                0usize $(+ { let _ = stringify!($key); 1usize })*,
            )?;
            $(
                let k = $crate::__zi_key!($key)?;
                let v = $crate::zi!($value)?;
                entries.push((k, v));
            )*
            ::core::result::Result::Ok($crate::ZiValue::Map(entries))
        })()
    }};

    ($other:expr) => {{
        $crate::__zi_macro::IntoZiValue::into_zi_value($other)
    }};
}

/// Internal helper for map keys.
#[doc(hidden)]
#[cfg(feature = "alloc")]
#[macro_export]
macro_rules! __zi_key {
    ($key:ident) => {{
        $crate::__zi_macro::str_value(::core::stringify!($key))
    }};
    (($key:expr)) => {{
        $crate::__zi_macro::IntoZiValue::into_zi_value($key)
    }};
    ($key:literal) => {{
        $crate::__zi_macro::IntoZiValue::into_zi_value($key)
    }};
}

/// Hidden support module used by `zi!` expansions.
#[doc(hidden)]
#[allow(missing_docs)]
pub mod __zi_macro {
    use alloc::string::String;

    pub use alloc::vec::Vec;

    use crate::alloc_util::{try_string_from_str, try_vec_from_slice};
    use crate::{ErrorCode, ZiError, ZiInteger, ZiValue};

    pub fn try_reserve_exact<T>(v: &mut Vec<T>, additional: usize) -> Result<(), ZiError> {
        crate::alloc_util::try_reserve_exact(v, additional, 0)
    }

    pub fn str_value(s: &str) -> Result<ZiValue, ZiError> {
        Ok(ZiValue::Str(try_string_from_str(s, 0)?))
    }

    pub trait IntoZiValue {
        fn into_zi_value(self) -> Result<ZiValue, ZiError>;
    }

    impl IntoZiValue for ZiValue {
        fn into_zi_value(self) -> Result<ZiValue, ZiError> {
            Ok(self)
        }
    }

    impl IntoZiValue for &ZiValue {
        fn into_zi_value(self) -> Result<ZiValue, ZiError> {
            Ok(self.clone())
        }
    }

    impl IntoZiValue for ZiInteger {
        fn into_zi_value(self) -> Result<ZiValue, ZiError> {
            Ok(ZiValue::Int(self))
        }
    }

    impl IntoZiValue for bool {
        fn into_zi_value(self) -> Result<ZiValue, ZiError> {
            Ok(ZiValue::Bool(self))
        }
    }

    impl IntoZiValue for () {
        fn into_zi_value(self) -> Result<ZiValue, ZiError> {
            Ok(ZiValue::Nil)
        }
    }

    impl<T: IntoZiValue> IntoZiValue for Option<T> {
        fn into_zi_value(self) -> Result<ZiValue, ZiError> {
            self.map_or(Ok(ZiValue::Nil), IntoZiValue::into_zi_value)
        }
    }

    impl IntoZiValue for String {
        fn into_zi_value(self) -> Result<ZiValue, ZiError> {
            Ok(ZiValue::Str(self))
        }
    }

    impl IntoZiValue for &String {
        fn into_zi_value(self) -> Result<ZiValue, ZiError> {
            str_value(self)
        }
    }

    impl IntoZiValue for &str {
        fn into_zi_value(self) -> Result<ZiValue, ZiError> {
            str_value(self)
        }
    }

    impl IntoZiValue for char {
        fn into_zi_value(self) -> Result<ZiValue, ZiError> {
            let mut buf = [0u8; 4];
            str_value(self.encode_utf8(&mut buf))
        }
    }

    impl IntoZiValue for Vec<u8> {
        fn into_zi_value(self) -> Result<ZiValue, ZiError> {
            Ok(ZiValue::Bin(self))
        }
    }

    impl IntoZiValue for &[u8] {
        fn into_zi_value(self) -> Result<ZiValue, ZiError> {
            Ok(ZiValue::Bin(try_vec_from_slice(self, 0)?))
        }
    }

    impl<const N: usize> IntoZiValue for &[u8; N] {
        fn into_zi_value(self) -> Result<ZiValue, ZiError> {
            Ok(ZiValue::Bin(try_vec_from_slice(&self[..], 0)?))
        }
    }

    impl IntoZiValue for Vec<ZiValue> {
        fn into_zi_value(self) -> Result<ZiValue, ZiError> {
            Ok(ZiValue::Array(self))
        }
    }

    impl IntoZiValue for f64 {
        fn into_zi_value(self) -> Result<ZiValue, ZiError> {
            Ok(ZiValue::Float(self))
        }
    }

    impl IntoZiValue for f32 {
        fn into_zi_value(self) -> Result<ZiValue, ZiError> {
            Ok(ZiValue::Float(f64::from(self)))
        }
    }

    macro_rules! impl_into_int {
        ($($t:ty),* $(,)?) => {$(
            impl IntoZiValue for $t {
                fn into_zi_value(self) -> Result<ZiValue, ZiError> {
                    Ok(ZiValue::Int(ZiInteger::from(self)))
                }
            }
        )*};
    }

    macro_rules! impl_into_wide_int {
        ($($t:ty),* $(,)?) => {$(
            impl IntoZiValue for $t {
                fn into_zi_value(self) -> Result<ZiValue, ZiError> {
                    let wide = i128::try_from(self)
                        .map_err(|_| ZiError::new(ErrorCode::IntegerOverflow, 0))?;
                    Ok(ZiValue::Int(ZiInteger::try_from(wide)?))
                }
            }
        )*};
    }

    impl_into_int!(i8, i16, i32, i64, u8, u16, u32, u64);
    impl_into_wide_int!(i128, u128, isize, usize);
}
