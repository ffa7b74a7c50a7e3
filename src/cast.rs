//! Converting stored PLY values into the numeric type requested by the
//! caller.
//!
//! PLY files store values in one of eight types, but callers usually want
//! all positions as `f64` or all indices as `u32`, regardless of what the
//! file declared. The [`Scalar`] trait performs these conversions. It is
//! implemented for the closed set of Rust number types listed below and is
//! sealed.
//!
//! # Conversion rules
//!
//! The rules are exactly Rust's `as` casts (via
//! [`num_traits::AsPrimitive`]):
//!
//! - integer → integer: truncation of high bits or sign/zero extension
//!   (two's complement), e.g. `300i32 → 44u8` and `-1i8 → 255u8`.
//! - integer → float: exact if representable, otherwise rounded to the
//!   nearest float.
//! - float → float: `f32 → f64` is exact, `f64 → f32` rounds to nearest.
//! - float → integer: **truncates toward zero** (`-2.7 → -2`). Values out of
//!   the target's range saturate at its bounds and NaN becomes 0.
//!
//! The float → integer rule is where PLY tools commonly differ (some round).
//! If you need rounding, request `f64` and round yourself.
//!
//! ```
//! use plydata::Value;
//!
//! assert_eq!(Value::Float(-2.7).to::<i32>(), -2);
//! assert_eq!(Value::Int(300).to::<u8>(), 44);
//! assert_eq!(Value::Char(-1).to::<u8>(), 255);
//! assert_eq!(Value::UChar(7).to::<f64>(), 7.0);
//! ```

use std::fmt;

use num_traits::AsPrimitive;

use crate::Value;


mod sealed {
    pub trait Sealed {}
}

/// A Rust number type that PLY values can be converted into.
///
/// There is one conversion function per stored PLY type. You are not supposed
/// to implement this trait for your own types (it's sealed).
pub trait Scalar: sealed::Sealed + Copy + PartialEq + fmt::Debug + 'static {
    fn from_i8(v: i8) -> Self;
    fn from_u8(v: u8) -> Self;
    fn from_i16(v: i16) -> Self;
    fn from_u16(v: u16) -> Self;
    fn from_i32(v: i32) -> Self;
    fn from_u32(v: u32) -> Self;
    fn from_f32(v: f32) -> Self;
    fn from_f64(v: f64) -> Self;

    /// Converts a dynamically typed value.
    fn from_value(v: Value) -> Self {
        match v {
            Value::Char(v) => Self::from_i8(v),
            Value::UChar(v) => Self::from_u8(v),
            Value::Short(v) => Self::from_i16(v),
            Value::UShort(v) => Self::from_u16(v),
            Value::Int(v) => Self::from_i32(v),
            Value::UInt(v) => Self::from_u32(v),
            Value::Float(v) => Self::from_f32(v),
            Value::Double(v) => Self::from_f64(v),
        }
    }
}

macro_rules! impl_scalar {
    ($($ty:ident),*) => {
        $(
            impl sealed::Sealed for $ty {}
            impl Scalar for $ty {
                #[inline(always)]
                fn from_i8(v: i8) -> Self { v.as_() }
                #[inline(always)]
                fn from_u8(v: u8) -> Self { v.as_() }
                #[inline(always)]
                fn from_i16(v: i16) -> Self { v.as_() }
                #[inline(always)]
                fn from_u16(v: u16) -> Self { v.as_() }
                #[inline(always)]
                fn from_i32(v: i32) -> Self { v.as_() }
                #[inline(always)]
                fn from_u32(v: u32) -> Self { v.as_() }
                #[inline(always)]
                fn from_f32(v: f32) -> Self { v.as_() }
                #[inline(always)]
                fn from_f64(v: f64) -> Self { v.as_() }
            }
        )*
    }
}

impl_scalar!(i8, u8, i16, u16, i32, u32, i64, u64, usize, f32, f64);
