//! Runtime values and their kinds.
//!
//! The [`Value`] enum is the closed set of primitive values a matcher can
//! compare. Every variant carries its exact width, so an `I32(1)` and an
//! `I64(1)` are different values: comparisons never coerce between kinds.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The primitive type classifier of a [`Value`].
///
/// `Kind` is also what a [`Schema`](crate::Schema) records for each field, and
/// what the parser uses to type the literals of an expression.
///
/// In configuration documents kinds are spelled in lowercase (`"i32"`,
/// `"string"`), with the aliases listed on [`Kind::from_str`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    #[serde(alias = "int8")]
    I8,
    #[serde(alias = "int16")]
    I16,
    #[serde(alias = "int32")]
    I32,
    #[serde(alias = "int", alias = "int64")]
    I64,
    #[serde(alias = "uint8")]
    U8,
    #[serde(alias = "uint16")]
    U16,
    #[serde(alias = "uint32")]
    U32,
    #[serde(alias = "uint", alias = "uint64")]
    U64,
    #[serde(alias = "float32")]
    F32,
    #[serde(alias = "float", alias = "float64")]
    F64,
    #[serde(alias = "boolean")]
    Bool,
    #[serde(alias = "str")]
    String,
}

impl Kind {
    /// Every kind, in declaration order.
    pub const ALL: [Kind; 12] = [
        Kind::I8,
        Kind::I16,
        Kind::I32,
        Kind::I64,
        Kind::U8,
        Kind::U16,
        Kind::U32,
        Kind::U64,
        Kind::F32,
        Kind::F64,
        Kind::Bool,
        Kind::String,
    ];

    /// Returns `true` for the signed and unsigned integer kinds.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Kind::I8
                | Kind::I16
                | Kind::I32
                | Kind::I64
                | Kind::U8
                | Kind::U16
                | Kind::U32
                | Kind::U64
        )
    }

    /// Returns `true` for `F32` and `F64`.
    pub fn is_float(self) -> bool {
        matches!(self, Kind::F32 | Kind::F64)
    }

    /// Returns `true` if values of this kind have an ordering.
    ///
    /// Only booleans are unordered.
    pub fn is_ordered(self) -> bool {
        !matches!(self, Kind::Bool)
    }

    /// Returns the canonical lowercase name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::I8 => "i8",
            Kind::I16 => "i16",
            Kind::I32 => "i32",
            Kind::I64 => "i64",
            Kind::U8 => "u8",
            Kind::U16 => "u16",
            Kind::U32 => "u32",
            Kind::U64 => "u64",
            Kind::F32 => "f32",
            Kind::F64 => "f64",
            Kind::Bool => "bool",
            Kind::String => "string",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a kind name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown kind '{0}'")]
pub struct UnknownKind(pub String);

impl FromStr for Kind {
    type Err = UnknownKind;

    /// Parses a kind name, ignoring case.
    ///
    /// Accepts the canonical names (`i8` .. `u64`, `f32`, `f64`, `bool`,
    /// `string`) and the aliases `int8` .. `uint64`, `int`, `uint`,
    /// `float32`, `float64`, `float`, `boolean` and `str`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.to_ascii_lowercase().as_str() {
            "i8" | "int8" => Kind::I8,
            "i16" | "int16" => Kind::I16,
            "i32" | "int32" => Kind::I32,
            "i64" | "int64" | "int" => Kind::I64,
            "u8" | "uint8" => Kind::U8,
            "u16" | "uint16" => Kind::U16,
            "u32" | "uint32" => Kind::U32,
            "u64" | "uint64" | "uint" => Kind::U64,
            "f32" | "float32" => Kind::F32,
            "f64" | "float64" | "float" => Kind::F64,
            "bool" | "boolean" => Kind::Bool,
            "string" | "str" => Kind::String,
            _ => return Err(UnknownKind(s.to_string())),
        };
        Ok(kind)
    }
}

/// A primitive value taken from a record or written in an expression.
///
/// Equality is strict: two values are equal only if they have the same
/// [`Kind`] and the same raw value. Floats follow IEEE semantics, so `NaN`
/// is never equal to anything.
///
/// # Example
///
/// ```
/// use sieve::{Kind, Value};
///
/// assert_eq!(Value::from(1i32).kind(), Kind::I32);
/// assert_ne!(Value::from(1i32), Value::from(1i64));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Bool(bool),
    String(String),
}

impl Value {
    /// Returns the kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::I8(_) => Kind::I8,
            Value::I16(_) => Kind::I16,
            Value::I32(_) => Kind::I32,
            Value::I64(_) => Kind::I64,
            Value::U8(_) => Kind::U8,
            Value::U16(_) => Kind::U16,
            Value::U32(_) => Kind::U32,
            Value::U64(_) => Kind::U64,
            Value::F32(_) => Kind::F32,
            Value::F64(_) => Kind::F64,
            Value::Bool(_) => Kind::Bool,
            Value::String(_) => Kind::String,
        }
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Orders two values of the same kind.
    ///
    /// Returns `None` when the kinds differ, when the values are booleans,
    /// or when a float comparison involves `NaN`. Strings compare byte-wise.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::I8(a), Value::I8(b)) => Some(a.cmp(b)),
            (Value::I16(a), Value::I16(b)) => Some(a.cmp(b)),
            (Value::I32(a), Value::I32(b)) => Some(a.cmp(b)),
            (Value::I64(a), Value::I64(b)) => Some(a.cmp(b)),
            (Value::U8(a), Value::U8(b)) => Some(a.cmp(b)),
            (Value::U16(a), Value::U16(b)) => Some(a.cmp(b)),
            (Value::U32(a), Value::U32(b)) => Some(a.cmp(b)),
            (Value::U64(a), Value::U64(b)) => Some(a.cmp(b)),
            (Value::F32(a), Value::F32(b)) => a.partial_cmp(b),
            (Value::F64(a), Value::F64(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
            _ => None,
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    bool => Bool,
    String => String,
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<isize> for Value {
    fn from(n: isize) -> Self {
        Value::I64(n as i64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::U64(n as u64)
    }
}

/// A Rust primitive that always converts into the same [`Kind`].
///
/// Bounds the typed list constructors such as
/// [`Matcher::is_in`](crate::Matcher::is_in): every element of a list of one
/// `Scalar` type shares a kind. [`Value`] is deliberately not `Scalar`;
/// lists of values go through [`Matcher::try_in`](crate::Matcher::try_in).
pub trait Scalar: Into<Value> + sealed::Sealed {}

mod sealed {
    pub trait Sealed {}
}

macro_rules! scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}
            impl Scalar for $ty {}
        )*
    };
}

scalar!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, bool, String, &str, &String, isize, usize);
