//! Typed values produced by parameter-type transforms.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::hint::TypeHint;

/// Result of transforming matched text for one parameter position.
///
/// Built-in parameter types and the default transformer produce the scalar
/// variants. Custom parameter types may wrap arbitrary data in
/// [`Value::Other`] and recover it with [`Value::downcast_ref`].
///
/// # Examples
/// ```
/// use rstest_bdd_expressions::{TypeHint, Value};
///
/// let value = Value::from(42_u32);
/// assert_eq!(value.type_hint(), Some(TypeHint::U32));
/// assert!(!value.is_absent());
/// ```
#[derive(Clone)]
#[non_exhaustive]
pub enum Value {
    /// The capture group did not participate in the match.
    Absent,
    /// Owned text.
    String(String),
    /// Boolean.
    Bool(bool),
    /// Signed 8-bit integer.
    I8(i8),
    /// Signed 16-bit integer.
    I16(i16),
    /// Signed 32-bit integer.
    I32(i32),
    /// Signed 64-bit integer.
    I64(i64),
    /// Signed 128-bit integer.
    I128(i128),
    /// Unsigned 8-bit integer.
    U8(u8),
    /// Unsigned 16-bit integer.
    U16(u16),
    /// Unsigned 32-bit integer.
    U32(u32),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// Unsigned 128-bit integer.
    U128(u128),
    /// Single-precision float.
    F32(f32),
    /// Double-precision float.
    F64(f64),
    /// Value produced by a custom parameter type.
    Other(Arc<dyn Any + Send + Sync>),
}

impl Value {
    /// Wrap a custom value.
    #[must_use]
    pub fn other<T: Any + Send + Sync>(value: T) -> Self {
        Self::Other(Arc::new(value))
    }

    /// Report whether the value marks a group that did not match.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Return the [`TypeHint`] matching this value's variant.
    ///
    /// `Absent` and `Other` values have no corresponding hint.
    #[must_use]
    pub const fn type_hint(&self) -> Option<TypeHint> {
        let hint = match self {
            Self::Absent | Self::Other(_) => return None,
            Self::String(_) => TypeHint::String,
            Self::Bool(_) => TypeHint::Bool,
            Self::I8(_) => TypeHint::I8,
            Self::I16(_) => TypeHint::I16,
            Self::I32(_) => TypeHint::I32,
            Self::I64(_) => TypeHint::I64,
            Self::I128(_) => TypeHint::I128,
            Self::U8(_) => TypeHint::U8,
            Self::U16(_) => TypeHint::U16,
            Self::U32(_) => TypeHint::U32,
            Self::U64(_) => TypeHint::U64,
            Self::U128(_) => TypeHint::U128,
            Self::F32(_) => TypeHint::F32,
            Self::F64(_) => TypeHint::F64,
        };
        Some(hint)
    }

    /// Borrow the text of a [`Value::String`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Borrow the payload of a [`Value::Other`] as `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Other(payload) => payload.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("Absent"),
            Self::String(v) => f.debug_tuple("String").field(v).finish(),
            Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Self::I8(v) => f.debug_tuple("I8").field(v).finish(),
            Self::I16(v) => f.debug_tuple("I16").field(v).finish(),
            Self::I32(v) => f.debug_tuple("I32").field(v).finish(),
            Self::I64(v) => f.debug_tuple("I64").field(v).finish(),
            Self::I128(v) => f.debug_tuple("I128").field(v).finish(),
            Self::U8(v) => f.debug_tuple("U8").field(v).finish(),
            Self::U16(v) => f.debug_tuple("U16").field(v).finish(),
            Self::U32(v) => f.debug_tuple("U32").field(v).finish(),
            Self::U64(v) => f.debug_tuple("U64").field(v).finish(),
            Self::U128(v) => f.debug_tuple("U128").field(v).finish(),
            Self::F32(v) => f.debug_tuple("F32").field(v).finish(),
            Self::F64(v) => f.debug_tuple("F64").field(v).finish(),
            Self::Other(_) => f.write_str("Other(..)"),
        }
    }
}

// Custom payloads compare by identity; scalars compare by value.
impl PartialEq for Value {
    #[expect(
        clippy::float_cmp,
        reason = "floats are parsed from the same text and compared exactly"
    )]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Absent, Self::Absent) => true,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::I8(a), Self::I8(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::I128(a), Self::I128(b)) => a == b,
            (Self::U8(a), Self::U8(b)) => a == b,
            (Self::U16(a), Self::U16(b)) => a == b,
            (Self::U32(a), Self::U32(b)) => a == b,
            (Self::U64(a), Self::U64(b)) => a == b,
            (Self::U128(a), Self::U128(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a == b,
            (Self::F64(a), Self::F64(b)) => a == b,
            (Self::Other(a), Self::Other(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

impl_from_scalar! {
    String => String,
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    f32 => F32,
    f64 => F64,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}
