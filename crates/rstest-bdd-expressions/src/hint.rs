//! Type hints used to resolve anonymous parameters at match time.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Concrete target type for an anonymous `{}` placeholder.
///
/// Callers pass one hint per parameter position to
/// [`StepExpression::match_text`](crate::StepExpression::match_text). Positions
/// without a hint resolve to [`TypeHint::String`].
///
/// # Examples
/// ```
/// use rstest_bdd_expressions::TypeHint;
///
/// let hint: TypeHint = "u32".parse().expect("u32 is a supported hint");
/// assert_eq!(hint, TypeHint::U32);
/// assert_eq!(hint.to_string(), "u32");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum TypeHint {
    /// Keep the matched text as an owned string.
    #[default]
    String,
    /// Parse `true` or `false`.
    Bool,
    /// Signed 8-bit integer.
    I8,
    /// Signed 16-bit integer.
    I16,
    /// Signed 32-bit integer.
    I32,
    /// Signed 64-bit integer.
    I64,
    /// Signed 128-bit integer.
    I128,
    /// Unsigned 8-bit integer.
    U8,
    /// Unsigned 16-bit integer.
    U16,
    /// Unsigned 32-bit integer.
    U32,
    /// Unsigned 64-bit integer.
    U64,
    /// Unsigned 128-bit integer.
    U128,
    /// Single-precision float.
    F32,
    /// Double-precision float.
    F64,
}

impl TypeHint {
    /// Return the Rust type name this hint stands for.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::I128 => "i128",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::U128 => "u128",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a supported [`TypeHint`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported type hint `{0}`")]
pub struct TypeHintParseError(pub String);

impl FromStr for TypeHint {
    type Err = TypeHintParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hint = match s.trim() {
            "String" | "str" | "&str" => Self::String,
            "bool" => Self::Bool,
            "i8" => Self::I8,
            "i16" => Self::I16,
            "i32" => Self::I32,
            "i64" => Self::I64,
            "i128" => Self::I128,
            "u8" => Self::U8,
            "u16" => Self::U16,
            "u32" => Self::U32,
            "u64" => Self::U64,
            "u128" => Self::U128,
            "f32" => Self::F32,
            "f64" => Self::F64,
            other => return Err(TypeHintParseError(other.to_string())),
        };
        Ok(hint)
    }
}
