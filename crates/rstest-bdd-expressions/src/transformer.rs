//! Fallback conversion of matched text into a hinted type.

use std::fmt::Display;
use std::str::FromStr;

use crate::errors::TransformError;
use crate::hint::TypeHint;
use crate::value::Value;

/// Converts matched text into the type named by a [`TypeHint`].
///
/// The registry hands its transformer to every compiled expression so that
/// anonymous `{}` parameters can be resolved at match time.
pub trait ParameterByTypeTransformer: Send + Sync {
    /// Convert `value` into `hint`'s type.
    ///
    /// `None` means the capture group did not participate in the match.
    ///
    /// # Errors
    /// Returns [`TransformError`] when the text does not parse as the target
    /// type.
    fn transform(&self, value: Option<&str>, hint: TypeHint) -> Result<Value, TransformError>;
}

/// Default transformer backed by [`str::parse`].
///
/// # Examples
/// ```
/// use rstest_bdd_expressions::{
///     BuiltInParameterTransformer, ParameterByTypeTransformer, TypeHint, Value,
/// };
///
/// let transformer = BuiltInParameterTransformer;
/// let value = transformer
///     .transform(Some("42"), TypeHint::U16)
///     .expect("42 fits in a u16");
/// assert_eq!(value, Value::U16(42));
/// assert!(transformer.transform(Some("-1"), TypeHint::U16).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltInParameterTransformer;

impl ParameterByTypeTransformer for BuiltInParameterTransformer {
    fn transform(&self, value: Option<&str>, hint: TypeHint) -> Result<Value, TransformError> {
        let Some(text) = value else {
            return Ok(Value::Absent);
        };
        match hint {
            TypeHint::String => Ok(Value::from(text)),
            TypeHint::Bool => parse_as::<bool>(text, hint),
            TypeHint::I8 => parse_as::<i8>(text, hint),
            TypeHint::I16 => parse_as::<i16>(text, hint),
            TypeHint::I32 => parse_as::<i32>(text, hint),
            TypeHint::I64 => parse_as::<i64>(text, hint),
            TypeHint::I128 => parse_as::<i128>(text, hint),
            TypeHint::U8 => parse_as::<u8>(text, hint),
            TypeHint::U16 => parse_as::<u16>(text, hint),
            TypeHint::U32 => parse_as::<u32>(text, hint),
            TypeHint::U64 => parse_as::<u64>(text, hint),
            TypeHint::U128 => parse_as::<u128>(text, hint),
            TypeHint::F32 => parse_as::<f32>(text, hint),
            TypeHint::F64 => parse_as::<f64>(text, hint),
        }
    }
}

/// Parse `text` as `T`, reporting failures against `target`.
pub(crate) fn parse_as<T>(text: &str, target: TypeHint) -> Result<Value, TransformError>
where
    T: FromStr + Into<Value>,
    T::Err: Display,
{
    text.parse::<T>()
        .map(Into::into)
        .map_err(|err| TransformError::Conversion {
            value: text.to_string(),
            target,
            reason: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("hello", TypeHint::String, Value::from("hello"))]
    #[case("true", TypeHint::Bool, Value::Bool(true))]
    #[case("-128", TypeHint::I8, Value::I8(-128))]
    #[case("+17", TypeHint::I32, Value::I32(17))]
    #[case("18446744073709551615", TypeHint::U64, Value::U64(u64::MAX))]
    #[case("1.5", TypeHint::F64, Value::F64(1.5))]
    fn converts_to_the_hinted_type(
        #[case] text: &str,
        #[case] hint: TypeHint,
        #[case] expected: Value,
    ) {
        let value = BuiltInParameterTransformer
            .transform(Some(text), hint)
            .unwrap_or_else(|err| panic!("{text} should convert to {hint}: {err}"));
        assert_eq!(value, expected);
    }

    #[rstest]
    #[case("300", TypeHint::U8)]
    #[case("-1", TypeHint::U32)]
    #[case("abc", TypeHint::I64)]
    #[case("yes", TypeHint::Bool)]
    #[case("1.2.3", TypeHint::F32)]
    fn reports_conversion_failures(#[case] text: &str, #[case] hint: TypeHint) {
        let Err(err) = BuiltInParameterTransformer.transform(Some(text), hint) else {
            panic!("{text} should not convert to {hint}");
        };
        match err {
            TransformError::Conversion { value, target, .. } => {
                assert_eq!(value, text);
                assert_eq!(target, hint);
            }
            other => panic!("expected conversion error, got {other}"),
        }
    }

    #[test]
    fn missing_text_is_absent() {
        assert!(matches!(
            BuiltInParameterTransformer.transform(None, TypeHint::I32),
            Ok(Value::Absent)
        ));
    }
}
