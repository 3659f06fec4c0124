//! Parameter types: named capture fragments paired with a transform.

use std::fmt;
use std::sync::Arc;

use crate::errors::{RegistryError, TransformError};
use crate::hint::TypeHint;
use crate::value::Value;

/// Name given to parameter types produced by [`ParameterType::de_anonymize`].
pub const ANONYMOUS_NAME: &str = "anonymous";

const ILLEGAL_NAME_CHARS: [char; 10] = ['[', ']', '(', ')', '$', '.', '|', '?', '*', '+'];

/// Converts the text captured for one parameter into a [`Value`].
///
/// `groups` holds one entry per capture group the parameter owns: the
/// parameter's own group when its fragments contain no inner groups,
/// otherwise one entry per inner group. Groups that did not participate in
/// the match are `None`.
///
/// Any `Fn(&[Option<&str>]) -> Result<Value, TransformError>` closure that is
/// `Send + Sync` implements this trait.
pub trait Transform: Send + Sync {
    /// Transform the matched groups into a value.
    ///
    /// # Errors
    /// Returns [`TransformError`] when the matched text cannot be converted.
    fn transform(&self, groups: &[Option<&str>]) -> Result<Value, TransformError>;
}

impl<F> Transform for F
where
    F: Fn(&[Option<&str>]) -> Result<Value, TransformError> + Send + Sync,
{
    fn transform(&self, groups: &[Option<&str>]) -> Result<Value, TransformError> {
        self(groups)
    }
}

/// Report whether `name` may be used as a parameter type name.
///
/// Names may not contain `[ ] ( ) $ . | ? * +`, with or without a preceding
/// backslash.
///
/// # Examples
/// ```
/// use rstest_bdd_expressions::is_valid_parameter_type_name;
/// assert!(is_valid_parameter_type_name("colour"));
/// assert!(is_valid_parameter_type_name(""));
/// assert!(!is_valid_parameter_type_name("co.lour"));
/// ```
#[must_use]
pub fn is_valid_parameter_type_name(name: &str) -> bool {
    !name.chars().any(|c| ILLEGAL_NAME_CHARS.contains(&c))
}

/// A named, matchable type: capture fragments plus a transform.
///
/// Parameter types are shared through [`Arc`] by the registry and by every
/// compiled expression that references them. They are immutable once built.
///
/// # Examples
/// ```
/// use rstest_bdd_expressions::{ParameterType, Value};
///
/// let colour = ParameterType::new("colour", ["red|blue"], |groups| {
///     Ok(Value::from(groups.first().copied().flatten().unwrap_or_default()))
/// })
/// .expect("colour is a valid parameter type");
/// assert_eq!(colour.name(), "colour");
/// assert!(!colour.is_anonymous());
/// ```
#[derive(Clone)]
pub struct ParameterType {
    name: String,
    regexps: Vec<String>,
    transform: Arc<dyn Transform>,
    anonymous: bool,
    hint: Option<TypeHint>,
}

impl ParameterType {
    /// Build a parameter type from a closure.
    ///
    /// # Errors
    /// Returns [`RegistryError::InvalidParameterTypeName`] when the name
    /// contains reserved characters and [`RegistryError::MissingRegexps`]
    /// when no fragment is supplied.
    pub fn new<I, S, F>(
        name: impl Into<String>,
        regexps: I,
        transform: F,
    ) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&[Option<&str>]) -> Result<Value, TransformError> + Send + Sync + 'static,
    {
        Self::with_transform(name, regexps, Arc::new(transform))
    }

    /// Build a parameter type around a shared [`Transform`].
    ///
    /// # Errors
    /// See [`ParameterType::new`].
    pub fn with_transform<I, S>(
        name: impl Into<String>,
        regexps: I,
        transform: Arc<dyn Transform>,
    ) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        if !is_valid_parameter_type_name(&name) {
            return Err(RegistryError::InvalidParameterTypeName { name });
        }
        let regexps: Vec<String> = regexps.into_iter().map(Into::into).collect();
        if regexps.is_empty() {
            return Err(RegistryError::MissingRegexps { name });
        }
        Ok(Self {
            name,
            regexps,
            transform,
            anonymous: false,
            hint: None,
        })
    }

    /// Build a type whose name and fragments are known to be valid.
    pub(crate) fn from_parts(
        name: &str,
        regexps: &[&str],
        transform: Arc<dyn Transform>,
    ) -> Self {
        Self {
            name: name.to_string(),
            regexps: regexps.iter().map(ToString::to_string).collect(),
            transform,
            anonymous: false,
            hint: None,
        }
    }

    /// The anonymous `{}` type: matches anything and resolves its value type
    /// from a per-call [`TypeHint`].
    pub(crate) fn anonymous(regexp: &str) -> Self {
        Self {
            name: String::new(),
            regexps: vec![regexp.to_string()],
            transform: Arc::new(|groups: &[Option<&str>]| -> Result<Value, TransformError> {
                Ok(groups
                    .first()
                    .copied()
                    .flatten()
                    .map_or(Value::Absent, Value::from))
            }),
            anonymous: true,
            hint: None,
        }
    }

    /// Produce a concrete copy of an anonymous type.
    ///
    /// The copy keeps this type's fragments, uses `transform`, and is no
    /// longer anonymous. `self` is left untouched so the same anonymous type
    /// can be resolved differently on every call.
    #[must_use]
    pub fn de_anonymize(&self, hint: TypeHint, transform: Arc<dyn Transform>) -> Self {
        Self {
            name: ANONYMOUS_NAME.to_string(),
            regexps: self.regexps.clone(),
            transform,
            anonymous: false,
            hint: Some(hint),
        }
    }

    /// Name used to reference the type inside `{}`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Capture fragments; never empty.
    #[must_use]
    pub fn regexps(&self) -> &[String] {
        &self.regexps
    }

    /// Whether the type waits for a [`TypeHint`] before it can transform.
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    /// The hint this type was resolved with, for de-anonymized copies.
    #[must_use]
    pub const fn type_hint(&self) -> Option<TypeHint> {
        self.hint
    }

    /// Run the transform over the matched groups.
    ///
    /// # Errors
    /// Propagates the transform's [`TransformError`].
    pub fn transform(&self, groups: &[Option<&str>]) -> Result<Value, TransformError> {
        self.transform.transform(groups)
    }
}

impl fmt::Debug for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterType")
            .field("name", &self.name)
            .field("regexps", &self.regexps)
            .field("anonymous", &self.anonymous)
            .field("hint", &self.hint)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn first(groups: &[Option<&str>]) -> Result<Value, TransformError> {
        Ok(groups.first().copied().flatten().map_or(Value::Absent, Value::from))
    }

    #[rstest]
    #[case("[")]
    #[case("a]")]
    #[case("(x)")]
    #[case("$")]
    #[case("a.b")]
    #[case("a|b")]
    #[case("maybe?")]
    #[case("many*")]
    #[case("more+")]
    #[case(r"escaped\.dot")]
    fn rejects_reserved_characters(#[case] name: &str) {
        assert!(!is_valid_parameter_type_name(name));
        let Err(err) = ParameterType::new(name, [".*"], first) else {
            panic!("{name} should be rejected");
        };
        assert_eq!(
            err,
            RegistryError::InvalidParameterTypeName {
                name: name.to_string()
            }
        );
    }

    #[rstest]
    #[case("colour")]
    #[case("snake_case")]
    #[case("kebab-case")]
    #[case("with space")]
    #[case("")]
    fn accepts_plain_names(#[case] name: &str) {
        assert!(is_valid_parameter_type_name(name));
    }

    #[test]
    fn requires_at_least_one_regexp() {
        let Err(err) = ParameterType::new("nothing", Vec::<String>::new(), first) else {
            panic!("a type without fragments should be rejected");
        };
        assert_eq!(
            err,
            RegistryError::MissingRegexps {
                name: "nothing".into()
            }
        );
    }

    #[test]
    fn de_anonymize_leaves_the_original_untouched() {
        let anonymous = ParameterType::anonymous(".*");
        let resolved = anonymous.de_anonymize(
            TypeHint::U8,
            Arc::new(|_: &[Option<&str>]| -> Result<Value, TransformError> {
                Ok(Value::U8(7))
            }),
        );

        assert!(anonymous.is_anonymous());
        assert_eq!(anonymous.name(), "");
        assert_eq!(anonymous.type_hint(), None);

        assert!(!resolved.is_anonymous());
        assert_eq!(resolved.name(), ANONYMOUS_NAME);
        assert_eq!(resolved.regexps(), anonymous.regexps());
        assert_eq!(resolved.type_hint(), Some(TypeHint::U8));
        assert!(matches!(resolved.transform(&[Some("x")]), Ok(Value::U8(7))));
    }

    #[test]
    fn anonymous_type_passes_text_through_until_resolved() {
        let anonymous = ParameterType::anonymous(".*");
        assert!(matches!(
            anonymous.transform(&[Some("text")]),
            Ok(Value::String(text)) if text == "text"
        ));
        assert!(matches!(anonymous.transform(&[None]), Ok(Value::Absent)));
    }
}
