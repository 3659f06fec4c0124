//! Parameter type registry and the built-in parameter type catalogue.
//!
//! Compilation borrows a registry to resolve `{name}` placeholders. The
//! registry is never consulted through global state, so independent
//! registries can coexist and compiled expressions stay `Send + Sync`.

use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::{RegistryError, TransformError};
use crate::hint::TypeHint;
use crate::parameter::ParameterType;
use crate::transformer::{BuiltInParameterTransformer, ParameterByTypeTransformer, parse_as};
use crate::value::Value;

const INTEGER_REGEXPS: [&str; 2] = [r"-?\d+", r"\d+"];
const FLOAT_REGEXPS: [&str; 1] = [r"[-+]?\d*\.?\d+"];
const WORD_REGEXPS: [&str; 1] = [r"[^\s]+"];
const STRING_REGEXPS: [&str; 2] = [
    r#""([^"\\]*(\\.[^"\\]*)*)""#,
    r"'([^'\\]*(\\.[^'\\]*)*)'",
];
const ANONYMOUS_REGEXP: &str = ".*";

/// Lookup service mapping parameter type names to [`ParameterType`]s.
///
/// # Examples
/// ```
/// use rstest_bdd_expressions::ParameterTypeRegistry;
///
/// let registry = ParameterTypeRegistry::new();
/// let int = registry.lookup_by_type_name("int").expect("int is built in");
/// assert_eq!(int.regexps(), [r"-?\d+", r"\d+"]);
/// assert!(registry.lookup_by_type_name("colour").is_none());
/// ```
#[derive(Clone)]
pub struct ParameterTypeRegistry {
    types: HashMap<String, Arc<ParameterType>>,
    default_transformer: Arc<dyn ParameterByTypeTransformer>,
}

impl ParameterTypeRegistry {
    /// Create a registry holding the built-in parameter types.
    ///
    /// | name         | value  |
    /// |--------------|--------|
    /// | `int`        | `i32`  |
    /// | `byte`       | `i8`   |
    /// | `short`      | `i16`  |
    /// | `long`       | `i64`  |
    /// | `biginteger` | `i128` |
    /// | `float`      | `f32`  |
    /// | `double`     | `f64`  |
    /// | `word`       | `String` |
    /// | `string`     | `String`, quotes removed |
    /// | (empty)      | anonymous |
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for builtin in builtin_types() {
            registry
                .types
                .insert(builtin.name().to_string(), Arc::new(builtin));
        }
        registry
    }

    /// Create a registry holding only the anonymous `{}` type.
    #[must_use]
    pub fn empty() -> Self {
        let anonymous = ParameterType::anonymous(ANONYMOUS_REGEXP);
        let mut types = HashMap::new();
        types.insert(anonymous.name().to_string(), Arc::new(anonymous));
        Self {
            types,
            default_transformer: Arc::new(BuiltInParameterTransformer),
        }
    }

    /// Replace the transformer used to resolve anonymous parameters.
    #[must_use]
    pub fn with_default_transformer(
        mut self,
        transformer: Arc<dyn ParameterByTypeTransformer>,
    ) -> Self {
        self.default_transformer = transformer;
        self
    }

    /// Register a parameter type.
    ///
    /// # Errors
    /// Returns [`RegistryError::DuplicateParameterType`] when a type with the
    /// same name is already registered.
    pub fn define_parameter_type(
        &mut self,
        parameter_type: ParameterType,
    ) -> Result<(), RegistryError> {
        let name = parameter_type.name().to_string();
        if self.types.contains_key(&name) {
            return Err(RegistryError::DuplicateParameterType { name });
        }
        log::debug!("registered parameter type '{name}'");
        self.types.insert(name, Arc::new(parameter_type));
        Ok(())
    }

    /// Look up a parameter type by the name used inside `{}`.
    #[must_use]
    pub fn lookup_by_type_name(&self, name: &str) -> Option<Arc<ParameterType>> {
        self.types.get(name).cloned()
    }

    /// The transformer used to resolve anonymous parameters.
    #[must_use]
    pub fn default_transformer(&self) -> Arc<dyn ParameterByTypeTransformer> {
        Arc::clone(&self.default_transformer)
    }

    /// Iterate over the registered parameter types in no particular order.
    pub fn parameter_types(&self) -> impl Iterator<Item = &Arc<ParameterType>> {
        self.types.values()
    }
}

impl Default for ParameterTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ParameterTypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ParameterTypeRegistry")
            .field("types", &names)
            .finish_non_exhaustive()
    }
}

fn first_group<'a>(groups: &[Option<&'a str>], name: &str) -> Result<&'a str, TransformError> {
    groups
        .first()
        .copied()
        .flatten()
        .ok_or_else(|| TransformError::MissingValue {
            parameter: name.to_string(),
        })
}

fn numeric(name: &'static str, regexps: &[&str], hint: TypeHint) -> ParameterType {
    builtin(name, regexps, move |groups: &[Option<&str>]| {
        parse_as_hint(first_group(groups, name)?, hint)
    })
}

fn parse_as_hint(text: &str, hint: TypeHint) -> Result<Value, TransformError> {
    match hint {
        TypeHint::I8 => parse_as::<i8>(text, hint),
        TypeHint::I16 => parse_as::<i16>(text, hint),
        TypeHint::I64 => parse_as::<i64>(text, hint),
        TypeHint::I128 => parse_as::<i128>(text, hint),
        TypeHint::F32 => parse_as::<f32>(text, hint),
        TypeHint::F64 => parse_as::<f64>(text, hint),
        _ => parse_as::<i32>(text, TypeHint::I32),
    }
}

fn unquote(groups: &[Option<&str>]) -> Result<Value, TransformError> {
    // Only one of the double- and single-quoted alternatives participates.
    let text = groups
        .iter()
        .flatten()
        .next()
        .ok_or_else(|| TransformError::MissingValue {
            parameter: "string".into(),
        })?;
    Ok(Value::from(text.replace("\\\"", "\"").replace("\\'", "'")))
}

fn builtin<F>(name: &str, regexps: &[&str], transform: F) -> ParameterType
where
    F: Fn(&[Option<&str>]) -> Result<Value, TransformError> + Send + Sync + 'static,
{
    ParameterType::from_parts(name, regexps, Arc::new(transform))
}

fn builtin_types() -> Vec<ParameterType> {
    vec![
        numeric("int", &INTEGER_REGEXPS, TypeHint::I32),
        numeric("byte", &INTEGER_REGEXPS, TypeHint::I8),
        numeric("short", &INTEGER_REGEXPS, TypeHint::I16),
        numeric("long", &INTEGER_REGEXPS, TypeHint::I64),
        numeric("biginteger", &INTEGER_REGEXPS, TypeHint::I128),
        numeric("float", &FLOAT_REGEXPS, TypeHint::F32),
        numeric("double", &FLOAT_REGEXPS, TypeHint::F64),
        builtin("word", &WORD_REGEXPS, |groups: &[Option<&str>]| {
            first_group(groups, "word").map(Value::from)
        }),
        builtin("string", &STRING_REGEXPS, unquote),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn lookup(registry: &ParameterTypeRegistry, name: &str) -> Arc<ParameterType> {
        registry
            .lookup_by_type_name(name)
            .unwrap_or_else(|| panic!("parameter type '{name}' should be registered"))
    }

    #[rstest]
    #[case("int", "-12", Value::I32(-12))]
    #[case("byte", "7", Value::I8(7))]
    #[case("short", "300", Value::I16(300))]
    #[case("long", "9000000000", Value::I64(9_000_000_000))]
    #[case("biginteger", "170141183460469231731687303715884105727", Value::I128(i128::MAX))]
    #[case("float", "2.5", Value::F32(2.5))]
    #[case("double", "-.5", Value::F64(-0.5))]
    #[case("word", "banana", Value::from("banana"))]
    fn builtins_transform_their_first_group(
        #[case] name: &str,
        #[case] text: &str,
        #[case] expected: Value,
    ) {
        let registry = ParameterTypeRegistry::new();
        let value = lookup(&registry, name)
            .transform(&[Some(text)])
            .unwrap_or_else(|err| panic!("{name} should transform {text}: {err}"));
        assert_eq!(value, expected);
    }

    #[test]
    fn byte_rejects_out_of_range_values() {
        let registry = ParameterTypeRegistry::new();
        let Err(err) = lookup(&registry, "byte").transform(&[Some("300")]) else {
            panic!("300 does not fit in a byte");
        };
        assert!(matches!(
            err,
            TransformError::Conversion {
                target: TypeHint::I8,
                ..
            }
        ));
    }

    #[rstest]
    #[case(&[Some(r#"say \"hi\""#), None], r#"say "hi""#)]
    #[case(&[None, Some(r"it\'s")], "it's")]
    fn string_unquotes_whichever_alternative_matched(
        #[case] groups: &[Option<&str>],
        #[case] expected: &str,
    ) {
        let registry = ParameterTypeRegistry::new();
        let value = lookup(&registry, "string")
            .transform(groups)
            .unwrap_or_else(|err| panic!("string should transform: {err}"));
        assert_eq!(value.as_str(), Some(expected));
    }

    #[test]
    fn missing_group_is_reported() {
        let registry = ParameterTypeRegistry::new();
        let Err(err) = lookup(&registry, "int").transform(&[None]) else {
            panic!("an absent group cannot become an int");
        };
        assert!(matches!(err, TransformError::MissingValue { parameter } if parameter == "int"));
    }

    #[test]
    fn registers_anonymous_type_in_every_registry() {
        for registry in [ParameterTypeRegistry::new(), ParameterTypeRegistry::empty()] {
            let anonymous = lookup(&registry, "");
            assert!(anonymous.is_anonymous());
            assert_eq!(anonymous.regexps(), [".*"]);
        }
        assert!(ParameterTypeRegistry::empty()
            .lookup_by_type_name("int")
            .is_none());
    }

    #[test]
    fn rejects_duplicate_definitions() {
        let mut registry = ParameterTypeRegistry::new();
        let colour = || {
            ParameterType::new("colour", ["red|blue"], |_: &[Option<&str>]| Ok(Value::Absent))
                .unwrap_or_else(|err| panic!("colour should be valid: {err}"))
        };
        assert_eq!(registry.define_parameter_type(colour()), Ok(()));
        assert_eq!(
            registry.define_parameter_type(colour()),
            Err(RegistryError::DuplicateParameterType {
                name: "colour".into()
            })
        );
        let Err(err) = registry.define_parameter_type(builtin("int", &INTEGER_REGEXPS, unquote))
        else {
            panic!("built-in names are taken");
        };
        assert!(matches!(err, RegistryError::DuplicateParameterType { .. }));
    }

    #[test]
    fn debug_lists_sorted_names() {
        let rendered = format!("{:?}", ParameterTypeRegistry::empty());
        assert_eq!(rendered, r#"ParameterTypeRegistry { types: [""], .. }"#);
    }
}
