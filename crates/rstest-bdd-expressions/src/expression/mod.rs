//! Step expressions: parsing, rewriting, compilation and matching.

mod ast;
mod lexer;
mod parser;
mod rewrite;
#[cfg(test)]
pub(crate) mod test_support;

use std::fmt;
use std::sync::Arc;

use regex::{Regex, RegexBuilder};

use crate::argument::{Argument, build_arguments};
use crate::capture::TreeRegexp;
use crate::config;
use crate::errors::{ExpressionError, MatchError, TransformError};
use crate::hint::TypeHint;
use crate::parameter::ParameterType;
use crate::registry::ParameterTypeRegistry;
use crate::transformer::ParameterByTypeTransformer;
use crate::value::Value;

pub use ast::{Node, NodeKind};
pub use parser::parse_expression;
pub use rewrite::{RewrittenExpression, rewrite_to_regex};

/// A compiled step expression.
///
/// Compilation parses the source, rewrites it into an anchored regex with
/// one capture group per parameter, and resolves every parameter name
/// against a registry. The result is immutable, so one expression may be
/// shared and matched from many threads at once.
///
/// # Examples
/// ```
/// use rstest_bdd_expressions::{ParameterTypeRegistry, StepExpression, Value};
///
/// let registry = ParameterTypeRegistry::new();
/// let expression = StepExpression::new("I have {int} cuke(s)", &registry)
///     .expect("expression should compile");
/// let arguments = expression
///     .match_text("I have 7 cukes", &[])
///     .expect("arguments should transform")
///     .expect("text should match");
/// assert_eq!(arguments.first().map(|a| a.value()), Some(&Value::I32(7)));
/// assert!(expression.match_text("I have many cukes", &[]).expect("no error").is_none());
/// ```
#[derive(Clone)]
pub struct StepExpression {
    source: String,
    parameter_types: Vec<Arc<ParameterType>>,
    tree_regexp: TreeRegexp,
    default_transformer: Arc<dyn ParameterByTypeTransformer>,
}

impl StepExpression {
    /// Compile `source` against the parameter types held by `registry`.
    ///
    /// The compiled regex is subject to [`config::regex_size_limit`].
    ///
    /// # Errors
    /// Returns [`ExpressionError`] when the expression is malformed, names an
    /// invalid or unknown parameter type, or the generated regex cannot be
    /// compiled.
    pub fn new(
        source: impl Into<String>,
        registry: &ParameterTypeRegistry,
    ) -> Result<Self, ExpressionError> {
        let source = source.into();
        let ast = parse_expression(&source)?;
        let rewritten = rewrite_to_regex(&ast, &source, registry)?;
        let regex = RegexBuilder::new(&rewritten.regex)
            .size_limit(config::regex_size_limit())
            .build()?;
        log::debug!("compiled step expression `{source}` to {}", regex.as_str());
        Ok(Self {
            source,
            parameter_types: rewritten.parameter_types,
            tree_regexp: TreeRegexp::new(regex),
            default_transformer: registry.default_transformer(),
        })
    }

    /// Match `text` and transform each captured argument.
    ///
    /// `hints[i]` chooses the value type of the `i`th parameter when that
    /// parameter is anonymous (`{}`); missing hints default to
    /// [`TypeHint::String`]. Hints for named parameters are ignored.
    ///
    /// Returns `Ok(None)` when the text does not match.
    ///
    /// # Errors
    /// Returns [`MatchError::Transform`] when the text matches but an
    /// argument cannot be transformed.
    pub fn match_text(
        &self,
        text: &str,
        hints: &[TypeHint],
    ) -> Result<Option<Vec<Argument>>, MatchError> {
        let parameter_types: Vec<Arc<ParameterType>> = self
            .parameter_types
            .iter()
            .enumerate()
            .map(|(position, parameter_type)| {
                if !parameter_type.is_anonymous() {
                    return Arc::clone(parameter_type);
                }
                let hint = hints.get(position).copied().unwrap_or_default();
                log::trace!(
                    "resolving anonymous parameter {position} of `{}` as {hint}",
                    self.source
                );
                Arc::new(self.resolve_anonymous(parameter_type, hint))
            })
            .collect();
        build_arguments(&self.tree_regexp, text, &parameter_types, &self.source)
    }

    fn resolve_anonymous(&self, parameter_type: &ParameterType, hint: TypeHint) -> ParameterType {
        let transformer = Arc::clone(&self.default_transformer);
        parameter_type.de_anonymize(
            hint,
            Arc::new(
                move |groups: &[Option<&str>]| -> Result<Value, TransformError> {
                    transformer.transform(groups.first().copied().flatten(), hint)
                },
            ),
        )
    }

    /// The expression source.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The compiled regex.
    #[must_use]
    pub const fn regex(&self) -> &Regex {
        self.tree_regexp.regex()
    }

    /// The compiled regex source.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.tree_regexp.regex().as_str()
    }

    /// Parameter types in the order their placeholders appear. Anonymous
    /// parameters keep their unresolved type here.
    #[must_use]
    pub fn parameter_types(&self) -> &[Arc<ParameterType>] {
        &self.parameter_types
    }
}

impl fmt::Debug for StepExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepExpression")
            .field("source", &self.source)
            .field("pattern", &self.pattern())
            .field("parameter_types", &self.parameter_types)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for StepExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn compile(source: &str) -> StepExpression {
        StepExpression::new(source, &ParameterTypeRegistry::new())
            .unwrap_or_else(|err| panic!("`{source}` should compile: {err}"))
    }

    fn values(expression: &StepExpression, text: &str, hints: &[TypeHint]) -> Vec<Value> {
        match expression.match_text(text, hints) {
            Ok(Some(arguments)) => arguments.into_iter().map(Argument::into_value).collect(),
            Ok(None) => panic!("`{expression}` should match {text:?}"),
            Err(err) => panic!("`{expression}` should transform {text:?}: {err}"),
        }
    }

    #[test]
    fn exposes_source_and_pattern() {
        let expression = compile("I have {int} cuke(s)");
        assert_eq!(expression.source(), "I have {int} cuke(s)");
        assert_eq!(
            expression.pattern(),
            r"^I have ((?:-?\d+)|(?:\d+)) cuke(?:s)?$"
        );
        assert_eq!(expression.regex().as_str(), expression.pattern());
        assert_eq!(expression.to_string(), "I have {int} cuke(s)");
        let names: Vec<&str> = expression
            .parameter_types()
            .iter()
            .map(|p| p.name())
            .collect();
        assert_eq!(names, vec!["int"]);
    }

    #[rstest]
    #[case(TypeHint::String, Value::from("42"))]
    #[case(TypeHint::I64, Value::I64(42))]
    #[case(TypeHint::U8, Value::U8(42))]
    #[case(TypeHint::F64, Value::F64(42.0))]
    fn anonymous_parameters_follow_the_hint(#[case] hint: TypeHint, #[case] expected: Value) {
        let expression = compile("{} items");
        assert_eq!(values(&expression, "42 items", &[hint]), vec![expected]);
    }

    #[test]
    fn missing_hints_default_to_string() {
        let expression = compile("{} and {}");
        assert_eq!(
            values(&expression, "1 and 2", &[TypeHint::I32]),
            vec![Value::I32(1), Value::from("2")]
        );
    }

    #[test]
    fn hints_do_not_alter_the_compiled_expression() {
        let expression = compile("{int} then {}");
        assert_eq!(
            values(&expression, "1 then 2", &[TypeHint::String, TypeHint::U32]),
            vec![Value::I32(1), Value::U32(2)]
        );
        assert_eq!(
            values(&expression, "1 then 2", &[]),
            vec![Value::I32(1), Value::from("2")]
        );
        let stored = expression.parameter_types().get(1);
        assert!(stored.is_some_and(|p| p.is_anonymous() && p.name().is_empty()));
    }

    #[test]
    fn resolved_anonymous_arguments_report_their_hint() {
        let expression = compile("{}");
        let Ok(Some(arguments)) = expression.match_text("9", &[TypeHint::U16]) else {
            panic!("`{{}}` should match");
        };
        let resolved = arguments.first().map(Argument::parameter_type);
        assert!(resolved.is_some_and(|p| p.type_hint() == Some(TypeHint::U16)));
        assert!(resolved.is_some_and(|p| p.name() == crate::ANONYMOUS_NAME));
    }

    #[test]
    fn named_parameters_ignore_hints() {
        let expression = compile("{int}");
        assert_eq!(values(&expression, "5", &[TypeHint::String]), vec![Value::I32(5)]);
    }

    #[test]
    fn conversion_failures_are_errors_not_mismatches() {
        let expression = compile("{} items");
        let Err(err) = expression.match_text("300 items", &[TypeHint::U8]) else {
            panic!("300 does not fit in a u8");
        };
        let MatchError::Transform {
            position, source, ..
        } = err;
        assert_eq!(position, 0);
        assert!(matches!(
            source,
            TransformError::Conversion {
                target: TypeHint::U8,
                ..
            }
        ));
    }

    #[rstest]
    #[case("{unknown}")]
    #[case("(x)/y")]
    #[case("{int")]
    fn rejects_bad_expressions(#[case] source: &str) {
        assert!(StepExpression::new(source, &ParameterTypeRegistry::new()).is_err());
    }
}
