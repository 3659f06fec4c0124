//! Error types shared by the expression compiler, registry and matcher.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

use crate::hint::TypeHint;

/// Location and reason for a syntax error found while tokenizing or parsing.
///
/// # Examples
/// ```
/// use rstest_bdd_expressions::SyntaxErrorInfo;
/// let info = SyntaxErrorInfo::new("missing closing ')' for optional", 4, "an (x");
/// assert_eq!(info.position, 4);
/// assert_eq!(
///     info.to_string(),
///     "missing closing ')' for optional at byte 4 (zero-based) in `an (x`"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxErrorInfo {
    /// Human-readable reason for the failure.
    pub message: &'static str,
    /// Zero-based byte offset in the expression where parsing failed.
    pub position: usize,
    /// The expression being parsed, verbatim.
    pub expression: String,
}

impl SyntaxErrorInfo {
    /// Create a new syntax error description.
    #[must_use]
    pub fn new(message: &'static str, position: usize, expression: impl Into<String>) -> Self {
        Self {
            message,
            position,
            expression: expression.into(),
        }
    }
}

impl fmt::Display for SyntaxErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at byte {} (zero-based) in `{}`",
            self.message, self.position, self.expression
        )
    }
}

/// Errors raised while compiling an expression.
///
/// Every variant except [`Regex`](Self::Regex) names the offending expression
/// verbatim so messages can be shown directly to whoever wrote it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExpressionError {
    /// The expression text could not be tokenized or parsed.
    #[error("{0}")]
    Syntax(SyntaxErrorInfo),
    /// An optional contains no literal text.
    #[error("optional may not be empty: `{expression}`")]
    OptionalMayNotBeEmpty {
        /// The expression being compiled.
        expression: String,
    },
    /// A member of an alternation has no content at all.
    #[error("alternative may not be empty: `{expression}`")]
    AlternativeMayNotBeEmpty {
        /// The expression being compiled.
        expression: String,
    },
    /// A member of an alternation contains only optionals.
    #[error("alternative may not exclusively contain optionals: `{expression}`")]
    AlternativeMayNotExclusivelyContainOptionals {
        /// The expression being compiled.
        expression: String,
    },
    /// A parameter sits directly inside an optional.
    #[error("parameter types cannot be optional: `{expression}`")]
    ParameterTypeCannotBeOptional {
        /// The expression being compiled.
        expression: String,
    },
    /// A parameter sits directly inside an alternative.
    #[error("parameter types cannot be alternative: `{expression}`")]
    ParameterTypesCannotBeAlternative {
        /// The expression being compiled.
        expression: String,
    },
    /// A parameter name contains a character reserved by regular expressions.
    #[error(
        "illegal character in parameter name `{{{name}}}`; parameter names may not contain \
         '[', ']', '(', ')', '$', '.', '|', '?', '*' or '+': `{expression}`"
    )]
    InvalidParameterTypeName {
        /// The offending parameter name.
        name: String,
        /// The expression being compiled.
        expression: String,
    },
    /// A parameter names a type missing from the registry.
    #[error(
        "undefined parameter type `{{{name}}}` in `{expression}`; \
         register a parameter type named '{name}'"
    )]
    UndefinedParameterType {
        /// The unknown parameter type name.
        name: String,
        /// The expression being compiled.
        expression: String,
    },
    /// A node appeared where the rewriter cannot place it.
    #[error("could not rewrite `{expression}`")]
    CouldNotRewrite {
        /// The expression being compiled.
        expression: String,
    },
    /// The generated regular expression failed to compile.
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

impl ExpressionError {
    /// Return the expression the error refers to, when it carries one.
    #[must_use]
    pub fn expression(&self) -> Option<&str> {
        match self {
            Self::Syntax(info) => Some(&info.expression),
            Self::OptionalMayNotBeEmpty { expression }
            | Self::AlternativeMayNotBeEmpty { expression }
            | Self::AlternativeMayNotExclusivelyContainOptionals { expression }
            | Self::ParameterTypeCannotBeOptional { expression }
            | Self::ParameterTypesCannotBeAlternative { expression }
            | Self::InvalidParameterTypeName { expression, .. }
            | Self::UndefinedParameterType { expression, .. }
            | Self::CouldNotRewrite { expression } => Some(expression),
            Self::Regex(_) => None,
        }
    }
}

pub(crate) fn syntax_error(
    message: &'static str,
    position: usize,
    expression: &str,
) -> ExpressionError {
    ExpressionError::Syntax(SyntaxErrorInfo::new(message, position, expression))
}

/// Errors raised by a parameter type's transform.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransformError {
    /// The matched text could not be converted into the target type.
    #[error("cannot transform '{value}' to {target}: {reason}")]
    Conversion {
        /// The matched text.
        value: String,
        /// The type the text was converted into.
        target: TypeHint,
        /// Why the conversion failed.
        reason: String,
    },
    /// The transform received no matched text.
    #[error("no matched text was captured for parameter type '{parameter}'")]
    MissingValue {
        /// Name of the parameter type whose transform ran.
        parameter: String,
    },
    /// A custom transform rejected the matched text.
    #[error(transparent)]
    Custom(Box<dyn StdError + Send + Sync>),
}

impl TransformError {
    /// Wrap an error raised by a custom transform.
    #[must_use]
    pub fn custom(error: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Custom(error.into())
    }
}

/// Errors raised while matching text against a compiled expression.
///
/// Text that simply does not match is not an error; see
/// [`StepExpression::match_text`](crate::StepExpression::match_text).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MatchError {
    /// The text matched but an argument could not be transformed.
    #[error(
        "argument {position} ({{{parameter}}}) of `{expression}` could not be transformed: \
         {source}"
    )]
    Transform {
        /// Zero-based position of the parameter in the expression.
        position: usize,
        /// Name of the parameter type that failed.
        parameter: String,
        /// Source of the compiled expression.
        expression: String,
        /// The underlying transform failure.
        #[source]
        source: TransformError,
    },
}

/// Errors raised when defining parameter types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RegistryError {
    /// A parameter type with the same name is already registered.
    #[error("there is already a parameter type named '{name}'")]
    DuplicateParameterType {
        /// The duplicated name.
        name: String,
    },
    /// The parameter type name contains a reserved character.
    #[error(
        "illegal character in parameter name `{{{name}}}`; parameter names may not contain \
         '[', ']', '(', ')', '$', '.', '|', '?', '*' or '+'"
    )]
    InvalidParameterTypeName {
        /// The offending name.
        name: String,
    },
    /// The parameter type declares no capture fragments.
    #[error("parameter type '{name}' must declare at least one regular expression")]
    MissingRegexps {
        /// Name of the incomplete parameter type.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_syntax_errors_with_position_and_expression() {
        let info = SyntaxErrorInfo::new("oops", 1, "a {b");
        assert_eq!(info.to_string(), "oops at byte 1 (zero-based) in `a {b`");
        let err = ExpressionError::Syntax(info.clone());
        assert_eq!(err.to_string(), info.to_string());
        assert_eq!(err.expression(), Some("a {b"));
    }

    #[test]
    fn grammar_errors_embed_the_expression() {
        let err = ExpressionError::OptionalMayNotBeEmpty {
            expression: "three () mice".into(),
        };
        assert_eq!(err.to_string(), "optional may not be empty: `three () mice`");
        assert_eq!(err.expression(), Some("three () mice"));
    }

    #[test]
    fn undefined_parameter_type_names_type_and_expression() {
        let err = ExpressionError::UndefinedParameterType {
            name: "colour".into(),
            expression: "a {colour} ball".into(),
        };
        let message = err.to_string();
        assert!(message.contains("`{colour}`"), "{message}");
        assert!(message.contains("a {colour} ball"), "{message}");
    }

    #[test]
    fn forwards_regex_error_display() {
        let err = ExpressionError::Regex(regex::Error::Syntax("bad".into()));
        assert_eq!(
            err.to_string(),
            regex::Error::Syntax("bad".into()).to_string()
        );
        assert_eq!(err.expression(), None);
    }

    #[test]
    fn match_errors_expose_the_transform_failure() {
        let err = MatchError::Transform {
            position: 1,
            parameter: "int".into(),
            expression: "{int} and {int}".into(),
            source: TransformError::MissingValue {
                parameter: "int".into(),
            },
        };
        assert_eq!(
            err.to_string(),
            "argument 1 ({int}) of `{int} and {int}` could not be transformed: \
             no matched text was captured for parameter type 'int'"
        );
        assert!(StdError::source(&err).is_some());
    }
}
