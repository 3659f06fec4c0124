//! Convert an expression tree into an anchored regular-expression source.

use std::sync::Arc;

use crate::errors::ExpressionError;
use crate::parameter::{ParameterType, is_valid_parameter_type_name};
use crate::registry::ParameterTypeRegistry;

use super::ast::{Node, NodeKind};

const REGEX_META: [char; 14] = [
    '\\', '^', '[', '(', '{', '$', '.', '|', '?', '*', '+', '}', ')', ']',
];

/// Regex source produced from an expression tree.
#[derive(Debug, Clone)]
pub struct RewrittenExpression {
    /// Anchored regular-expression source.
    pub regex: String,
    /// Parameter types in the order their placeholders appear.
    pub parameter_types: Vec<Arc<ParameterType>>,
}

/// Rewrite a parsed expression into a regex source and its parameter types.
///
/// `expression` is the source text the tree was parsed from; it is quoted in
/// error messages.
///
/// # Errors
/// Returns [`ExpressionError`] when the tree breaks a grammar rule (empty or
/// parameter-bearing optionals and alternatives), names an invalid or unknown
/// parameter type, or places a node where it cannot be rewritten.
///
/// # Examples
/// ```
/// use rstest_bdd_expressions::{ParameterTypeRegistry, parse_expression, rewrite_to_regex};
///
/// let registry = ParameterTypeRegistry::new();
/// let source = "I have {int} cuke(s)";
/// let ast = parse_expression(source).expect("expression should parse");
/// let rewritten = rewrite_to_regex(&ast, source, &registry).expect("expression should rewrite");
/// assert_eq!(rewritten.regex, r"^I have ((?:-?\d+)|(?:\d+)) cuke(?:s)?$");
/// assert_eq!(rewritten.parameter_types.len(), 1);
/// ```
pub fn rewrite_to_regex(
    node: &Node,
    expression: &str,
    registry: &ParameterTypeRegistry,
) -> Result<RewrittenExpression, ExpressionError> {
    let mut rewriter = Rewriter {
        expression,
        registry,
        parameter_types: Vec::new(),
    };
    let regex = rewriter.rewrite(node)?;
    Ok(RewrittenExpression {
        regex,
        parameter_types: rewriter.parameter_types,
    })
}

struct Rewriter<'a> {
    expression: &'a str,
    registry: &'a ParameterTypeRegistry,
    parameter_types: Vec<Arc<ParameterType>>,
}

impl Rewriter<'_> {
    fn rewrite(&mut self, node: &Node) -> Result<String, ExpressionError> {
        match &node.kind {
            NodeKind::Text(text) => Ok(escape_regex(text)),
            NodeKind::Optional(children) => self.rewrite_optional(children),
            NodeKind::Alternation(alternatives) => self.rewrite_alternation(alternatives),
            NodeKind::Alternative(children) => self.rewrite_all(children, "", "", ""),
            NodeKind::Parameter(name) => self.rewrite_parameter(name),
            NodeKind::Expression(children) => self.rewrite_all(children, "", "^", "$"),
        }
    }

    fn rewrite_optional(&mut self, children: &[Node]) -> Result<String, ExpressionError> {
        if children.iter().any(Node::is_parameter) {
            return Err(ExpressionError::ParameterTypeCannotBeOptional {
                expression: self.expression.to_string(),
            });
        }
        if !children.iter().any(Node::is_text) {
            return Err(ExpressionError::OptionalMayNotBeEmpty {
                expression: self.expression.to_string(),
            });
        }
        self.rewrite_all(children, "", "(?:", ")?")
    }

    fn rewrite_alternation(&mut self, alternatives: &[Node]) -> Result<String, ExpressionError> {
        for alternative in alternatives {
            let NodeKind::Alternative(children) = &alternative.kind else {
                return Err(ExpressionError::CouldNotRewrite {
                    expression: self.expression.to_string(),
                });
            };
            if children.is_empty() {
                return Err(ExpressionError::AlternativeMayNotBeEmpty {
                    expression: self.expression.to_string(),
                });
            }
            if children.iter().any(Node::is_parameter) {
                return Err(ExpressionError::ParameterTypesCannotBeAlternative {
                    expression: self.expression.to_string(),
                });
            }
            if !children.iter().any(Node::is_text) {
                return Err(ExpressionError::AlternativeMayNotExclusivelyContainOptionals {
                    expression: self.expression.to_string(),
                });
            }
        }
        self.rewrite_all(alternatives, "|", "(?:", ")")
    }

    fn rewrite_parameter(&mut self, name: &str) -> Result<String, ExpressionError> {
        if !is_valid_parameter_type_name(name) {
            return Err(ExpressionError::InvalidParameterTypeName {
                name: name.to_string(),
                expression: self.expression.to_string(),
            });
        }
        let parameter_type = self.registry.lookup_by_type_name(name).ok_or_else(|| {
            ExpressionError::UndefinedParameterType {
                name: name.to_string(),
                expression: self.expression.to_string(),
            }
        })?;
        let capture = capture_group(parameter_type.regexps());
        self.parameter_types.push(parameter_type);
        Ok(capture)
    }

    fn rewrite_all(
        &mut self,
        nodes: &[Node],
        delimiter: &str,
        prefix: &str,
        suffix: &str,
    ) -> Result<String, ExpressionError> {
        let mut regex = String::from(prefix);
        for (index, node) in nodes.iter().enumerate() {
            if index > 0 {
                regex.push_str(delimiter);
            }
            regex.push_str(&self.rewrite(node)?);
        }
        regex.push_str(suffix);
        Ok(regex)
    }
}

/// Backslash-escape every regex metacharacter in literal text.
fn escape_regex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len().saturating_mul(2));
    for ch in text.chars() {
        if REGEX_META.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Wrap a parameter type's fragments in exactly one capturing group.
fn capture_group(regexps: &[String]) -> String {
    match regexps {
        [single] => format!("({single})"),
        many => {
            let alternatives: Vec<String> = many.iter().map(|r| format!("(?:{r})")).collect();
            format!("({})", alternatives.join("|"))
        }
    }
}
