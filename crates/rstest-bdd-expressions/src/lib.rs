//! Step-expression compilation and typed argument extraction for rstest-bdd.
//!
//! A step expression is a human-readable pattern such as
//! `I have {int} cuke(s) in my belly/stomach`. The crate parses expressions
//! into a syntax tree, rewrites the tree into an anchored regular expression,
//! and matches step text against it, transforming each captured parameter
//! into a typed [`Value`].
//!
//! Parameter types are resolved through an explicit
//! [`ParameterTypeRegistry`]. Anonymous `{}` parameters take their value type
//! from a per-call [`TypeHint`], so one compiled expression can serve callers
//! expecting different types.

mod argument;
mod capture;
pub mod config;
mod errors;
mod expression;
mod hint;
mod parameter;
mod registry;
mod transformer;
mod value;

pub use argument::Argument;
pub use capture::{Group, GroupBuilder, TreeRegexp, create_group_builder};
pub use errors::{
    ExpressionError, MatchError, RegistryError, SyntaxErrorInfo, TransformError,
};
pub use expression::{
    Node, NodeKind, RewrittenExpression, StepExpression, parse_expression, rewrite_to_regex,
};
pub use hint::{TypeHint, TypeHintParseError};
pub use parameter::{ANONYMOUS_NAME, ParameterType, Transform, is_valid_parameter_type_name};
pub use registry::ParameterTypeRegistry;
pub use transformer::{BuiltInParameterTransformer, ParameterByTypeTransformer};
pub use value::Value;
