//! Test helpers for asserting expression parser outcomes.
use super::ast::Node;
use super::parser::parse_expression;
use crate::errors::ExpressionError;

pub(crate) fn parse_ok(expression: &str) -> Node {
    match parse_expression(expression) {
        Ok(node) => node,
        Err(err) => panic!("expression should parse: {err}"),
    }
}

pub(crate) fn parse_err(expression: &str) -> ExpressionError {
    match parse_expression(expression) {
        Ok(node) => panic!("expression parsing should fail, got {node:?}"),
        Err(err) => err,
    }
}
