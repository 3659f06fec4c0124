//! Recursive-descent parser turning lexed tokens into an expression tree.
//!
//! Grammar, informally:
//!
//! ```text
//! expression  := ( alternation | optional | parameter | text )*
//! alternation := (?<=left-boundary) alternative* ( '/' alternative* )+ (?=right-boundary)
//! left-boundary  := whitespace | '}' | start
//! right-boundary := whitespace | '{' | end
//! alternative := optional | parameter | text
//! optional    := '(' ( optional | parameter | text )* ')'
//! parameter   := '{' ( whitespace | text )* '}'
//! ```

use crate::errors::{ExpressionError, syntax_error};

use super::ast::{Node, NodeKind};
use super::lexer::{Token, TokenKind, lex_expression};

const MISSING_END_OF_OPTIONAL: &str = "missing closing ')' for optional";
const MISSING_END_OF_PARAMETER: &str = "missing closing '}' for parameter";
const ALTERNATION_IN_OPTIONAL: &str =
    "an alternation can not be used inside an optional; escape '/' as '\\/' to match it literally";
const INVALID_PARAMETER_CONTENT: &str =
    "parameter names may not contain '(', ')', '{' or '/'";

/// Parse expression text into a tree rooted at [`NodeKind::Expression`].
///
/// # Errors
/// Returns [`ExpressionError::Syntax`] for unsupported escapes and for
/// optionals or parameters that are unterminated or malformed.
///
/// # Examples
/// ```
/// use rstest_bdd_expressions::{NodeKind, parse_expression};
///
/// let ast = parse_expression("{int} cuke(s)").expect("expression should parse");
/// assert!(matches!(ast.kind, NodeKind::Expression(_)));
/// assert_eq!(ast.children().len(), 4);
/// assert_eq!(ast.children().first().and_then(|n| n.text()), Some("int"));
/// ```
pub fn parse_expression(expression: &str) -> Result<Node, ExpressionError> {
    let tokens = lex_expression(expression)?;
    let mut parser = Parser {
        expression,
        tokens,
        pos: 0,
    };
    let mut children = Vec::new();
    while parser.peek().is_some() {
        children.push(parser.parse_top_level()?);
    }
    Ok(Node::new(
        NodeKind::Expression(children),
        0,
        expression.len(),
    ))
}

struct Parser<'a> {
    expression: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|token| token.kind)
    }

    fn next_token(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn at_left_boundary(&self) -> bool {
        self.pos
            .checked_sub(1)
            .and_then(|prev| self.tokens.get(prev))
            .is_none_or(|prev| {
                matches!(prev.kind, TokenKind::WhiteSpace | TokenKind::EndParameter)
            })
    }

    /// Byte offset where the next token starts, or the end of input.
    fn offset(&self) -> usize {
        self.peek()
            .map_or_else(|| self.expression.len(), |token| token.start)
    }

    /// Consume the current token, returning the offset just past it.
    fn consume(&mut self) -> usize {
        self.next_token()
            .map_or_else(|| self.expression.len(), |token| token.end)
    }

    fn parse_top_level(&mut self) -> Result<Node, ExpressionError> {
        if self.at_left_boundary() && self.peek_kind() != Some(TokenKind::WhiteSpace) {
            if let Some(alternation) = self.try_parse_alternation()? {
                return Ok(alternation);
            }
        }
        match self.peek_kind() {
            Some(TokenKind::BeginOptional) => self.parse_optional(),
            Some(TokenKind::BeginParameter) => self.parse_parameter(),
            _ => Ok(self.parse_text()),
        }
    }

    /// Parse an alternation starting at the current token, rewinding when the
    /// run up to the next boundary contains no `/`.
    fn try_parse_alternation(&mut self) -> Result<Option<Node>, ExpressionError> {
        let checkpoint = self.pos;
        let start = self.offset();
        let mut items: Vec<Option<Node>> = Vec::new();
        let mut separators = Vec::new();

        loop {
            match self.peek_kind() {
                None | Some(TokenKind::WhiteSpace | TokenKind::BeginParameter) => break,
                Some(TokenKind::Alternation) => {
                    if let Some(token) = self.next_token() {
                        separators.push((token.start, token.end));
                    }
                    items.push(None);
                }
                Some(TokenKind::BeginOptional) => items.push(Some(self.parse_optional()?)),
                Some(_) => items.push(Some(self.parse_text())),
            }
        }

        if separators.is_empty() {
            self.pos = checkpoint;
            return Ok(None);
        }
        let end = self.offset();
        Ok(Some(Node::new(
            NodeKind::Alternation(split_alternatives(start, end, items, &separators)),
            start,
            end,
        )))
    }

    fn parse_optional(&mut self) -> Result<Node, ExpressionError> {
        let start = self.offset();
        self.consume();
        let mut children = Vec::new();
        loop {
            match self.peek_kind() {
                None => {
                    return Err(syntax_error(MISSING_END_OF_OPTIONAL, start, self.expression));
                }
                Some(TokenKind::EndOptional) => {
                    let end = self.consume();
                    return Ok(Node::new(NodeKind::Optional(children), start, end));
                }
                Some(TokenKind::BeginOptional) => children.push(self.parse_optional()?),
                Some(TokenKind::BeginParameter) => children.push(self.parse_parameter()?),
                Some(TokenKind::Alternation) => {
                    return Err(syntax_error(
                        ALTERNATION_IN_OPTIONAL,
                        self.offset(),
                        self.expression,
                    ));
                }
                Some(_) => children.push(self.parse_text()),
            }
        }
    }

    fn parse_parameter(&mut self) -> Result<Node, ExpressionError> {
        let start = self.offset();
        self.consume();
        let mut name = String::new();
        loop {
            match self.peek_kind() {
                None => {
                    return Err(syntax_error(MISSING_END_OF_PARAMETER, start, self.expression));
                }
                Some(TokenKind::EndParameter) => {
                    let end = self.consume();
                    return Ok(Node::new(NodeKind::Parameter(name), start, end));
                }
                Some(TokenKind::Text | TokenKind::WhiteSpace) => {
                    if let Some(token) = self.next_token() {
                        name.push_str(&token.text);
                    }
                }
                Some(_) => {
                    return Err(syntax_error(
                        INVALID_PARAMETER_CONTENT,
                        self.offset(),
                        self.expression,
                    ));
                }
            }
        }
    }

    /// Consume one token as literal text.
    fn parse_text(&mut self) -> Node {
        let offset = self.offset();
        self.next_token().map_or_else(
            || Node::new(NodeKind::Text(String::new()), offset, offset),
            |token| Node::new(NodeKind::Text(token.text), token.start, token.end),
        )
    }
}

/// Group the nodes between separators into [`NodeKind::Alternative`]s.
///
/// `items` holds `None` where a separator was consumed.
fn split_alternatives(
    start: usize,
    end: usize,
    items: Vec<Option<Node>>,
    separators: &[(usize, usize)],
) -> Vec<Node> {
    let mut alternatives = Vec::with_capacity(separators.len() + 1);
    let mut current = Vec::new();
    let mut alternative_start = start;
    let mut boundaries = separators.iter();

    for item in items {
        if let Some(node) = item {
            current.push(node);
            continue;
        }
        let (sep_start, sep_end) = boundaries.next().copied().unwrap_or((end, end));
        alternatives.push(Node::new(
            NodeKind::Alternative(std::mem::take(&mut current)),
            alternative_start,
            sep_start,
        ));
        alternative_start = sep_end;
    }
    alternatives.push(Node::new(
        NodeKind::Alternative(current),
        alternative_start,
        end,
    ));
    alternatives
}
