//! Expression lexer converting expression strings into tokens.

use crate::errors::{ExpressionError, syntax_error};

const CANT_ESCAPE: &str = "only '(', ')', '{', '}', '/', '\\' and whitespace can be escaped";
const END_OF_LINE_ESCAPE: &str = "the end of the expression cannot be escaped";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    WhiteSpace,
    Text,
    BeginOptional,
    EndOptional,
    BeginParameter,
    EndParameter,
    Alternation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// Unescaped text of the token.
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl Token {
    fn new(kind: TokenKind, ch: char, start: usize, end: usize) -> Self {
        Self {
            kind,
            text: ch.to_string(),
            start,
            end,
        }
    }
}

fn is_escapable(ch: char) -> bool {
    matches!(ch, '(' | ')' | '{' | '}' | '/' | '\\') || ch.is_whitespace()
}

fn kind_of(ch: char) -> TokenKind {
    match ch {
        '(' => TokenKind::BeginOptional,
        ')' => TokenKind::EndOptional,
        '{' => TokenKind::BeginParameter,
        '}' => TokenKind::EndParameter,
        '/' => TokenKind::Alternation,
        c if c.is_whitespace() => TokenKind::WhiteSpace,
        _ => TokenKind::Text,
    }
}

pub(crate) fn lex_expression(expression: &str) -> Result<Vec<Token>, ExpressionError> {
    let mut tokens = Vec::new();
    let mut run: Option<Token> = None;
    let mut chars = expression.char_indices();

    let flush_run = |run: &mut Option<Token>, tokens: &mut Vec<Token>| {
        if let Some(token) = run.take() {
            tokens.push(token);
        }
    };

    while let Some((start, ch)) = chars.next() {
        let (ch, kind, end) = if ch == '\\' {
            let Some((next_start, next)) = chars.next() else {
                return Err(syntax_error(END_OF_LINE_ESCAPE, start, expression));
            };
            if !is_escapable(next) {
                return Err(syntax_error(CANT_ESCAPE, start, expression));
            }
            // Escaped characters, whitespace included, are plain text.
            (next, TokenKind::Text, next_start + next.len_utf8())
        } else {
            (ch, kind_of(ch), start + ch.len_utf8())
        };

        if !matches!(kind, TokenKind::Text | TokenKind::WhiteSpace) {
            flush_run(&mut run, &mut tokens);
            tokens.push(Token::new(kind, ch, start, end));
            continue;
        }
        if let Some(pending) = run.as_mut().filter(|pending| pending.kind == kind) {
            pending.text.push(ch);
            pending.end = end;
            continue;
        }
        flush_run(&mut run, &mut tokens);
        run = Some(Token::new(kind, ch, start, end));
    }

    flush_run(&mut run, &mut tokens);
    Ok(tokens)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests exercise lexing fallibility")]
mod tests {
    use super::*;

    fn token(kind: TokenKind, text: &str, start: usize, end: usize) -> Token {
        Token {
            kind,
            text: text.into(),
            start,
            end,
        }
    }

    #[test]
    fn tokenises_text_whitespace_and_structure() {
        let tokens = lex_expression("I have {int} cuke(s)").unwrap();
        assert_eq!(
            tokens,
            vec![
                token(TokenKind::Text, "I", 0, 1),
                token(TokenKind::WhiteSpace, " ", 1, 2),
                token(TokenKind::Text, "have", 2, 6),
                token(TokenKind::WhiteSpace, " ", 6, 7),
                token(TokenKind::BeginParameter, "{", 7, 8),
                token(TokenKind::Text, "int", 8, 11),
                token(TokenKind::EndParameter, "}", 11, 12),
                token(TokenKind::WhiteSpace, " ", 12, 13),
                token(TokenKind::Text, "cuke", 13, 17),
                token(TokenKind::BeginOptional, "(", 17, 18),
                token(TokenKind::Text, "s", 18, 19),
                token(TokenKind::EndOptional, ")", 19, 20),
            ]
        );
    }

    #[test]
    fn escaped_characters_join_the_surrounding_text() {
        let tokens = lex_expression(r"a\(b\/c\ d").unwrap();
        assert_eq!(tokens, vec![token(TokenKind::Text, "a(b/c d", 0, 10)]);
    }

    #[test]
    fn records_alternation_separators() {
        let tokens = lex_expression("cat/dog").unwrap();
        assert_eq!(
            tokens,
            vec![
                token(TokenKind::Text, "cat", 0, 3),
                token(TokenKind::Alternation, "/", 3, 4),
                token(TokenKind::Text, "dog", 4, 7),
            ]
        );
    }

    #[test]
    fn keeps_byte_offsets_for_multibyte_text() {
        let tokens = lex_expression("café {word}").unwrap();
        assert_eq!(tokens.first(), Some(&token(TokenKind::Text, "café", 0, 5)));
        assert_eq!(
            tokens.get(2),
            Some(&token(TokenKind::BeginParameter, "{", 6, 7))
        );
    }

    #[test]
    fn errors_on_unsupported_escape() {
        let err = lex_expression(r"a \d").unwrap_err();
        assert!(err.to_string().contains("can be escaped"), "{err}");
        assert!(err.to_string().contains("at byte 2"), "{err}");
    }

    #[test]
    fn errors_on_trailing_backslash() {
        let err = lex_expression("a \\").unwrap_err();
        assert!(
            err.to_string()
                .contains("the end of the expression cannot be escaped"),
            "{err}"
        );
    }
}
