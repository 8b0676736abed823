//! Tokenizer for filter expressions.
//!
//! At each position the categories are tried in a fixed order and the first
//! one that matches wins:
//!
//! 1. whitespace and commas (discarded)
//! 2. `(` and `)`
//! 3. identifiers and keywords: `[A-Za-z_][A-Za-z0-9_]*`
//! 4. signed decimal numbers: `[+-]?[0-9]+(\.[0-9]+)?`
//! 5. double-quoted strings, where `\` escapes the next character
//! 6. runs of comparison characters `=`, `!`, `<`, `>`
//!
//! There is no backtracking. Anything else, including a string that never
//! closes, stops the tokenizer with [`ParseError::Tokenize`].

use std::fmt;

use crate::error::ParseError;

/// The category and text of a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    LParen,
    RParen,
    /// Identifier or keyword (`AND`, `OR`, `IN`, `NOT`, `MATCH`, `true`, ...).
    Ident(String),
    /// Number as written, sign included.
    Number(String),
    /// String literal with escapes resolved.
    Str(String),
    /// Run of comparison characters, not yet validated.
    Operator(String),
}

/// A token and the byte offset where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

impl Token {
    /// Returns the identifier text if this token is an identifier.
    pub fn ident(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Ident(word) => Some(word),
            _ => None,
        }
    }

    /// Returns `true` if this token is the given keyword, ignoring case.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.ident()
            .is_some_and(|word| word.eq_ignore_ascii_case(keyword))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::Ident(s) | TokenKind::Number(s) | TokenKind::Operator(s) => {
                f.write_str(s)
            }
            TokenKind::Str(s) => write!(f, "{s:?}"),
        }
    }
}

/// Splits an expression into tokens.
///
/// # Example
///
/// ```
/// use sieve::lexer::{tokenize, TokenKind};
///
/// let tokens = tokenize(r#"name != "x""#).unwrap();
/// assert_eq!(tokens.len(), 3);
/// assert_eq!(tokens[1].kind, TokenKind::Operator("!=".into()));
/// ```
pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    Lexer::new(input).run()
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            tokens: Vec::new(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn run(mut self) -> Result<Vec<Token>, ParseError> {
        while let Some(ch) = self.peek() {
            let start = self.pos;

            if ch.is_whitespace() || ch == ',' {
                self.pos += ch.len_utf8();
                continue;
            }

            let kind = if ch == '(' {
                self.pos += 1;
                TokenKind::LParen
            } else if ch == ')' {
                self.pos += 1;
                TokenKind::RParen
            } else if let Some(word) = self.read_word() {
                TokenKind::Ident(word)
            } else if let Some(number) = self.read_number() {
                TokenKind::Number(number)
            } else if ch == '"' {
                match self.read_string() {
                    Some(s) => TokenKind::Str(s),
                    None => return Err(self.fail(start, ch)),
                }
            } else if let Some(op) = self.read_operator() {
                TokenKind::Operator(op)
            } else {
                return Err(self.fail(start, ch));
            };

            self.tokens.push(Token {
                kind,
                offset: start,
            });
        }

        Ok(self.tokens)
    }

    fn fail(self, offset: usize, ch: char) -> ParseError {
        ParseError::Tokenize {
            offset,
            ch,
            tokens: self.tokens,
        }
    }

    /// Consumes `len` bytes and returns them.
    fn take(&mut self, len: usize) -> String {
        let text = self.rest()[..len].to_string();
        self.pos += len;
        text
    }

    fn read_word(&mut self) -> Option<String> {
        let rest = self.rest();
        let first = rest.chars().next()?;
        if !(first.is_ascii_alphabetic() || first == '_') {
            return None;
        }
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        Some(self.take(len))
    }

    fn read_number(&mut self) -> Option<String> {
        let bytes = self.rest().as_bytes();
        let mut len = 0;
        if matches!(bytes.first(), Some(b'+' | b'-')) {
            len += 1;
        }
        let digits = count_digits(&bytes[len..]);
        if digits == 0 {
            return None;
        }
        len += digits;
        if bytes.get(len) == Some(&b'.') {
            let fraction = count_digits(&bytes[len + 1..]);
            if fraction > 0 {
                len += 1 + fraction;
            }
        }
        Some(self.take(len))
    }

    /// Reads a quoted string. Returns `None` if the closing quote is missing.
    fn read_string(&mut self) -> Option<String> {
        let mut value = String::new();
        let mut chars = self.rest().char_indices().skip(1);
        while let Some((i, ch)) = chars.next() {
            match ch {
                '"' => {
                    self.pos += i + 1;
                    return Some(value);
                }
                '\\' => {
                    let (_, escaped) = chars.next()?;
                    value.push(escaped);
                }
                other => value.push(other),
            }
        }
        None
    }

    fn read_operator(&mut self) -> Option<String> {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !matches!(c, '=' | '!' | '<' | '>'))
            .unwrap_or(rest.len());
        (len > 0).then(|| self.take(len))
    }
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn ident(s: &str) -> TokenKind {
        TokenKind::Ident(s.to_string())
    }

    fn num(s: &str) -> TokenKind {
        TokenKind::Number(s.to_string())
    }

    fn op(s: &str) -> TokenKind {
        TokenKind::Operator(s.to_string())
    }

    #[test]
    fn simple_clause() {
        assert_eq!(
            kinds("A = 1 AND B != 2"),
            vec![
                ident("A"),
                op("="),
                num("1"),
                ident("AND"),
                ident("B"),
                op("!="),
                num("2"),
            ]
        );
    }

    #[test]
    fn commas_and_whitespace_are_discarded() {
        assert_eq!(
            kinds("x IN (1,2 ,\t3)"),
            vec![
                ident("x"),
                ident("IN"),
                TokenKind::LParen,
                num("1"),
                num("2"),
                num("3"),
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn signed_and_decimal_numbers() {
        assert_eq!(kinds("-12 +3 4.25"), vec![num("-12"), num("+3"), num("4.25")]);
    }

    #[test]
    fn trailing_dot_is_not_part_of_a_number() {
        let err = tokenize("1.").unwrap_err();
        match err {
            ParseError::Tokenize { offset, ch, tokens } => {
                assert_eq!(offset, 1);
                assert_eq!(ch, '.');
                assert_eq!(tokens.len(), 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn identifiers_win_over_numbers() {
        assert_eq!(kinds("_a1 a_b"), vec![ident("_a1"), ident("a_b")]);
    }

    #[test]
    fn strings_with_escapes() {
        assert_eq!(
            kinds(r#""a \"quoted\" \\ word""#),
            vec![TokenKind::Str(r#"a "quoted" \ word"#.to_string())]
        );
        assert_eq!(kinds(r#""""#), vec![TokenKind::Str(String::new())]);
    }

    #[test]
    fn unterminated_string_fails_at_the_quote() {
        let err = tokenize(r#"name = "abc"#).unwrap_err();
        match err {
            ParseError::Tokenize { offset, ch, tokens } => {
                assert_eq!(offset, 7);
                assert_eq!(ch, '"');
                assert_eq!(tokens.len(), 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn operator_runs_are_not_validated() {
        assert_eq!(kinds("a =< b"), vec![ident("a"), op("=<"), ident("b")]);
        assert_eq!(kinds("a>=1"), vec![ident("a"), op(">="), num("1")]);
    }

    #[test]
    fn unknown_character_keeps_prior_tokens() {
        let err = tokenize("a = 1 & b").unwrap_err();
        assert_eq!(err.code(), crate::ErrorCode::TokenizeError);
        match err {
            ParseError::Tokenize { offset, ch, tokens } => {
                assert_eq!(offset, 6);
                assert_eq!(ch, '&');
                assert_eq!(tokens.len(), 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn lone_sign_is_rejected() {
        assert!(tokenize("a = -").is_err());
    }

    #[test]
    fn offsets_are_byte_positions() {
        let tokens = tokenize("  ab  \"c\"").unwrap();
        assert_eq!(tokens[0].offset, 2);
        assert_eq!(tokens[1].offset, 6);
    }

    #[test]
    fn keywords_ignore_case() {
        let tokens = tokenize("and Or").unwrap();
        assert!(tokens[0].is_keyword("AND"));
        assert!(tokens[1].is_keyword("OR"));
        assert_eq!(tokens[1].to_string(), "Or");
    }
}
