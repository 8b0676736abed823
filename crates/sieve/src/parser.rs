//! Expression parser.
//!
//! Grammar:
//!
//! ```text
//! expr   := clause ( ["AND" | "OR"] clause )*
//! clause := field op value
//!         | field ("IN" | "NOT" "IN") "(" value+ ")"
//!         | field ("MATCH" | "NOT" "MATCH") string
//! op     := "=" | "!=" | "<" | "<=" | ">" | ">="
//! ```
//!
//! There is no precedence. Clauses are folded left to right, each one
//! joined to the result so far by the most recent `AND`/`OR` keyword, or by
//! `AND` before any keyword has been seen. `A = 1 OR B = 2 AND C = 3` means
//! `(A = 1 OR B = 2) AND C = 3`.
//!
//! A clause on a schema field builds a single-field [`StructMatcher`]; a
//! clause on `_` compares the record itself. Literals are typed by the
//! field's [`Kind`]; literals on `_` are typed by their spelling.

use tracing::{debug, trace};

use crate::error::ParseError;
use crate::lexer::{tokenize, Token, TokenKind};
use crate::matcher::Matcher;
use crate::op::Op;
use crate::printer::RECORD_FIELD;
use crate::record::Describe;
use crate::schema::Schema;
use crate::structure::StructMatcher;
use crate::value::{Kind, Value};

/// Parses an expression against a field whitelist.
///
/// An empty expression matches everything.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use sieve::{parse, Kind, Schema, Value};
///
/// let schema = Schema::new().with_field("A", Kind::I64).with_field("B", Kind::I64);
/// let m = parse("A = 1 AND B != 2", &schema).unwrap();
///
/// let record: HashMap<&str, Value> = [("A", Value::I64(1)), ("B", Value::I64(3))]
///     .into_iter()
///     .collect();
/// assert_eq!(m.matches(&record), Ok(true));
/// ```
pub fn parse(input: &str, schema: &Schema) -> Result<Matcher, ParseError> {
    let result = tokenize(input).and_then(|tokens| Parser::new(&tokens, schema).parse());
    match &result {
        Ok(matcher) => trace!(expression = input, matcher = %matcher, "parsed filter expression"),
        Err(err) => debug!(expression = input, code = %err.code(), error = %err, "rejected filter expression"),
    }
    result
}

/// Parses an expression against the fields of `T`.
pub fn parse_for<T: Describe>(input: &str) -> Result<Matcher, ParseError> {
    parse(input, &T::schema())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conjunction {
    And,
    Or,
}

/// The left-hand side of a clause.
enum Target<'a> {
    /// `_`: the record itself; literals are untyped.
    Record,
    Field(&'a str, Kind),
}

impl Target<'_> {
    fn kind(&self) -> Option<Kind> {
        match self {
            Target::Record => None,
            Target::Field(_, kind) => Some(*kind),
        }
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    schema: &'a Schema,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], schema: &'a Schema) -> Self {
        Parser {
            tokens,
            pos: 0,
            schema,
        }
    }

    fn parse(mut self) -> Result<Matcher, ParseError> {
        if self.tokens.is_empty() {
            return Ok(Matcher::Any);
        }

        let mut result = self.clause()?;
        let mut conjunction = Conjunction::And;

        while let Some(token) = self.peek() {
            if let Some(keyword) = conjunction_keyword(token) {
                conjunction = keyword;
                self.pos += 1;
                if self.peek().is_none() {
                    return Err(self.unfinished());
                }
            }

            let clause = self.clause()?;
            result = match conjunction {
                Conjunction::And => Matcher::and([result, clause]),
                Conjunction::Or => Matcher::or([result, clause]),
            };
        }

        Ok(result)
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Result<&'a Token, ParseError> {
        match self.tokens.get(self.pos) {
            Some(token) => {
                self.pos += 1;
                Ok(token)
            }
            None => Err(self.unfinished()),
        }
    }

    /// Error citing the last token consumed.
    fn unfinished(&self) -> ParseError {
        let token = self
            .pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(ToString::to_string)
            .unwrap_or_default();
        ParseError::UnfinishedMessage { token }
    }

    fn clause(&mut self) -> Result<Matcher, ParseError> {
        let target = self.target()?;
        let (op, op_token) = self.operator()?;

        let leaf = match op {
            Op::In | Op::NotIn => self.member_list(op, &target)?,
            Op::Match | Op::NotMatch => self.pattern(op, op_token, &target)?,
            _ => {
                let token = self.next()?;
                let value = literal(token, target.kind())?;
                if op.is_ordering() && !value.kind().is_ordered() {
                    return Err(invalid(
                        op_token,
                        format!("operator '{op}' cannot order {} values", value.kind()),
                    ));
                }
                Matcher::scalar(op, value.into())
            }
        };

        Ok(match target {
            Target::Record => leaf,
            Target::Field(name, _) => {
                Matcher::Struct(StructMatcher::new().with_field(name, leaf))
            }
        })
    }

    fn target(&mut self) -> Result<Target<'a>, ParseError> {
        let token = self.next()?;
        match token.ident() {
            Some(RECORD_FIELD) => Ok(Target::Record),
            Some(name) => match self.schema.get(name) {
                Some(kind) => Ok(Target::Field(name, kind)),
                None => Err(ParseError::UnknownField {
                    field: name.to_string(),
                }),
            },
            None => Err(ParseError::UnknownField {
                field: token.to_string(),
            }),
        }
    }

    fn operator(&mut self) -> Result<(Op, &'a Token), ParseError> {
        let token = self.next()?;
        let op = match &token.kind {
            TokenKind::Operator(symbol) => Op::from_symbol(symbol)
                .ok_or_else(|| invalid(token, format!("unknown operator '{symbol}'")))?,
            TokenKind::Ident(_) if token.is_keyword("IN") => Op::In,
            TokenKind::Ident(_) if token.is_keyword("MATCH") => Op::Match,
            TokenKind::Ident(_) if token.is_keyword("NOT") => {
                let next = self.next()?;
                if next.is_keyword("IN") {
                    Op::NotIn
                } else if next.is_keyword("MATCH") {
                    Op::NotMatch
                } else {
                    return Err(invalid(next, format!("unknown operator 'NOT {next}'")));
                }
            }
            _ => return Err(invalid(token, format!("unknown operator '{token}'"))),
        };
        Ok((op, token))
    }

    fn member_list(&mut self, op: Op, target: &Target<'_>) -> Result<Matcher, ParseError> {
        let open = self.next()?;
        if open.kind != TokenKind::LParen {
            return Err(invalid(open, format!("expected '(' after {op}, got '{open}'")));
        }

        let mut values = Vec::new();
        loop {
            let token = self.next()?;
            if token.kind == TokenKind::RParen {
                break;
            }
            values.push(literal(token, target.kind())?);
        }

        if values.is_empty() {
            return Err(invalid(open, format!("{op} list needs at least one value")));
        }
        Matcher::try_membership(op, values).map_err(|err| invalid(open, err.to_string()))
    }

    fn pattern(&mut self, op: Op, op_token: &Token, target: &Target<'_>) -> Result<Matcher, ParseError> {
        if let Some(kind) = target.kind() {
            if kind != Kind::String {
                return Err(invalid(
                    op_token,
                    format!("operator '{op}' needs a string field, not {kind}"),
                ));
            }
        }
        let token = self.next()?;
        match &token.kind {
            TokenKind::Str(source) if op == Op::Match => Ok(Matcher::re_match(source.as_str())),
            TokenKind::Str(source) => Ok(Matcher::not_re_match(source.as_str())),
            _ => Err(invalid(
                token,
                format!("operator '{op}' needs a quoted pattern, got '{token}'"),
            )),
        }
    }
}

fn conjunction_keyword(token: &Token) -> Option<Conjunction> {
    if token.is_keyword("AND") {
        Some(Conjunction::And)
    } else if token.is_keyword("OR") {
        Some(Conjunction::Or)
    } else {
        None
    }
}

fn invalid(token: &Token, message: String) -> ParseError {
    ParseError::InvalidOperation {
        token: token.to_string(),
        message,
    }
}

/// Types a literal token, either by the field's kind or, for `_`, by how
/// it is spelled.
fn literal(token: &Token, kind: Option<Kind>) -> Result<Value, ParseError> {
    let value = match kind {
        Some(kind) => typed_literal(token, kind),
        None => untyped_literal(token),
    };
    value.ok_or_else(|| {
        let expected = kind.map_or("a literal".to_string(), |k| format!("a {k} literal"));
        invalid(token, format!("'{token}' is not {expected}"))
    })
}

fn typed_literal(token: &Token, kind: Kind) -> Option<Value> {
    match (&token.kind, kind) {
        (TokenKind::Number(n), Kind::I8) => n.parse().ok().map(Value::I8),
        (TokenKind::Number(n), Kind::I16) => n.parse().ok().map(Value::I16),
        (TokenKind::Number(n), Kind::I32) => n.parse().ok().map(Value::I32),
        (TokenKind::Number(n), Kind::I64) => n.parse().ok().map(Value::I64),
        (TokenKind::Number(n), Kind::U8) => n.parse().ok().map(Value::U8),
        (TokenKind::Number(n), Kind::U16) => n.parse().ok().map(Value::U16),
        (TokenKind::Number(n), Kind::U32) => n.parse().ok().map(Value::U32),
        (TokenKind::Number(n), Kind::U64) => n.parse().ok().map(Value::U64),
        (TokenKind::Number(n), Kind::F32) => n.parse().ok().map(Value::F32),
        (TokenKind::Number(n), Kind::F64) => n.parse().ok().map(Value::F64),
        (TokenKind::Ident(word), Kind::Bool) => bool_literal(word).map(Value::Bool),
        (TokenKind::Str(s), Kind::String) => Some(Value::String(s.clone())),
        _ => None,
    }
}

fn untyped_literal(token: &Token) -> Option<Value> {
    match &token.kind {
        TokenKind::Number(n) if n.contains('.') => n.parse().ok().map(Value::F64),
        TokenKind::Number(n) => n.parse().ok().map(Value::I64),
        TokenKind::Str(s) => Some(Value::String(s.clone())),
        TokenKind::Ident(word) => bool_literal(word).map(Value::Bool),
        _ => None,
    }
}

fn bool_literal(word: &str) -> Option<bool> {
    if word.eq_ignore_ascii_case("true") {
        Some(true)
    } else if word.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
