//! Error types for parsing, matching and printing.

use std::fmt;

use thiserror::Error;

use crate::lexer::Token;
use crate::op::Op;
use crate::value::Kind;

/// The closed set of parse error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A character could not be lexed.
    TokenizeError,
    /// The expression ends in the middle of a clause.
    UnfinishedMessage,
    /// An operator, or the value given to it, is not valid.
    InvalidOperation,
    /// A field is neither `_` nor part of the schema.
    UnknownField,
}

impl ErrorCode {
    /// Returns the wire name of this code (`"TOKENIZE_ERROR"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::TokenizeError => "TOKENIZE_ERROR",
            ErrorCode::UnfinishedMessage => "UNFINISHED_MESSAGE",
            ErrorCode::InvalidOperation => "INVALID_OPERATION",
            ErrorCode::UnknownField => "UNKNOWN_FIELD",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced while tokenizing or parsing an expression.
///
/// Every parse error is terminal: no partial matcher is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The tokenizer hit a character it cannot lex, or a string literal
    /// that never closes. `tokens` holds what was lexed before `offset`.
    #[error("TOKENIZE_ERROR: cannot tokenize {ch:?} at offset {offset}")]
    Tokenize {
        offset: usize,
        ch: char,
        tokens: Vec<Token>,
    },

    /// The expression stops after `token` while a clause is incomplete.
    #[error("UNFINISHED_MESSAGE: expression ends after '{token}'")]
    UnfinishedMessage { token: String },

    /// The operator token is not a known operator, or cannot take the value
    /// it was given.
    #[error("INVALID_OPERATION: {message}")]
    InvalidOperation { token: String, message: String },

    /// The field is not in the schema.
    #[error("UNKNOWN_FIELD: field '{field}' is not defined")]
    UnknownField { field: String },
}

impl ParseError {
    /// Returns the code of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ParseError::Tokenize { .. } => ErrorCode::TokenizeError,
            ParseError::UnfinishedMessage { .. } => ErrorCode::UnfinishedMessage,
            ParseError::InvalidOperation { .. } => ErrorCode::InvalidOperation,
            ParseError::UnknownField { .. } => ErrorCode::UnknownField,
        }
    }
}

/// Errors that can occur when evaluating a matcher against a record.
///
/// All variants are comparison failures. They come from two causes: values
/// whose kinds cannot be compared by the operator, or a record that lacks
/// the field being matched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    /// The record value and the operand have different kinds.
    #[error("operator '{op}' cannot compare {actual} with {expected}")]
    Mismatch {
        op: Op,
        expected: Kind,
        actual: Kind,
    },

    /// An ordering operator was applied to booleans.
    #[error("operator '{op}' has no ordering for bool values")]
    Unordered { op: Op },

    /// A pattern operator was applied to a value that is not a string.
    #[error("operator '{op}' requires a string, got {actual}")]
    NotAString { op: Op, actual: Kind },

    /// The regular expression does not compile.
    #[error("invalid regex pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The record has no field or key with this name.
    #[error("record has no field '{field}'")]
    MissingField { field: String },

    /// A leaf matcher was given a record that has no scalar value.
    #[error("record cannot be compared as a scalar value")]
    NotScalar,

    /// A field reference was evaluated outside of any struct matcher.
    #[error("field reference '{field}' is not bound to a record")]
    Unbound { field: String },

    /// A single-value comparison was requested with a list or pattern
    /// operator.
    #[error("operator '{op}' does not compare against a single value")]
    NotScalarOp { op: Op },

    /// A membership list mixes values of different kinds.
    #[error("list mixes {expected} and {actual} values")]
    MixedList { expected: Kind, actual: Kind },

    /// Raised by [`Matcher::fail`](crate::Matcher::fail).
    #[error("{0}")]
    Injected(String),
}

/// Errors that can occur when printing a matcher.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PrintError {
    /// The tree contains a matcher with no textual form.
    #[error("cannot print matcher: {0}")]
    Unprintable(String),

    /// A struct matcher appears as the constraint of another struct's field.
    #[error("struct matcher nested under field '{field}' cannot be printed")]
    NestedStruct { field: String },

    /// The SQL dialect has no literal for this number.
    #[error("non-finite number {value} has no SQL literal")]
    NonFinite { value: String },
}

/// Result type for matcher evaluation.
pub type Result<T> = std::result::Result<T, MatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_variants() {
        let err = ParseError::UnknownField {
            field: "D".to_string(),
        };
        assert_eq!(err.code(), ErrorCode::UnknownField);
        assert_eq!(err.to_string(), "UNKNOWN_FIELD: field 'D' is not defined");

        let err = ParseError::UnfinishedMessage {
            token: "AND".to_string(),
        };
        assert_eq!(err.code().to_string(), "UNFINISHED_MESSAGE");
    }

    #[test]
    fn match_error_messages() {
        let err = MatchError::Mismatch {
            op: Op::Lt,
            expected: Kind::I32,
            actual: Kind::I64,
        };
        assert_eq!(err.to_string(), "operator '<' cannot compare i64 with i32");
        assert_eq!(
            MatchError::MissingField {
                field: "name".into()
            }
            .to_string(),
            "record has no field 'name'"
        );
    }
}
