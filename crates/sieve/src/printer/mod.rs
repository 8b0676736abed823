//! Matcher-to-text backends.
//!
//! Both printers share one structural renderer and differ only in how they
//! spell operators and literals (see [`Dialect`]). Structure is rendered as:
//!
//! - `And` as terms joined by `" AND "`, `Or` as terms joined by `" OR "`
//! - `Invert` as `NOT (<inner>)`
//! - `StructMatcher` as one `<name> <op> <value>` term per field, in field
//!   name order, joined by `" AND "`
//! - `Any` and `None` as the dialect's boolean literals
//!
//! AND binds tighter than OR in the output: an `Or` directly under an `And`
//! or a struct field is parenthesized, and so is an `And` or a
//! `StructMatcher` directly under an `Or`.

mod default;
mod sqlite;

pub use default::DefaultPrinter;
pub use sqlite::SqlitePrinter;

use crate::error::PrintError;
use crate::field::{FieldMatcher, Operand};
use crate::matcher::{Matcher, Terms};
use crate::op::Op;
use crate::value::Value;

/// Field name rendered for a leaf that compares the record itself.
pub const RECORD_FIELD: &str = "_";

/// Compiles a matcher tree to text.
pub trait Printer {
    fn print(&self, matcher: &Matcher) -> Result<String, PrintError>;
}

/// The spelling of one output language.
pub trait Dialect {
    /// Literal for [`Matcher::Any`].
    fn true_literal(&self) -> &'static str;

    /// Literal for [`Matcher::None`].
    fn false_literal(&self) -> &'static str;

    fn operator(&self, op: Op) -> &'static str;

    fn value(&self, value: &Value) -> Result<String, PrintError>;

    /// Renders the operand of `In`/`NotIn`.
    fn list(&self, values: &[Value]) -> Result<String, PrintError>;

    /// Renders a regular expression operand.
    fn pattern(&self, source: &str) -> String;
}

impl<D: Dialect> Printer for D {
    fn print(&self, matcher: &Matcher) -> Result<String, PrintError> {
        render(self, matcher, None, Parent::Top)
    }
}

/// What a node is rendered inside of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parent {
    Top,
    And,
    Or,
}

fn render<D: Dialect + ?Sized>(
    dialect: &D,
    matcher: &Matcher,
    field: Option<&str>,
    parent: Parent,
) -> Result<String, PrintError> {
    match matcher {
        Matcher::Any => Ok(dialect.true_literal().to_string()),
        Matcher::None => Ok(dialect.false_literal().to_string()),
        Matcher::Field(leaf) => render_leaf(dialect, leaf, field),
        Matcher::And(terms) => {
            let body = join(dialect, terms, field, Parent::And, " AND ")?;
            Ok(wrap_if(body, parent == Parent::Or))
        }
        Matcher::Or(terms) => {
            let body = join(dialect, terms, field, Parent::Or, " OR ")?;
            Ok(wrap_if(body, parent == Parent::And))
        }
        Matcher::Invert(inner) => {
            let body = render(dialect, inner, field, Parent::Top)?;
            Ok(format!("NOT ({body})"))
        }
        Matcher::Struct(fields) => {
            if let Some(outer) = field {
                return Err(PrintError::NestedStruct {
                    field: outer.to_string(),
                });
            }
            if fields.is_empty() {
                return Ok(dialect.true_literal().to_string());
            }
            let parts = fields
                .fields()
                .map(|(name, m)| render(dialect, m, Some(name), Parent::And))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(wrap_if(parts.join(" AND "), parent == Parent::Or))
        }
        Matcher::Fail(message) => Err(PrintError::Unprintable(message.clone())),
    }
}

fn join<D: Dialect + ?Sized>(
    dialect: &D,
    terms: &Terms,
    field: Option<&str>,
    parent: Parent,
    separator: &str,
) -> Result<String, PrintError> {
    let parts = terms
        .iter()
        .map(|term| render(dialect, term, field, parent))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(parts.join(separator))
}

fn render_leaf<D: Dialect + ?Sized>(
    dialect: &D,
    leaf: &FieldMatcher,
    field: Option<&str>,
) -> Result<String, PrintError> {
    let operand = match leaf.operand() {
        Operand::Value(value) => dialect.value(value)?,
        Operand::Set(set) => dialect.list(set.values())?,
        Operand::Pattern(pattern) => dialect.pattern(pattern.as_str()),
        Operand::Field(yielder) => yielder.field().to_string(),
    };
    Ok(format!(
        "{} {} {}",
        field.unwrap_or(RECORD_FIELD),
        dialect.operator(leaf.op()),
        operand
    ))
}

fn wrap_if(body: String, wrap: bool) -> String {
    if wrap {
        format!("({body})")
    } else {
        body
    }
}
