//! SQL dialect.

use super::Dialect;
use crate::error::PrintError;
use crate::op::Op;
use crate::value::Value;

/// Prints matchers as an SQLite `WHERE` fragment.
///
/// Strings are single-quoted with `'` doubled, floats are printed with four
/// decimals, booleans as `1`/`0`, and membership lists as parenthesized,
/// comma-separated tuples. Regular expressions use the `REGEXP` operator,
/// which needs a `regexp()` function registered on the connection.
///
/// ```
/// use sieve::{Matcher, Printer, SqlitePrinter};
///
/// let m = Matcher::is_in([1i64, 2, 3]);
/// assert_eq!(SqlitePrinter.print(&m).unwrap(), "_ IN (1, 2, 3)");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlitePrinter;

impl Dialect for SqlitePrinter {
    fn true_literal(&self) -> &'static str {
        "1"
    }

    fn false_literal(&self) -> &'static str {
        "0"
    }

    fn operator(&self, op: Op) -> &'static str {
        match op {
            Op::Match => "REGEXP",
            Op::NotMatch => "NOT REGEXP",
            other => other.symbol(),
        }
    }

    fn value(&self, value: &Value) -> Result<String, PrintError> {
        let text = match value {
            Value::I8(n) => n.to_string(),
            Value::I16(n) => n.to_string(),
            Value::I32(n) => n.to_string(),
            Value::I64(n) => n.to_string(),
            Value::U8(n) => n.to_string(),
            Value::U16(n) => n.to_string(),
            Value::U32(n) => n.to_string(),
            Value::U64(n) => n.to_string(),
            Value::F32(x) => float(f64::from(*x))?,
            Value::F64(x) => float(*x)?,
            Value::Bool(true) => "1".to_string(),
            Value::Bool(false) => "0".to_string(),
            Value::String(s) => quote(s),
        };
        Ok(text)
    }

    fn list(&self, values: &[Value]) -> Result<String, PrintError> {
        let items = values
            .iter()
            .map(|v| self.value(v))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("({})", items.join(", ")))
    }

    fn pattern(&self, source: &str) -> String {
        quote(source)
    }
}

fn float(x: f64) -> Result<String, PrintError> {
    if x.is_finite() {
        Ok(format!("{x:.4}"))
    } else {
        Err(PrintError::NonFinite {
            value: x.to_string(),
        })
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}
