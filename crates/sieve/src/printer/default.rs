//! Human-readable dialect.

use super::Dialect;
use crate::error::PrintError;
use crate::op::Op;
use crate::value::Value;

/// Prints matchers in the filter-expression style.
///
/// Strings are double-quoted with `\` escapes, floats always carry a decimal
/// point, and membership lists are bracketed and space-separated:
///
/// ```
/// use sieve::{DefaultPrinter, Matcher, Printer};
///
/// let m = Matcher::negate(Matcher::and([Matcher::gt(5i64), Matcher::lt(10i64)]));
/// assert_eq!(DefaultPrinter.print(&m).unwrap(), "NOT (_ > 5 AND _ < 10)");
///
/// let m = Matcher::is_in(["a", "b"]);
/// assert_eq!(DefaultPrinter.print(&m).unwrap(), r#"_ IN ["a" "b"]"#);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPrinter;

impl Dialect for DefaultPrinter {
    fn true_literal(&self) -> &'static str {
        "TRUE"
    }

    fn false_literal(&self) -> &'static str {
        "FALSE"
    }

    fn operator(&self, op: Op) -> &'static str {
        op.symbol()
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
            Value::F32(x) => float(x.to_string(), x.is_finite()),
            Value::F64(x) => float(x.to_string(), x.is_finite()),
            Value::Bool(b) => b.to_string(),
            Value::String(s) => quote(s),
        };
        Ok(text)
    }

    fn list(&self, values: &[Value]) -> Result<String, PrintError> {
        let items = values
            .iter()
            .map(|v| self.value(v))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("[{}]", items.join(" ")))
    }

    fn pattern(&self, source: &str) -> String {
        quote(source)
    }
}

/// Appends `.0` to finite floats that print without a fraction.
fn float(text: String, finite: bool) -> String {
    if finite && !text.contains('.') {
        format!("{text}.0")
    } else {
        text
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        if matches!(ch, '"' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::Matcher;
    use crate::printer::Printer;

    fn print(m: Matcher) -> String {
        DefaultPrinter.print(&m).unwrap()
    }

    #[test]
    fn scalar_literals() {
        assert_eq!(print(Matcher::eq(-3i8)), "_ = -3");
        assert_eq!(print(Matcher::eq(2.5f64)), "_ = 2.5");
        assert_eq!(print(Matcher::eq(2.0f32)), "_ = 2.0");
        assert_eq!(print(Matcher::neq(true)), "_ != true");
        assert_eq!(print(Matcher::eq(r#"say "hi" \o/"#)), r#"_ = "say \"hi\" \\o/""#);
    }

    #[test]
    fn word_operators() {
        assert_eq!(print(Matcher::not_in([1u8, 2])), "_ NOT IN [1 2]");
        assert_eq!(print(Matcher::re_match("^a.c$")), r#"_ MATCH "^a.c$""#);
        assert_eq!(print(Matcher::not_re_match("x")), r#"_ NOT MATCH "x""#);
    }

    #[test]
    fn empty_list() {
        assert_eq!(print(Matcher::is_in(Vec::<i64>::new())), "_ IN []");
    }

    #[test]
    fn single_precision_floats_print_as_written() {
        assert_eq!(print(Matcher::eq(0.1f32)), "_ = 0.1");
        assert_eq!(print(Matcher::lt(-3.25f32)), "_ < -3.25");
        assert_eq!(print(Matcher::is_in([0.1f32, 1.0])), "_ IN [0.1 1.0]");
    }

    #[test]
    fn non_finite_floats() {
        assert_eq!(print(Matcher::lt(f64::INFINITY)), "_ < inf");
    }
}
