//! The matcher tree and its combinators.
//!
//! [`Matcher::and`], [`Matcher::or`] and [`Matcher::negate`] simplify while
//! they build, so trees are canonical from the moment they exist:
//!
//! - `and` flattens nested `And`s, drops `Any`, and collapses to `None` if
//!   any operand is `None`. With no operands left it is `Any`; with one it
//!   is that operand.
//! - `or` is the dual: flattens `Or`, drops `None`, collapses to `Any`, and
//!   is `None` when empty.
//! - `negate` swaps `Any` and `None`, unwraps a double negation, and turns a
//!   leaf into the leaf with the complementary operator. Anything else is
//!   wrapped in `Invert`; negation is not pushed through `And`/`Or`.

use std::fmt;
use std::ops::{BitAnd, BitOr, Not};

use tracing::trace;

use crate::error::{MatchError, Result};
use crate::field::{Comparand, FieldMatcher, MemberSet, Operand, Pattern};
use crate::op::Op;
use crate::printer::{DefaultPrinter, Printer};
use crate::record::Record;
use crate::structure::StructMatcher;
use crate::value::{Scalar, Value};

/// A node of the predicate tree.
///
/// Build matchers with the constructors and combinators on this type, or
/// parse them from text with [`parse`](crate::parse). Evaluate them with
/// [`matches`](Matcher::matches) and render them with a
/// [`Printer`](crate::Printer).
///
/// # Example
///
/// ```
/// use sieve::{Matcher, Value};
///
/// let small_odd = Matcher::and([Matcher::lt(10i64), Matcher::is_in([1i64, 3, 5, 7, 9])]);
/// assert_eq!(small_odd.matches(&Value::I64(7)), Ok(true));
/// assert_eq!(small_odd.matches(&Value::I64(8)), Ok(false));
/// assert_eq!(small_odd.to_string(), "_ < 10 AND _ IN [1 3 5 7 9]");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Matcher {
    /// Matches every record.
    Any,
    /// Matches no record.
    None,
    /// Compares the record's scalar value.
    Field(FieldMatcher),
    /// All terms match. Always holds at least two terms.
    And(Terms),
    /// At least one term matches. Always holds at least two terms.
    Or(Terms),
    /// Negation that no rewrite rule could absorb.
    Invert(Box<Matcher>),
    /// Per-field constraints on a record.
    Struct(StructMatcher),
    /// Always fails with the given message. Meant for fault injection.
    Fail(String),
}

/// The operands of an `And` or `Or` node.
///
/// Only the combinators create `Terms`, which guarantees at least two
/// entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Terms(Vec<Matcher>);

impl Terms {
    pub fn as_slice(&self) -> &[Matcher] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Matcher> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Terms {
    type Item = &'a Matcher;
    type IntoIter = std::slice::Iter<'a, Matcher>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Matcher {
    // ========================================================================
    // Constants and combinators
    // ========================================================================

    /// Returns the matcher that accepts everything.
    pub fn any() -> Matcher {
        Matcher::Any
    }

    /// Returns the matcher that accepts nothing.
    pub fn none() -> Matcher {
        Matcher::None
    }

    /// Conjunction of `matchers`, simplified.
    pub fn and<I>(matchers: I) -> Matcher
    where
        I: IntoIterator<Item = Matcher>,
    {
        let mut terms = Vec::new();
        for matcher in matchers {
            match matcher {
                Matcher::Any => continue,
                Matcher::None => {
                    trace!("conjunction absorbed by NONE");
                    return Matcher::None;
                }
                Matcher::And(inner) => terms.extend(inner.0),
                other => terms.push(other),
            }
        }
        collapse(terms, Matcher::Any, Matcher::And)
    }

    /// Disjunction of `matchers`, simplified.
    pub fn or<I>(matchers: I) -> Matcher
    where
        I: IntoIterator<Item = Matcher>,
    {
        let mut terms = Vec::new();
        for matcher in matchers {
            match matcher {
                Matcher::None => continue,
                Matcher::Any => {
                    trace!("disjunction absorbed by ANY");
                    return Matcher::Any;
                }
                Matcher::Or(inner) => terms.extend(inner.0),
                other => terms.push(other),
            }
        }
        collapse(terms, Matcher::None, Matcher::Or)
    }

    /// Negation of `matcher`, simplified.
    pub fn negate(matcher: Matcher) -> Matcher {
        match matcher {
            Matcher::Any => Matcher::None,
            Matcher::None => Matcher::Any,
            Matcher::Invert(inner) => *inner,
            Matcher::Field(leaf) => {
                trace!(op = %leaf.op(), "negation rewritten to complement operator");
                Matcher::Field(leaf.complement())
            }
            other => Matcher::Invert(Box::new(other)),
        }
    }

    /// Returns a matcher that always fails with `message`.
    pub fn fail(message: impl Into<String>) -> Matcher {
        Matcher::Fail(message.into())
    }

    // ========================================================================
    // Leaf constructors
    // ========================================================================

    /// Leaf with a single-value operator chosen at runtime.
    ///
    /// Fails for the list and pattern operators, which have their own
    /// constructors.
    ///
    /// ```
    /// use sieve::{MatchError, Matcher, Op};
    ///
    /// assert_eq!(Matcher::compare(Op::Lte, 3i64), Ok(Matcher::lte(3i64)));
    /// assert_eq!(
    ///     Matcher::compare(Op::In, 3i64),
    ///     Err(MatchError::NotScalarOp { op: Op::In })
    /// );
    /// ```
    pub fn compare(op: Op, operand: impl Into<Comparand>) -> Result<Matcher> {
        if !op.is_scalar() {
            return Err(MatchError::NotScalarOp { op });
        }
        Ok(Matcher::scalar(op, operand.into()))
    }

    /// Callers guarantee `op.is_scalar()`.
    pub(crate) fn scalar(op: Op, operand: Comparand) -> Matcher {
        Matcher::Field(FieldMatcher::new(op, Operand::from(operand)))
    }

    pub fn eq(operand: impl Into<Comparand>) -> Matcher {
        Matcher::scalar(Op::Eq, operand.into())
    }

    pub fn neq(operand: impl Into<Comparand>) -> Matcher {
        Matcher::scalar(Op::Neq, operand.into())
    }

    pub fn lt(operand: impl Into<Comparand>) -> Matcher {
        Matcher::scalar(Op::Lt, operand.into())
    }

    pub fn lte(operand: impl Into<Comparand>) -> Matcher {
        Matcher::scalar(Op::Lte, operand.into())
    }

    pub fn gt(operand: impl Into<Comparand>) -> Matcher {
        Matcher::scalar(Op::Gt, operand.into())
    }

    pub fn gte(operand: impl Into<Comparand>) -> Matcher {
        Matcher::scalar(Op::Gte, operand.into())
    }

    /// Membership in a list of values of one primitive type.
    ///
    /// Lists of [`Value`]s may mix kinds and go through
    /// [`try_in`](Matcher::try_in) instead:
    ///
    /// ```compile_fail
    /// use sieve::{Matcher, Value};
    ///
    /// let m = Matcher::is_in(vec![Value::I64(1), Value::from("a")]);
    /// ```
    pub fn is_in<I, V>(values: I) -> Matcher
    where
        I: IntoIterator<Item = V>,
        V: Scalar,
    {
        Matcher::membership(Op::In, values)
    }

    /// Absence from a list of values of one primitive type.
    pub fn not_in<I, V>(values: I) -> Matcher
    where
        I: IntoIterator<Item = V>,
        V: Scalar,
    {
        Matcher::membership(Op::NotIn, values)
    }

    /// Membership in a dynamically built list.
    ///
    /// Fails if the values are not all of one kind.
    pub fn try_in(values: Vec<Value>) -> Result<Matcher> {
        Matcher::try_membership(Op::In, values)
    }

    /// Absence from a dynamically built list.
    pub fn try_not_in(values: Vec<Value>) -> Result<Matcher> {
        Matcher::try_membership(Op::NotIn, values)
    }

    /// Regular expression search on a string record.
    ///
    /// The pattern is compiled here. If it does not compile, the matcher
    /// reports [`MatchError::InvalidPattern`] when evaluated.
    pub fn re_match(pattern: impl Into<String>) -> Matcher {
        Matcher::Field(FieldMatcher::new(
            Op::Match,
            Operand::Pattern(Pattern::new(pattern)),
        ))
    }

    /// Negated regular expression search.
    pub fn not_re_match(pattern: impl Into<String>) -> Matcher {
        Matcher::Field(FieldMatcher::new(
            Op::NotMatch,
            Operand::Pattern(Pattern::new(pattern)),
        ))
    }

    pub(crate) fn try_membership(op: Op, values: Vec<Value>) -> Result<Matcher> {
        let set = MemberSet::new(values)?;
        Ok(Matcher::Field(FieldMatcher::new(op, Operand::Set(set))))
    }

    fn membership<I, V>(op: Op, values: I) -> Matcher
    where
        I: IntoIterator<Item = V>,
        V: Scalar,
    {
        let set = MemberSet::of_one_kind(values.into_iter().map(Into::into).collect());
        Matcher::Field(FieldMatcher::new(op, Operand::Set(set)))
    }

    // ========================================================================
    // Evaluation
    // ========================================================================

    /// Tests a record against this matcher.
    ///
    /// `And` and `Or` stop at the first decisive term, and an error from any
    /// term ends the whole evaluation.
    pub fn matches(&self, record: &dyn Record) -> Result<bool> {
        self.eval(record, None)
    }

    pub(crate) fn eval(&self, record: &dyn Record, scope: Option<&dyn Record>) -> Result<bool> {
        match self {
            Matcher::Any => Ok(true),
            Matcher::None => Ok(false),
            Matcher::Field(leaf) => leaf.eval(record, scope),
            Matcher::And(terms) => {
                for term in terms {
                    if !term.eval(record, scope)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Matcher::Or(terms) => {
                for term in terms {
                    if term.eval(record, scope)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Matcher::Invert(inner) => inner.eval(record, scope).map(|hit| !hit),
            Matcher::Struct(fields) => fields.matches(record),
            Matcher::Fail(message) => Err(MatchError::Injected(message.clone())),
        }
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    pub fn is_any(&self) -> bool {
        matches!(self, Matcher::Any)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Matcher::None)
    }

    /// Renders this matcher as a SQL WHERE fragment.
    pub fn to_sql(&self) -> std::result::Result<String, crate::PrintError> {
        crate::printer::SqlitePrinter.print(self)
    }
}

/// Turns a term list into the canonical node for it.
fn collapse(mut terms: Vec<Matcher>, empty: Matcher, node: fn(Terms) -> Matcher) -> Matcher {
    match terms.len() {
        0 => empty,
        1 => terms.remove(0),
        _ => node(Terms(terms)),
    }
}

impl From<FieldMatcher> for Matcher {
    fn from(leaf: FieldMatcher) -> Self {
        Matcher::Field(leaf)
    }
}

impl From<StructMatcher> for Matcher {
    fn from(fields: StructMatcher) -> Self {
        Matcher::Struct(fields)
    }
}

impl BitAnd for Matcher {
    type Output = Matcher;

    fn bitand(self, rhs: Matcher) -> Matcher {
        Matcher::and([self, rhs])
    }
}

impl BitOr for Matcher {
    type Output = Matcher;

    fn bitor(self, rhs: Matcher) -> Matcher {
        Matcher::or([self, rhs])
    }
}

impl Not for Matcher {
    type Output = Matcher;

    fn not(self) -> Matcher {
        Matcher::negate(self)
    }
}

impl fmt::Display for Matcher {
    /// Renders with the [`DefaultPrinter`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DefaultPrinter.print(self) {
            Ok(text) => f.write_str(&text),
            Err(err) => write!(f, "<unprintable: {err}>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(n: i64) -> Matcher {
        Matcher::eq(n)
    }

    #[test]
    fn identities() {
        assert_eq!(Matcher::and([]), Matcher::Any);
        assert_eq!(Matcher::or([]), Matcher::None);
        assert_eq!(Matcher::and([leaf(1)]), leaf(1));
        assert_eq!(Matcher::or([leaf(1)]), leaf(1));
        assert_eq!(Matcher::and([Matcher::Any, leaf(1), Matcher::Any]), leaf(1));
        assert_eq!(Matcher::or([Matcher::None, leaf(1)]), leaf(1));
    }

    #[test]
    fn absorption() {
        assert_eq!(Matcher::and([leaf(1), Matcher::None]), Matcher::None);
        assert_eq!(Matcher::and([Matcher::fail("x"), Matcher::None]), Matcher::None);
        assert_eq!(Matcher::or([leaf(1), Matcher::Any]), Matcher::Any);
        assert_eq!(Matcher::or([Matcher::fail("x"), Matcher::Any]), Matcher::Any);
    }

    #[test]
    fn flattening() {
        let nested = Matcher::and([Matcher::and([leaf(1), leaf(2)]), leaf(3)]);
        match &nested {
            Matcher::And(terms) => assert_eq!(terms.as_slice(), &[leaf(1), leaf(2), leaf(3)]),
            other => panic!("expected And, got {other:?}"),
        }

        // Or inside And is kept as a single term.
        let mixed = Matcher::and([Matcher::or([leaf(1), leaf(2)]), leaf(3)]);
        match &mixed {
            Matcher::And(terms) => assert_eq!(terms.len(), 2),
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn negation_rules() {
        assert_eq!(Matcher::negate(Matcher::Any), Matcher::None);
        assert_eq!(Matcher::negate(Matcher::None), Matcher::Any);
        assert_eq!(Matcher::negate(Matcher::eq(1i64)), Matcher::neq(1i64));
        assert_eq!(Matcher::negate(Matcher::lt(1i64)), Matcher::gte(1i64));
        assert_eq!(Matcher::negate(Matcher::gt(1i64)), Matcher::lte(1i64));
        assert_eq!(
            Matcher::negate(Matcher::is_in([1i64, 2])),
            Matcher::not_in([1i64, 2])
        );
        assert_eq!(
            Matcher::negate(Matcher::re_match("a")),
            Matcher::not_re_match("a")
        );
    }

    #[test]
    fn negation_does_not_distribute() {
        let both = Matcher::and([leaf(1), leaf(2)]);
        let negated = Matcher::negate(both.clone());
        assert_eq!(negated, Matcher::Invert(Box::new(both.clone())));
        assert_eq!(Matcher::negate(negated), both);

        let failing = Matcher::negate(Matcher::fail("x"));
        assert!(matches!(failing, Matcher::Invert(_)));
    }

    #[test]
    fn evaluation_short_circuits() {
        let and = Matcher::and([Matcher::eq(0i64), Matcher::fail("unreached")]);
        assert_eq!(and.matches(&Value::I64(1)), Ok(false));

        let or = Matcher::or([Matcher::eq(1i64), Matcher::fail("unreached")]);
        assert_eq!(or.matches(&Value::I64(1)), Ok(true));
    }

    #[test]
    fn errors_end_evaluation() {
        let and = Matcher::and([Matcher::fail("boom"), Matcher::eq(0i64)]);
        assert_eq!(
            and.matches(&Value::I64(0)),
            Err(MatchError::Injected("boom".into()))
        );

        let or = Matcher::or([Matcher::lt(1i32), Matcher::eq(0i64)]);
        assert!(matches!(
            or.matches(&Value::I64(0)),
            Err(MatchError::Mismatch { .. })
        ));
    }

    #[test]
    fn invert_flips_results_and_keeps_errors() {
        let inverted = Matcher::negate(Matcher::and([Matcher::gt(0i64), Matcher::lt(10i64)]));
        assert_eq!(inverted.matches(&Value::I64(5)), Ok(false));
        assert_eq!(inverted.matches(&Value::I64(50)), Ok(true));

        let failing = Matcher::negate(Matcher::fail("boom"));
        assert!(failing.matches(&Value::I64(0)).is_err());
    }

    #[test]
    fn operator_sugar() {
        assert_eq!(leaf(1) & leaf(2), Matcher::and([leaf(1), leaf(2)]));
        assert_eq!(leaf(1) | leaf(2), Matcher::or([leaf(1), leaf(2)]));
        assert_eq!(!leaf(1), Matcher::neq(1i64));
        assert_eq!(!!leaf(1), leaf(1));
    }

    #[test]
    fn compare_takes_only_single_value_ops() {
        for op in Op::ALL {
            let built = Matcher::compare(op, 1i64);
            if !op.is_scalar() {
                assert_eq!(built, Err(MatchError::NotScalarOp { op }));
                continue;
            }
            let m = built.unwrap();
            let negated = Matcher::negate(m.clone());
            for x in [0i64, 1, 2] {
                let hit = m.matches(&Value::I64(x)).unwrap();
                assert_eq!(negated.matches(&Value::I64(x)), Ok(!hit), "{op} on {x}");
            }
        }
    }

    #[test]
    fn typed_lists_always_build_a_set() {
        let m = Matcher::is_in([1usize, 2]);
        match &m {
            Matcher::Field(leaf) => match leaf.operand() {
                Operand::Set(set) => assert_eq!(set.kind(), Some(crate::Kind::U64)),
                other => panic!("expected a set, got {other:?}"),
            },
            other => panic!("expected a leaf, got {other:?}"),
        }
        assert_eq!(m.matches(&Value::U64(2)), Ok(true));
        assert_eq!(Matcher::not_in(["a", "b"]).to_string(), r#"_ NOT IN ["a" "b"]"#);
    }

    #[test]
    fn mixed_value_lists_are_build_errors() {
        assert_eq!(
            Matcher::try_in(vec![Value::I64(1), Value::from("a")]),
            Err(MatchError::MixedList {
                expected: crate::Kind::I64,
                actual: crate::Kind::String,
            })
        );
    }

    #[test]
    fn try_in_rejects_mixed_kinds() {
        assert!(Matcher::try_in(vec![Value::I64(1), Value::Bool(true)]).is_err());
        let m = Matcher::try_not_in(vec![Value::from("a")]).unwrap();
        assert_eq!(m.matches(&Value::from("b")), Ok(true));
    }

    #[test]
    fn empty_in_list_matches_nothing() {
        let m = Matcher::is_in(Vec::<i64>::new());
        assert_eq!(m.matches(&Value::I64(1)), Ok(false));
        assert_eq!(Matcher::negate(m).matches(&Value::I64(1)), Ok(true));
    }

    #[test]
    fn display_uses_default_printer() {
        assert_eq!(Matcher::gt(5i64).to_string(), "_ > 5");
        assert_eq!(
            Matcher::fail("boom").to_string(),
            "<unprintable: cannot print matcher: boom>"
        );
    }
}
