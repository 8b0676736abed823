//! Comparison operators for field matchers.
//!
//! The [`Op`] enum is a closed set. Text that does not spell one of these
//! operators never maps to one; the parser rejects it instead.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Comparison operator of a [`FieldMatcher`](crate::FieldMatcher).
///
/// Operators come in complementary pairs (see [`Op::complement`]), which is
/// what lets negation of a leaf be rewritten into another leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Op {
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Equal: same kind and same raw value.
    Eq,
    /// Not equal.
    Neq,
    /// Membership in a list of values.
    In,
    /// Absence from a list of values.
    NotIn,
    /// Regular expression search on a string.
    Match,
    /// Negated regular expression search.
    NotMatch,
}

impl Op {
    /// Every operator, in declaration order.
    pub const ALL: [Op; 10] = [
        Op::Lt,
        Op::Lte,
        Op::Gt,
        Op::Gte,
        Op::Eq,
        Op::Neq,
        Op::In,
        Op::NotIn,
        Op::Match,
        Op::NotMatch,
    ];

    /// Returns the operator that matches exactly when this one does not.
    ///
    /// - `Eq` <-> `Neq`
    /// - `Lt` <-> `Gte`
    /// - `Lte` <-> `Gt`
    /// - `In` <-> `NotIn`
    /// - `Match` <-> `NotMatch`
    pub fn complement(self) -> Op {
        match self {
            Op::Eq => Op::Neq,
            Op::Neq => Op::Eq,
            Op::Lt => Op::Gte,
            Op::Gte => Op::Lt,
            Op::Lte => Op::Gt,
            Op::Gt => Op::Lte,
            Op::In => Op::NotIn,
            Op::NotIn => Op::In,
            Op::Match => Op::NotMatch,
            Op::NotMatch => Op::Match,
        }
    }

    /// Returns `true` for the operators that require an ordering.
    pub fn is_ordering(self) -> bool {
        matches!(self, Op::Lt | Op::Lte | Op::Gt | Op::Gte)
    }

    /// Returns `true` for the operators that compare against a single
    /// value: `Eq`, `Neq` and the ordering operators.
    pub fn is_scalar(self) -> bool {
        !self.is_membership() && !self.is_pattern()
    }

    /// Returns `true` for `In` and `NotIn`.
    pub fn is_membership(self) -> bool {
        matches!(self, Op::In | Op::NotIn)
    }

    /// Returns `true` for `Match` and `NotMatch`.
    pub fn is_pattern(self) -> bool {
        matches!(self, Op::Match | Op::NotMatch)
    }

    /// Returns `true` for the operators defined as the negation of their
    /// complement: `Neq`, `NotIn` and `NotMatch`.
    pub fn is_negative(self) -> bool {
        matches!(self, Op::Neq | Op::NotIn | Op::NotMatch)
    }

    /// Evaluates an ordering operator given the ordering of two values.
    ///
    /// `None` stands for "unordered" (a `NaN` was involved). `Lt` and `Lte`
    /// are false for unordered values, and `Gte` and `Gt` are defined as
    /// their negations, so complementary operators always disagree.
    pub fn eval_ordering(self, ordering: Option<Ordering>) -> bool {
        let lt = ordering == Some(Ordering::Less);
        let lte = matches!(ordering, Some(Ordering::Less | Ordering::Equal));
        let eq = ordering == Some(Ordering::Equal);
        match self {
            Op::Lt => lt,
            Op::Lte => lte,
            Op::Gt => !lte,
            Op::Gte => !lt,
            Op::Eq => eq,
            Op::Neq => !eq,
            _ => false, // Not an ordering-based operator
        }
    }

    /// Maps a comparison symbol to its operator.
    ///
    /// Only `=`, `!=`, `<`, `<=`, `>` and `>=` are symbols; the word
    /// operators are recognized by the parser.
    pub fn from_symbol(symbol: &str) -> Option<Op> {
        match symbol {
            "=" => Some(Op::Eq),
            "!=" => Some(Op::Neq),
            "<" => Some(Op::Lt),
            "<=" => Some(Op::Lte),
            ">" => Some(Op::Gt),
            ">=" => Some(Op::Gte),
            _ => None,
        }
    }

    /// Returns the code name of this operator (`"LT"`, `"NOT_IN"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Lt => "LT",
            Op::Lte => "LTE",
            Op::Gt => "GT",
            Op::Gte => "GTE",
            Op::Eq => "EQ",
            Op::Neq => "NEQ",
            Op::In => "IN",
            Op::NotIn => "NOT_IN",
            Op::Match => "MATCH",
            Op::NotMatch => "NOT_MATCH",
        }
    }

    /// Returns the expression-language spelling of this operator.
    pub fn symbol(self) -> &'static str {
        match self {
            Op::Lt => "<",
            Op::Lte => "<=",
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::Eq => "=",
            Op::Neq => "!=",
            Op::In => "IN",
            Op::NotIn => "NOT IN",
            Op::Match => "MATCH",
            Op::NotMatch => "NOT MATCH",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complement_is_an_involution() {
        for op in Op::ALL {
            assert_ne!(op.complement(), op);
            assert_eq!(op.complement().complement(), op);
        }
    }

    #[test]
    fn complement_pairs() {
        assert_eq!(Op::Eq.complement(), Op::Neq);
        assert_eq!(Op::Lt.complement(), Op::Gte);
        assert_eq!(Op::Lte.complement(), Op::Gt);
        assert_eq!(Op::In.complement(), Op::NotIn);
        assert_eq!(Op::Match.complement(), Op::NotMatch);
    }

    #[test]
    fn op_classes() {
        assert!(Op::Lt.is_ordering());
        assert!(Op::Gte.is_ordering());
        assert!(!Op::Eq.is_ordering());
        assert!(Op::NotIn.is_membership());
        assert!(Op::NotMatch.is_pattern());
        assert!(Op::Neq.is_negative());
        assert!(!Op::Gt.is_negative());

        let scalar: Vec<Op> = Op::ALL.into_iter().filter(|op| op.is_scalar()).collect();
        assert_eq!(scalar, [Op::Lt, Op::Lte, Op::Gt, Op::Gte, Op::Eq, Op::Neq]);
    }

    #[test]
    fn op_eval_ordering() {
        // Less than
        assert!(Op::Lt.eval_ordering(Some(Ordering::Less)));
        assert!(!Op::Lt.eval_ordering(Some(Ordering::Equal)));
        assert!(!Op::Lt.eval_ordering(Some(Ordering::Greater)));

        // Less than or equal
        assert!(Op::Lte.eval_ordering(Some(Ordering::Less)));
        assert!(Op::Lte.eval_ordering(Some(Ordering::Equal)));
        assert!(!Op::Lte.eval_ordering(Some(Ordering::Greater)));

        // Greater than
        assert!(Op::Gt.eval_ordering(Some(Ordering::Greater)));
        assert!(!Op::Gt.eval_ordering(Some(Ordering::Equal)));

        // Greater than or equal
        assert!(Op::Gte.eval_ordering(Some(Ordering::Equal)));
        assert!(!Op::Gte.eval_ordering(Some(Ordering::Less)));
    }

    #[test]
    fn unordered_values_keep_complements_apart() {
        for op in [Op::Lt, Op::Lte, Op::Gt, Op::Gte] {
            assert_ne!(
                op.eval_ordering(None),
                op.complement().eval_ordering(None),
                "{op} and its complement agree on NaN"
            );
        }
    }

    #[test]
    fn symbols() {
        for op in [Op::Eq, Op::Neq, Op::Lt, Op::Lte, Op::Gt, Op::Gte] {
            assert_eq!(Op::from_symbol(op.symbol()), Some(op));
        }
        assert_eq!(Op::from_symbol("=="), None);
        assert_eq!(Op::from_symbol("=<"), None);
        assert_eq!(Op::from_symbol("!"), None);
        assert_eq!(Op::NotIn.to_string(), "NOT IN");
        assert_eq!(Op::NotIn.as_str(), "NOT_IN");
    }
}
