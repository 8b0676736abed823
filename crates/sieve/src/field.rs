//! Leaf matchers.
//!
//! A [`FieldMatcher`] compares the scalar value of a record against an
//! [`Operand`] with one [`Op`]. Comparison is strictly typed:
//!
//! - `Eq`/`Neq` are true only for values of the same kind; values of
//!   different kinds are never equal, and that is not an error.
//! - `Lt`/`Lte`/`Gt`/`Gte` fail on a kind mismatch and on booleans.
//! - `In`/`NotIn` test membership; a record of another kind is simply not a
//!   member.
//! - `Match`/`NotMatch` need a string record and a valid pattern.

use std::borrow::Cow;
use std::collections::HashSet;

use regex::Regex;

use crate::error::{MatchError, Result};
use crate::op::Op;
use crate::record::Record;
use crate::value::{Kind, Value};

/// A leaf comparison: operator plus operand.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMatcher {
    op: Op,
    operand: Operand,
}

impl FieldMatcher {
    pub(crate) fn new(op: Op, operand: Operand) -> Self {
        FieldMatcher { op, operand }
    }

    pub fn op(&self) -> Op {
        self.op
    }

    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    /// Returns the leaf that matches exactly when this one does not.
    pub fn complement(self) -> FieldMatcher {
        FieldMatcher {
            op: self.op.complement(),
            operand: self.operand,
        }
    }

    /// Evaluates the leaf. `scope` is the record bound by the innermost
    /// enclosing struct matcher; field references resolve against it.
    pub(crate) fn eval(&self, record: &dyn Record, scope: Option<&dyn Record>) -> Result<bool> {
        let subject = record.scalar().ok_or(MatchError::NotScalar)?;
        match &self.operand {
            Operand::Value(value) => compare(self.op, &subject, value),
            Operand::Field(yielder) => {
                let value = yielder.resolve(scope)?;
                compare(self.op, &subject, &value)
            }
            Operand::Set(set) => {
                let hit = set.contains(&subject);
                Ok(hit != self.op.is_negative())
            }
            Operand::Pattern(pattern) => {
                let hit = pattern.is_match(self.op, &subject)?;
                Ok(hit != self.op.is_negative())
            }
        }
    }
}

/// Compares a record value against a single operand value.
fn compare(op: Op, subject: &Value, operand: &Value) -> Result<bool> {
    match op {
        Op::Eq => Ok(subject == operand),
        Op::Neq => Ok(subject != operand),
        Op::Lt | Op::Lte | Op::Gt | Op::Gte => {
            if subject.kind() != operand.kind() {
                return Err(MatchError::Mismatch {
                    op,
                    expected: operand.kind(),
                    actual: subject.kind(),
                });
            }
            if !subject.kind().is_ordered() {
                return Err(MatchError::Unordered { op });
            }
            Ok(op.eval_ordering(subject.compare(operand)))
        }
        Op::In | Op::NotIn | Op::Match | Op::NotMatch => Err(MatchError::NotScalarOp { op }),
    }
}

/// The right-hand side of a leaf comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A literal value.
    Value(Value),
    /// A membership list, for `In`/`NotIn`.
    Set(MemberSet),
    /// A regular expression, for `Match`/`NotMatch`.
    Pattern(Pattern),
    /// Another field of the record being matched.
    Field(Yielder),
}

impl From<Comparand> for Operand {
    fn from(comparand: Comparand) -> Self {
        match comparand {
            Comparand::Value(value) => Operand::Value(value),
            Comparand::Field(yielder) => Operand::Field(yielder),
        }
    }
}

/// The right-hand side of a single-value comparison (`=`, `!=`, `<`, ...).
///
/// Anything that converts into a [`Value`], or a [`Yielder`]. Lists and
/// patterns have their own constructors, so they cannot end up under a
/// scalar operator.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparand {
    Value(Value),
    Field(Yielder),
}

impl From<Value> for Comparand {
    fn from(value: Value) -> Self {
        Comparand::Value(value)
    }
}

impl From<Yielder> for Comparand {
    fn from(yielder: Yielder) -> Self {
        Comparand::Field(yielder)
    }
}

macro_rules! comparand_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Comparand {
                fn from(v: $ty) -> Self {
                    Comparand::Value(Value::from(v))
                }
            }
        )*
    };
}

comparand_from!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, bool, String, &str, isize, usize);

/// A homogeneous list of values with a prebuilt membership index.
///
/// The index is built once, when the set is created, so a set can be shared
/// across threads and evaluated concurrently. `NaN` is never a member, and
/// `0.0` and `-0.0` are the same member.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberSet {
    kind: Option<Kind>,
    values: Vec<Value>,
    index: HashSet<MemberKey>,
}

impl MemberSet {
    /// Builds a set. Fails if the values are not all of one kind.
    pub fn new(values: Vec<Value>) -> Result<Self> {
        if let Some(expected) = values.first().map(Value::kind) {
            if let Some(other) = values.iter().find(|v| v.kind() != expected) {
                return Err(MatchError::MixedList {
                    expected,
                    actual: other.kind(),
                });
            }
        }
        Ok(MemberSet::of_one_kind(values))
    }

    /// Builds a set from values that already share one kind.
    pub(crate) fn of_one_kind(values: Vec<Value>) -> Self {
        let kind = values.first().map(Value::kind);
        let index = values.iter().filter_map(MemberKey::of).collect();
        MemberSet {
            kind,
            values,
            index,
        }
    }

    /// Returns the element kind, or `None` for an empty set.
    pub fn kind(&self) -> Option<Kind> {
        self.kind
    }

    /// Returns the values in the order they were given.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns `true` if `value` has the set's kind and is a member.
    pub fn contains(&self, value: &Value) -> bool {
        self.kind == Some(value.kind())
            && MemberKey::of(value).is_some_and(|key| self.index.contains(&key))
    }
}

/// Hashable projection of a value. Kinds are checked before lookup, so all
/// integers can share one variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum MemberKey {
    Int(i128),
    Float(u64),
    Bool(bool),
    Str(String),
}

impl MemberKey {
    fn of(value: &Value) -> Option<MemberKey> {
        let key = match value {
            Value::I8(n) => MemberKey::Int(i128::from(*n)),
            Value::I16(n) => MemberKey::Int(i128::from(*n)),
            Value::I32(n) => MemberKey::Int(i128::from(*n)),
            Value::I64(n) => MemberKey::Int(i128::from(*n)),
            Value::U8(n) => MemberKey::Int(i128::from(*n)),
            Value::U16(n) => MemberKey::Int(i128::from(*n)),
            Value::U32(n) => MemberKey::Int(i128::from(*n)),
            Value::U64(n) => MemberKey::Int(i128::from(*n)),
            Value::F32(x) => return float_key(f64::from(*x)),
            Value::F64(x) => return float_key(*x),
            Value::Bool(b) => MemberKey::Bool(*b),
            Value::String(s) => MemberKey::Str(s.clone()),
        };
        Some(key)
    }
}

fn float_key(x: f64) -> Option<MemberKey> {
    if x.is_nan() {
        None
    } else if x == 0.0 {
        Some(MemberKey::Float(0f64.to_bits()))
    } else {
        Some(MemberKey::Float(x.to_bits()))
    }
}

/// A regular expression operand, compiled when the matcher is built.
///
/// An invalid pattern is kept as written. Every evaluation of a matcher
/// holding it fails with [`MatchError::InvalidPattern`].
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    compiled: std::result::Result<Regex, String>,
}

impl Pattern {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let compiled = Regex::new(&source).map_err(|e| e.to_string());
        Pattern { source, compiled }
    }

    /// Returns the pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_valid(&self) -> bool {
        self.compiled.is_ok()
    }

    fn is_match(&self, op: Op, subject: &Value) -> Result<bool> {
        let regex = self
            .compiled
            .as_ref()
            .map_err(|reason| MatchError::InvalidPattern {
                pattern: self.source.clone(),
                reason: reason.clone(),
            })?;
        let text = subject.as_str().ok_or(MatchError::NotAString {
            op,
            actual: subject.kind(),
        })?;
        Ok(regex.is_match(text))
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// A lazy reference to another field of the record being matched.
///
/// A yielder is obtained from [`StructMatcher::field`](crate::StructMatcher::field)
/// and used as the operand of a leaf. It yields nothing by itself: at match
/// time it reads the named field from the record bound by the innermost
/// enclosing struct matcher.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Yielder {
    field: String,
}

impl Yielder {
    pub fn new(field: impl Into<String>) -> Self {
        Yielder {
            field: field.into(),
        }
    }

    /// Returns the name of the referenced field.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Reads the referenced field from `scope`.
    pub fn resolve(&self, scope: Option<&dyn Record>) -> Result<Value> {
        let record = scope.ok_or_else(|| MatchError::Unbound {
            field: self.field.clone(),
        })?;
        record
            .field(&self.field)
            .map(Cow::into_owned)
            .ok_or_else(|| MatchError::MissingField {
                field: self.field.clone(),
            })
    }
}
