//! Named-field conjunctions.

use std::collections::BTreeMap;

use crate::error::{MatchError, Result};
use crate::field::Yielder;
use crate::matcher::Matcher;
use crate::record::Record;

/// A conjunction of per-field matchers.
///
/// Each entry constrains one field of the record. Matching reads every
/// configured field and evaluates its matcher, stopping at the first `false`
/// or error. A missing field is an error.
///
/// Fields are kept in name order. Evaluation and printing both visit them in
/// that order, so output is deterministic.
///
/// The record being matched is threaded through evaluation rather than
/// stored on the matcher: a `StructMatcher` is immutable once built and can
/// be shared between threads.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use sieve::{Matcher, StructMatcher, Value};
///
/// let mut change = StructMatcher::new();
/// let repeat = change.field("Repeat");
/// let current = change.field("Current");
/// change.add_field("New", Matcher::eq(repeat) & Matcher::neq(current));
///
/// let record: HashMap<&str, Value> = [
///     ("Current", Value::from("x")),
///     ("New", Value::from("y")),
///     ("Repeat", Value::from("y")),
/// ]
/// .into_iter()
/// .collect();
/// assert_eq!(change.matches(&record), Ok(true));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructMatcher {
    fields: BTreeMap<String, Matcher>,
}

impl StructMatcher {
    pub fn new() -> Self {
        StructMatcher::default()
    }

    /// Registers or replaces the constraint on a field.
    pub fn add_field(&mut self, name: impl Into<String>, matcher: Matcher) -> &mut Self {
        self.fields.insert(name.into(), matcher);
        self
    }

    /// Builder-style [`add_field`](Self::add_field).
    pub fn with_field(mut self, name: impl Into<String>, matcher: Matcher) -> Self {
        self.add_field(name, matcher);
        self
    }

    /// Returns a reference to another field of the record this matcher is
    /// evaluated against, for use as a leaf operand.
    pub fn field(&self, name: impl Into<String>) -> Yielder {
        Yielder::new(name)
    }

    /// Returns the constraint on a field.
    pub fn get(&self, name: &str) -> Option<&Matcher> {
        self.fields.get(name)
    }

    /// Iterates over the constraints in field-name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Matcher)> {
        self.fields.iter().map(|(name, m)| (name.as_str(), m))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Tests a record against every field constraint.
    pub fn matches(&self, record: &dyn Record) -> Result<bool> {
        for (name, matcher) in &self.fields {
            let value = record.field(name).ok_or_else(|| MatchError::MissingField {
                field: name.clone(),
            })?;
            if !matcher.eval(&*value, Some(record))? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
