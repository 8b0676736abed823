//! Record access traits.
//!
//! Matchers never inspect a record directly. They go through [`Record`],
//! which resolves a field name to a [`Value`], and the parser learns which
//! fields exist through [`Describe`]. Both are usually derived with
//! `#[derive(Record)]` from the `sieve-macros` crate, but can be implemented
//! by hand.

use std::borrow::{Borrow, Cow};
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use crate::schema::Schema;
use crate::value::Value;

/// Something a matcher can be evaluated against.
///
/// A record is either field-readable (a struct or a string-keyed map), a
/// scalar (a single [`Value`]), or both.
///
/// # Manual Implementation
///
/// ```
/// use std::borrow::Cow;
/// use sieve::{Matcher, Record, StructMatcher, Value};
///
/// struct Task {
///     name: String,
///     priority: u8,
/// }
///
/// impl Record for Task {
///     fn field(&self, name: &str) -> Option<Cow<'_, Value>> {
///         match name {
///             "name" => Some(Cow::Owned(Value::from(self.name.as_str()))),
///             "priority" => Some(Cow::Owned(Value::from(self.priority))),
///             _ => None,
///         }
///     }
/// }
///
/// let urgent = StructMatcher::new().with_field("priority", Matcher::gte(5u8));
/// let task = Task { name: "Fix bug".into(), priority: 7 };
/// assert_eq!(urgent.matches(&task), Ok(true));
/// ```
pub trait Record {
    /// Returns the value of a field, or `None` if the record has no such
    /// field. Absence is reported to the caller as an error, never replaced
    /// by a default.
    fn field(&self, name: &str) -> Option<Cow<'_, Value>>;

    /// Returns the record itself as a value, if it is a scalar.
    ///
    /// This is what a bare field matcher (field `_` in an expression)
    /// compares against.
    fn scalar(&self) -> Option<Cow<'_, Value>> {
        None
    }
}

/// Describes the fields of a record type for the parser.
pub trait Describe {
    /// Returns the name and kind of every field the type exposes.
    fn schema() -> Schema;
}

impl Record for Value {
    fn field(&self, _name: &str) -> Option<Cow<'_, Value>> {
        None
    }

    fn scalar(&self) -> Option<Cow<'_, Value>> {
        Some(Cow::Borrowed(self))
    }
}

impl<K, S> Record for HashMap<K, Value, S>
where
    K: Borrow<str> + Eq + Hash,
    S: BuildHasher,
{
    fn field(&self, name: &str) -> Option<Cow<'_, Value>> {
        self.get(name).map(Cow::Borrowed)
    }
}

impl<K> Record for BTreeMap<K, Value>
where
    K: Borrow<str> + Ord,
{
    fn field(&self, name: &str) -> Option<Cow<'_, Value>> {
        self.get(name).map(Cow::Borrowed)
    }
}

macro_rules! scalar_record {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Record for $ty {
                fn field(&self, _name: &str) -> Option<Cow<'_, Value>> {
                    None
                }

                fn scalar(&self) -> Option<Cow<'_, Value>> {
                    Some(Cow::Owned(Value::from(self.clone())))
                }
            }
        )*
    };
}

scalar_record!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, bool, String);

impl Record for &str {
    fn field(&self, _name: &str) -> Option<Cow<'_, Value>> {
        None
    }

    fn scalar(&self) -> Option<Cow<'_, Value>> {
        Some(Cow::Owned(Value::from(*self)))
    }
}
