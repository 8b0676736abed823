//! Applying a matcher to collections.
//!
//! Every method stops at the first record whose evaluation errors and
//! returns that error.

use crate::error::Result;
use crate::matcher::Matcher;
use crate::record::Record;

impl Matcher {
    /// Returns references to the matching records, in order.
    ///
    /// # Example
    ///
    /// ```
    /// use sieve::{Matcher, Value};
    ///
    /// let values = [Value::I64(1), Value::I64(5), Value::I64(9)];
    /// let hits = Matcher::gt(3i64).filter(&values).unwrap();
    /// assert_eq!(hits, [&Value::I64(5), &Value::I64(9)]);
    /// ```
    pub fn filter<'a, T: Record>(&self, items: &'a [T]) -> Result<Vec<&'a T>> {
        let mut results = Vec::new();
        for item in items {
            if self.matches(item)? {
                results.push(item);
            }
        }
        Ok(results)
    }

    /// Counts the matching records.
    pub fn count<T: Record>(&self, items: &[T]) -> Result<usize> {
        let mut count = 0;
        for item in items {
            if self.matches(item)? {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Returns `true` if any record matches.
    pub fn any_match<T: Record>(&self, items: &[T]) -> Result<bool> {
        Ok(self.position(items)?.is_some())
    }

    /// Returns `true` if every record matches. Vacuously true when empty.
    pub fn all_match<T: Record>(&self, items: &[T]) -> Result<bool> {
        for item in items {
            if !self.matches(item)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Finds the first matching record.
    pub fn find<'a, T: Record>(&self, items: &'a [T]) -> Result<Option<&'a T>> {
        Ok(self.position(items)?.map(|i| &items[i]))
    }

    /// Finds the index of the first matching record.
    pub fn position<T: Record>(&self, items: &[T]) -> Result<Option<usize>> {
        for (i, item) in items.iter().enumerate() {
            if self.matches(item)? {
                return Ok(Some(i));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::MatchError;
    use crate::matcher::Matcher;
    use crate::structure::StructMatcher;
    use crate::value::Value;
    use std::collections::HashMap;

    fn task(name: &str, priority: i64) -> HashMap<String, Value> {
        HashMap::from([
            ("name".to_string(), Value::from(name)),
            ("priority".to_string(), Value::I64(priority)),
        ])
    }

    fn tasks() -> Vec<HashMap<String, Value>> {
        vec![task("docs", 3), task("bug", 5), task("old", 1)]
    }

    fn urgent() -> Matcher {
        Matcher::Struct(StructMatcher::new().with_field("priority", Matcher::gte(3i64)))
    }

    #[test]
    fn filter_keeps_order() {
        let items = tasks();
        let hits = urgent().filter(&items).unwrap();
        let names: Vec<_> = hits.iter().map(|t| t["name"].clone()).collect();
        assert_eq!(names, [Value::from("docs"), Value::from("bug")]);
    }

    #[test]
    fn count_and_quantifiers() {
        let items = tasks();
        assert_eq!(urgent().count(&items), Ok(2));
        assert_eq!(urgent().any_match(&items), Ok(true));
        assert_eq!(urgent().all_match(&items), Ok(false));
        assert_eq!(Matcher::any().all_match(&items), Ok(true));
        assert_eq!(Matcher::none().any_match(&items), Ok(false));
    }

    #[test]
    fn empty_collection() {
        let items: Vec<Value> = Vec::new();
        assert_eq!(Matcher::none().all_match(&items), Ok(true));
        assert_eq!(Matcher::any().any_match(&items), Ok(false));
        assert_eq!(Matcher::any().find(&items), Ok(None));
    }

    #[test]
    fn find_and_position() {
        let items = tasks();
        let lowest = Matcher::Struct(StructMatcher::new().with_field("priority", Matcher::lt(2i64)));
        assert_eq!(lowest.position(&items), Ok(Some(2)));
        assert_eq!(lowest.find(&items).unwrap().map(|t| &t["name"]), Some(&Value::from("old")));
    }

    #[test]
    fn first_error_stops_the_scan() {
        let items = [Value::I64(1), Value::from("x"), Value::I64(9)];
        let err = Matcher::lt(5i64).filter(&items).unwrap_err();
        assert!(matches!(err, MatchError::Mismatch { .. }));
        // The first record already matches, so the bad one is never reached.
        assert_eq!(Matcher::lt(5i64).position(&items), Ok(Some(0)));
    }
}
