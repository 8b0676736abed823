//! Sieve - composable predicates over typed records.
//!
//! Sieve builds boolean matchers over scalar values and named-field records,
//! simplifies them as they are combined, evaluates them, and compiles them
//! to text. It supports:
//!
//! - Scalar leaves: ordering, equality, list membership, regular expressions
//! - Combinators: `and`, `or`, `negate`, with constant folding and flattening
//! - Struct matchers that constrain named fields and may compare one field
//!   of a record against another
//! - A small filter language parsed against a field whitelist
//! - Printers for a readable form and for SQL `WHERE` fragments
//!
//! # Quick Start
//!
//! ```rust
//! use sieve::{Matcher, StructMatcher, Value};
//! use std::collections::HashMap;
//!
//! let adult = StructMatcher::new()
//!     .with_field("age", Matcher::gte(18i64))
//!     .with_field("name", Matcher::re_match("^[A-Z]"));
//! let m = Matcher::from(adult) | Matcher::none();
//!
//! let record: HashMap<&str, Value> =
//!     [("age", Value::I64(30)), ("name", Value::from("Ada"))].into_iter().collect();
//!
//! assert_eq!(m.matches(&record), Ok(true));
//! assert_eq!(m.to_string(), r#"age >= 18 AND name MATCH "^[A-Z]""#);
//! assert_eq!(m.to_sql().unwrap(), "age >= 18 AND name REGEXP '^[A-Z]'");
//! ```
//!
//! # Filter Expressions
//!
//! ```rust
//! use sieve::{parse, Kind, Schema};
//!
//! let schema = Schema::new().with_field("age", Kind::U8).with_field("name", Kind::String);
//! let m = parse(r#"age > 20 OR name IN ("root" "admin")"#, &schema).unwrap();
//! assert_eq!(m.to_string(), r#"(age > 20) OR (name IN ["root" "admin"])"#);
//! ```
//!
//! # Typing
//!
//! Values are strictly typed. Equality between different kinds is simply
//! `false`, while ordering between different kinds is an error: a leaf
//! built from `1i32` never equals a record holding `1i64`.
//!
//! # Simplification
//!
//! | Input | Result |
//! |-------|--------|
//! | `and(x, any)` | `x` |
//! | `and(x, none)` | `none` |
//! | `or(x, any)` | `any` |
//! | `or(x, none)` | `x` |
//! | `and(and(a, b), c)` | `and(a, b, c)` |
//! | `negate(negate(x))` | `x` |
//! | `negate(lt(v))` | `gte(v)` |

mod collection;
mod error;
mod field;
pub mod lexer;
mod matcher;
mod op;
mod parser;
mod printer;
mod record;
mod schema;
mod structure;
mod value;

// Re-export public API
pub use error::{ErrorCode, MatchError, ParseError, PrintError, Result};
pub use field::{Comparand, FieldMatcher, MemberSet, Operand, Pattern, Yielder};
pub use matcher::{Matcher, Terms};
pub use op::Op;
pub use parser::{parse, parse_for};
pub use printer::{DefaultPrinter, Dialect, Printer, SqlitePrinter, RECORD_FIELD};
pub use record::{Describe, Record};
pub use schema::Schema;
pub use structure::StructMatcher;
pub use value::{Kind, Scalar, UnknownKind, Value};
