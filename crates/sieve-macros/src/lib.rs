//! Procedural macros for sieve.
//!
//! # Derive Macros
//!
//! - [`Record`] - Expose struct fields to matchers and to the expression parser

mod record;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `sieve::Record` and `sieve::Describe` for a struct.
///
/// Only annotated fields are exposed. Each exposed field is converted into
/// the [`Value`] variant of its declared kind when a matcher reads it, so
/// the Rust type must convert into that kind's primitive with `Into`.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `I8` ... `U64`, `F32`, `F64` | Numeric field of that width |
/// | `Bool` | Boolean field |
/// | `String` | String field |
/// | `kind = "..."` | Kind by name, accepting aliases such as `"int"` or `"float"` |
/// | `skip` | Exclude this field |
/// | `rename = "..."` | Use a custom name in matchers and expressions |
///
/// Kind names ignore case.
///
/// # Generated Code
///
/// 1. Field name constants (e.g., `Task::NAME`, `Task::PRIORITY`)
/// 2. `Record::field()` returning the exposed fields by name
/// 3. `Describe::schema()` listing the exposed fields and their kinds
///
/// # Example
///
/// ```ignore
/// use sieve::{parse_for, Record};
///
/// #[derive(Record)]
/// struct Task {
///     #[record(String)]
///     name: String,
///
///     #[record(U8)]
///     priority: u8,
///
///     #[record(kind = "bool", rename = "closed")]
///     done: bool,
///
///     internal_id: u64,
/// }
///
/// let m = parse_for::<Task>("priority >= 3 AND closed = false").unwrap();
/// let task = Task { name: "Write docs".into(), priority: 3, done: false, internal_id: 1 };
/// assert_eq!(m.matches(&task), Ok(true));
/// assert_eq!(Task::CLOSED, "closed");
/// ```
///
/// [`Value`]: https://docs.rs/sieve/latest/sieve/enum.Value.html
#[proc_macro_derive(Record, attributes(record))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
