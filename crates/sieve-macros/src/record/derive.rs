//! Implementation of the `#[derive(Record)]` macro.
//!
//! Generates field name constants plus the `Record` and `Describe` impls.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use super::attrs::parse_record_attrs;

/// Main implementation of the Record derive macro.
pub fn record_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Record can only be derived for structs",
            ))
        }
    };

    let mut field_arms: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut schema_entries: Vec<TokenStream> = Vec::new();
    let mut seen: Vec<String> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attr = match parse_record_attrs(&field.attrs)? {
            Some(attr) if !attr.skip => attr,
            _ => continue,
        };

        let kind = match attr.kind {
            Some(kind) => kind,
            None => {
                return Err(Error::new(
                    field.span(),
                    "#[record(...)] needs a kind, e.g. #[record(I64)]",
                ))
            }
        };

        let record_name = attr.rename.unwrap_or_else(|| field_name.to_string());
        if seen.contains(&record_name) {
            return Err(Error::new(
                field.span(),
                format!("duplicate record field name '{record_name}'"),
            ));
        }
        seen.push(record_name.clone());

        let const_name = format_ident!("{}", to_screaming_snake_case(&record_name));
        field_constants.push(quote! {
            /// Field name constant for matchers and expressions.
            pub const #const_name: &'static str = #record_name;
        });

        let variant = format_ident!("{}", kind.variant());
        let primitive = kind.primitive();
        field_arms.push(quote! {
            #record_name => ::std::option::Option::Some(::std::borrow::Cow::Owned(
                ::sieve::Value::#variant(
                    ::std::convert::Into::<#primitive>::into(::std::clone::Clone::clone(&self.#field_name))
                )
            )),
        });

        schema_entries.push(quote! {
            .with_field(#record_name, ::sieve::Kind::#variant)
        });
    }

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*
        }

        impl #impl_generics ::sieve::Record for #struct_name #ty_generics #where_clause {
            fn field(&self, name: &str) -> ::std::option::Option<::std::borrow::Cow<'_, ::sieve::Value>> {
                match name {
                    #(#field_arms)*
                    _ => ::std::option::Option::None,
                }
            }
        }

        impl #impl_generics ::sieve::Describe for #struct_name #ty_generics #where_clause {
            fn schema() -> ::sieve::Schema {
                ::sieve::Schema::new()
                    #(#schema_entries)*
            }
        }
    };

    Ok(expanded)
}

/// Convert a string to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = c.is_alphabetic();
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(src: &str) -> Result<String> {
        let input: DeriveInput = syn::parse_str(src)?;
        record_derive_impl(input).map(|tokens| tokens.to_string())
    }

    #[test]
    fn test_screaming_snake_case() {
        assert_eq!(to_screaming_snake_case("name"), "NAME");
        assert_eq!(to_screaming_snake_case("created_at"), "CREATED_AT");
        assert_eq!(to_screaming_snake_case("createdAt"), "CREATED_AT");
        assert_eq!(to_screaming_snake_case("my-field"), "MY_FIELD");
        assert_eq!(to_screaming_snake_case("New"), "NEW");
    }

    #[test]
    fn test_expands_exposed_fields_only() {
        let out = expand(
            r#"
            struct Task {
                #[record(String)]
                name: String,
                #[record(U8, rename = "level")]
                priority: u8,
                #[record(skip)]
                id: u64,
                note: String,
            }
            "#,
        )
        .unwrap();
        assert!(out.contains("pub const NAME"));
        assert!(out.contains("pub const LEVEL"));
        assert!(out.contains(":: sieve :: Kind :: U8"));
        assert!(!out.contains("\"id\""));
        assert!(!out.contains("\"note\""));
    }

    #[test]
    fn test_rejects_tuple_structs_and_enums() {
        let err = expand("struct Pair(u8, u8);").unwrap_err();
        assert!(err.to_string().contains("named fields"));
        let err = expand("enum Status { Open, Closed }").unwrap_err();
        assert!(err.to_string().contains("only be derived for structs"));
    }

    #[test]
    fn test_rejects_missing_kind_and_duplicates() {
        let err = expand("struct T { #[record(rename = \"x\")] a: u8 }").unwrap_err();
        assert!(err.to_string().contains("needs a kind"));
        let err = expand(
            "struct T { #[record(U8)] a: u8, #[record(U8, rename = \"a\")] b: u8 }",
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }
}
