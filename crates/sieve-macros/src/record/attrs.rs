//! Parsing of the `#[record(...)]` field attributes.

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Lit, Meta, Result, Token,
};

const EXPECTED: &str = "I8, I16, I32, I64, U8, U16, U32, U64, F32, F64, Bool, String";

/// The kind of an exposed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Bool,
    String,
}

impl FieldKind {
    /// Parses a kind name, ignoring case. Accepts the same aliases as
    /// `sieve::Kind`'s `FromStr`.
    pub fn from_name(name: &str, span: Span) -> Result<Self> {
        let kind = match name.to_ascii_lowercase().as_str() {
            "i8" | "int8" => FieldKind::I8,
            "i16" | "int16" => FieldKind::I16,
            "i32" | "int32" => FieldKind::I32,
            "i64" | "int64" | "int" => FieldKind::I64,
            "u8" | "uint8" => FieldKind::U8,
            "u16" | "uint16" => FieldKind::U16,
            "u32" | "uint32" => FieldKind::U32,
            "u64" | "uint64" | "uint" => FieldKind::U64,
            "f32" | "float32" => FieldKind::F32,
            "f64" | "float64" | "float" => FieldKind::F64,
            "bool" | "boolean" => FieldKind::Bool,
            "string" | "str" => FieldKind::String,
            _ => {
                return Err(Error::new(
                    span,
                    format!("unknown record kind: '{name}'. Expected one of: {EXPECTED}"),
                ))
            }
        };
        Ok(kind)
    }

    /// The `sieve::Kind` and `sieve::Value` variant name.
    pub fn variant(self) -> &'static str {
        match self {
            FieldKind::I8 => "I8",
            FieldKind::I16 => "I16",
            FieldKind::I32 => "I32",
            FieldKind::I64 => "I64",
            FieldKind::U8 => "U8",
            FieldKind::U16 => "U16",
            FieldKind::U32 => "U32",
            FieldKind::U64 => "U64",
            FieldKind::F32 => "F32",
            FieldKind::F64 => "F64",
            FieldKind::Bool => "Bool",
            FieldKind::String => "String",
        }
    }

    /// The Rust type a field value is converted into.
    pub fn primitive(self) -> TokenStream {
        match self {
            FieldKind::I8 => quote!(i8),
            FieldKind::I16 => quote!(i16),
            FieldKind::I32 => quote!(i32),
            FieldKind::I64 => quote!(i64),
            FieldKind::U8 => quote!(u8),
            FieldKind::U16 => quote!(u16),
            FieldKind::U32 => quote!(u32),
            FieldKind::U64 => quote!(u64),
            FieldKind::F32 => quote!(f32),
            FieldKind::F64 => quote!(f64),
            FieldKind::Bool => quote!(bool),
            FieldKind::String => quote!(::std::string::String),
        }
    }
}

/// Field-level attributes from `#[record(...)]`.
#[derive(Debug, Clone)]
pub struct RecordAttr {
    pub kind: Option<FieldKind>,
    pub skip: bool,
    /// Name used in matchers and expressions (default: the field name).
    pub rename: Option<String>,
}

impl Parse for RecordAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = RecordAttr {
            kind: None,
            skip: false,
            rename: None,
        };

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                // record(skip), record(I64), record(string), ...
                Meta::Path(p) => {
                    if p.is_ident("skip") {
                        attr.skip = true;
                    } else if let Some(ident) = p.get_ident() {
                        attr.set_kind(FieldKind::from_name(&ident.to_string(), ident.span())?, p.span())?;
                    } else {
                        return Err(Error::new(
                            p.span(),
                            format!("expected a record kind or skip. Kinds: {EXPECTED}"),
                        ));
                    }
                }

                // rename = "name" or kind = "int"
                Meta::NameValue(nv) => {
                    let value = match &nv.value {
                        syn::Expr::Lit(syn::ExprLit {
                            lit: Lit::Str(s), ..
                        }) => s,
                        other => {
                            return Err(Error::new(other.span(), "expected a string literal"))
                        }
                    };
                    if nv.path.is_ident("rename") {
                        attr.rename = Some(value.value());
                    } else if nv.path.is_ident("kind") {
                        attr.set_kind(FieldKind::from_name(&value.value(), value.span())?, value.span())?;
                    } else {
                        return Err(Error::new(
                            nv.path.span(),
                            "unknown attribute. Expected: rename or kind",
                        ));
                    }
                }

                Meta::List(_) => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown record attribute. Expected: a kind, skip, rename = \"...\", or kind = \"...\"",
                    ));
                }
            }
        }

        if attr.skip && attr.kind.is_some() {
            return Err(Error::new(input.span(), "a skipped field cannot declare a kind"));
        }

        Ok(attr)
    }
}

impl RecordAttr {
    fn set_kind(&mut self, kind: FieldKind, span: Span) -> Result<()> {
        if self.kind.is_some() {
            return Err(Error::new(span, "record kind declared twice"));
        }
        self.kind = Some(kind);
        Ok(())
    }
}

/// Extracts the `#[record(...)]` attribute of a field, if any.
pub fn parse_record_attrs(attrs: &[Attribute]) -> Result<Option<RecordAttr>> {
    attrs
        .iter()
        .find(|attr| attr.path().is_ident("record"))
        .map(|attr| attr.parse_args::<RecordAttr>())
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_record(tokens: &str) -> Result<RecordAttr> {
        syn::parse_str::<RecordAttr>(tokens)
    }

    #[test]
    fn test_record_kind() {
        let attr = parse_record("I64").unwrap();
        assert_eq!(attr.kind, Some(FieldKind::I64));
        assert!(!attr.skip);
        assert_eq!(attr.rename, None);
    }

    #[test]
    fn test_record_kind_ignores_case() {
        assert_eq!(parse_record("string").unwrap().kind, Some(FieldKind::String));
        assert_eq!(parse_record("STRING").unwrap().kind, Some(FieldKind::String));
        assert_eq!(parse_record("u8").unwrap().kind, Some(FieldKind::U8));
    }

    #[test]
    fn test_record_kind_by_name() {
        let attr = parse_record(r#"kind = "float""#).unwrap();
        assert_eq!(attr.kind, Some(FieldKind::F64));
        let attr = parse_record(r#"kind = "uint""#).unwrap();
        assert_eq!(attr.kind, Some(FieldKind::U64));
    }

    #[test]
    fn test_record_bool_aliases() {
        assert_eq!(parse_record("Bool").unwrap().kind, Some(FieldKind::Bool));
        assert_eq!(parse_record("boolean").unwrap().kind, Some(FieldKind::Bool));
    }

    #[test]
    fn test_record_skip() {
        let attr = parse_record("skip").unwrap();
        assert!(attr.skip);
        assert_eq!(attr.kind, None);
    }

    #[test]
    fn test_record_rename() {
        let attr = parse_record(r#"String, rename = "title""#).unwrap();
        assert_eq!(attr.kind, Some(FieldKind::String));
        assert_eq!(attr.rename, Some("title".to_string()));
    }

    #[test]
    fn test_record_kind_with_rename() {
        let attr = parse_record(r#"kind = "i32", rename = "level""#).unwrap();
        assert_eq!(attr.kind, Some(FieldKind::I32));
        assert_eq!(attr.rename, Some("level".to_string()));
    }

    #[test]
    fn test_record_invalid_kind() {
        let err = parse_record("Timestamp").unwrap_err();
        assert!(err.to_string().contains("unknown record kind"));
        assert!(parse_record(r#"kind = "decimal""#).is_err());
    }

    #[test]
    fn test_record_rejects_conflicts() {
        assert!(parse_record("I64, U8").is_err());
        assert!(parse_record("skip, I64").is_err());
        assert!(parse_record("rename = 3").is_err());
        assert!(parse_record(r#"alias = "x""#).is_err());
    }

    #[test]
    fn test_variant_names() {
        assert_eq!(FieldKind::U16.variant(), "U16");
        assert_eq!(FieldKind::String.variant(), "String");
    }
}
