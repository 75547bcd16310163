//! Attribute parsing for the Record derive macro.
//!
//! Field attributes: `#[field(Int)]`, `#[field(String, rename = "x")]`,
//! `#[field(Decimal, optional)]`, `#[field(skip)]`.
//! Struct attribute: `#[record(name = "Customer")]`.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Expr, ExprLit, Ident, Lit, Meta, Result, Token,
};

/// The declared type of a queryable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Int,
    Decimal,
    String,
    Bool,
    Date,
}

const EXPECTED_KINDS: &str = "Int, Decimal, String, Bool, Date";

impl FieldKind {
    fn parse_name(name: &str, span: Span) -> Result<Self> {
        match name {
            "Int" | "int" => Ok(FieldKind::Int),
            "Decimal" | "decimal" => Ok(FieldKind::Decimal),
            "String" | "string" => Ok(FieldKind::String),
            "Bool" | "bool" => Ok(FieldKind::Bool),
            "Date" | "date" => Ok(FieldKind::Date),
            other => Err(Error::new(
                span,
                format!(
                    "unknown field type: '{}'. Expected one of: {}",
                    other, EXPECTED_KINDS
                ),
            )),
        }
    }

    pub fn from_ident(ident: &Ident) -> Result<Self> {
        Self::parse_name(&ident.to_string(), ident.span())
    }

    /// Name of the matching `dynfilter::FieldType` variant.
    pub fn variant(self) -> &'static str {
        match self {
            FieldKind::Int => "Int",
            FieldKind::Decimal => "Decimal",
            FieldKind::String => "String",
            FieldKind::Bool => "Bool",
            FieldKind::Date => "Date",
        }
    }
}

/// Field-level attributes from `#[field(...)]`.
#[derive(Debug, Clone)]
pub struct FieldAttr {
    pub kind: Option<FieldKind>,
    pub skip: bool,
    pub optional: bool,
    pub rename: Option<String>,
    pub span: Span,
}

impl Default for FieldAttr {
    fn default() -> Self {
        FieldAttr {
            kind: None,
            skip: false,
            optional: false,
            rename: None,
            span: Span::call_site(),
        }
    }
}

fn string_value(expr: &Expr, what: &str) -> Result<syn::LitStr> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s.clone()),
        other => Err(Error::new(
            other.span(),
            format!("{} must be a string literal", what),
        )),
    }
}

impl Parse for FieldAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) if p.is_ident("skip") => attr.skip = true,
                Meta::Path(p) if p.is_ident("optional") => attr.optional = true,
                Meta::Path(p) => {
                    let ident = p.get_ident().ok_or_else(|| {
                        Error::new(
                            p.span(),
                            format!("expected field type ({}), skip or optional", EXPECTED_KINDS),
                        )
                    })?;
                    if attr.kind.is_some() {
                        return Err(Error::new(ident.span(), "field type given more than once"));
                    }
                    attr.kind = Some(FieldKind::from_ident(ident)?);
                    attr.span = ident.span();
                }
                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    let s = string_value(&nv.value, "rename")?;
                    if s.value().is_empty() {
                        return Err(Error::new(s.span(), "rename must not be empty"));
                    }
                    attr.rename = Some(s.value());
                }
                Meta::NameValue(nv) if nv.path.is_ident("ty") => {
                    let s = string_value(&nv.value, "ty")?;
                    if attr.kind.is_some() {
                        return Err(Error::new(s.span(), "field type given more than once"));
                    }
                    attr.kind = Some(FieldKind::parse_name(&s.value(), s.span())?);
                    attr.span = s.span();
                }
                Meta::NameValue(nv) => {
                    return Err(Error::new(
                        nv.path.span(),
                        "unknown attribute. Expected: rename or ty",
                    ));
                }
                Meta::List(list) => {
                    return Err(Error::new(
                        list.span(),
                        "unexpected nested list in #[field(...)]",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Extracts the `#[field(...)]` attribute from a field's attributes.
pub fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldAttr> {
    for attr in attrs {
        if attr.path().is_ident("field") {
            return attr.parse_args::<FieldAttr>();
        }
    }
    Ok(FieldAttr::default())
}

/// Struct-level attributes from `#[record(...)]`.
#[derive(Debug, Clone, Default)]
pub struct RecordAttr {
    pub name: Option<String>,
}

impl Parse for RecordAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = RecordAttr::default();
        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;
        for meta in content {
            match &meta {
                Meta::NameValue(nv) if nv.path.is_ident("name") => {
                    attr.name = Some(string_value(&nv.value, "name")?.value());
                }
                other => {
                    return Err(Error::new(
                        other.span(),
                        "unknown record attribute. Expected: name = \"...\"",
                    ));
                }
            }
        }
        Ok(attr)
    }
}

pub fn parse_record_attrs(attrs: &[Attribute]) -> Result<RecordAttr> {
    for attr in attrs {
        if attr.path().is_ident("record") {
            return attr.parse_args::<RecordAttr>();
        }
    }
    Ok(RecordAttr::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_field(tokens: &str) -> Result<FieldAttr> {
        syn::parse_str::<FieldAttr>(tokens)
    }

    #[test]
    fn field_types() {
        assert_eq!(parse_field("Int").unwrap().kind, Some(FieldKind::Int));
        assert_eq!(parse_field("Decimal").unwrap().kind, Some(FieldKind::Decimal));
        assert_eq!(parse_field("String").unwrap().kind, Some(FieldKind::String));
        assert_eq!(parse_field("Bool").unwrap().kind, Some(FieldKind::Bool));
        assert_eq!(parse_field("Date").unwrap().kind, Some(FieldKind::Date));
    }

    #[test]
    fn lowercase_field_types() {
        assert_eq!(parse_field("int").unwrap().kind, Some(FieldKind::Int));
        assert_eq!(parse_field("date").unwrap().kind, Some(FieldKind::Date));
    }

    #[test]
    fn skip() {
        let attr = parse_field("skip").unwrap();
        assert!(attr.skip);
        assert_eq!(attr.kind, None);
    }

    #[test]
    fn rename_and_optional() {
        let attr = parse_field("Decimal, rename = \"spendAverage\", optional").unwrap();
        assert_eq!(attr.kind, Some(FieldKind::Decimal));
        assert_eq!(attr.rename.as_deref(), Some("spendAverage"));
        assert!(attr.optional);
    }

    #[test]
    fn ty_string() {
        let attr = parse_field("ty = \"bool\"").unwrap();
        assert_eq!(attr.kind, Some(FieldKind::Bool));
    }

    #[test]
    fn unknown_type_is_error() {
        let err = parse_field("Float").unwrap_err();
        assert!(err.to_string().contains("unknown field type"));
    }

    #[test]
    fn duplicate_type_is_error() {
        assert!(parse_field("Int, String").is_err());
        assert!(parse_field("Int, ty = \"string\"").is_err());
    }

    #[test]
    fn rename_must_be_string() {
        assert!(parse_field("Int, rename = 5").is_err());
        assert!(parse_field("Int, rename = \"\"").is_err());
    }

    #[test]
    fn unknown_name_value_is_error() {
        assert!(parse_field("Int, alias = \"a\"").is_err());
    }

    #[test]
    fn record_name() {
        let attr = syn::parse_str::<RecordAttr>("name = \"Client\"").unwrap();
        assert_eq!(attr.name.as_deref(), Some("Client"));
        assert!(syn::parse_str::<RecordAttr>("title = \"x\"").is_err());
    }
}
