//! Implementation of the `#[derive(Record)]` macro.
//!
//! Generates one extractor function per queryable field, a static schema
//! registering them, and field name constants.

use std::collections::HashSet;

use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Ident, LitStr, Result};

use super::attrs::{parse_field_attrs, parse_record_attrs, FieldKind};

/// Main implementation of the Record derive macro.
pub fn record_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "Record cannot be derived for generic structs",
        ));
    }

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

    let record_attrs = parse_record_attrs(&input.attrs)?;
    let schema_name = record_attrs
        .name
        .unwrap_or_else(|| struct_name.to_string());

    let mut extractors: Vec<TokenStream> = Vec::new();
    let mut registrations: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut seen_consts: HashSet<String> = HashSet::new();

    for (index, field) in fields.iter().enumerate() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_field_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        let kind = match attrs.kind {
            Some(kind) => kind,
            None if attrs.optional || attrs.rename.is_some() => {
                return Err(Error::new(
                    field.span(),
                    "#[field(...)] needs a type: Int, Decimal, String, Bool or Date",
                ))
            }
            None => continue,
        };

        let query_name = attrs.rename.unwrap_or_else(|| field_name.to_string());
        if !seen.insert(query_name.clone()) {
            return Err(Error::new(
                attrs.span,
                format!("duplicate query field name '{}'", query_name),
            ));
        }
        let query_lit = LitStr::new(&query_name, attrs.span);

        let const_name = const_ident(&query_name, attrs.span)?;
        if !seen_consts.insert(const_name.to_string()) {
            return Err(Error::new(
                attrs.span,
                format!(
                    "query field name '{}' collides with another field's constant {}",
                    query_name, const_name
                ),
            ));
        }
        field_constants.push(quote! {
            /// Field name constant for dynamic filters.
            pub const #const_name: &'static str = #query_lit;
        });

        let body = if attrs.optional {
            let inner = value_expr(kind, quote! { *value });
            quote! {
                match &record.#field_name {
                    ::core::option::Option::Some(value) => #inner,
                    ::core::option::Option::None => ::dynfilter::Value::Null,
                }
            }
        } else {
            value_expr(kind, quote! { record.#field_name })
        };

        let extractor = format_ident!("__dynfilter_field_{}", index);
        extractors.push(quote! {
            fn #extractor(record: &#struct_name) -> ::dynfilter::Value<'_> {
                #body
            }
        });

        let variant = format_ident!("{}", kind.variant());
        registrations.push(quote! {
            .field(#query_lit, ::dynfilter::FieldType::#variant, #extractor)
        });
    }

    let expanded = quote! {
        impl #struct_name {
            #(#field_constants)*
        }

        impl ::dynfilter::Record for #struct_name {
            fn schema() -> &'static ::dynfilter::Schema<Self> {
                #(#extractors)*

                static SCHEMA: ::dynfilter::__private::Lazy<::dynfilter::Schema<#struct_name>> =
                    ::dynfilter::__private::Lazy::new(|| {
                        ::dynfilter::Schema::builder(#schema_name)
                            #(#registrations)*
                            .build()
                    });
                &SCHEMA
            }
        }
    };

    Ok(expanded)
}

/// Builds the `Value` for one field. `place` is a place expression of the
/// field's (non-optional) type.
fn value_expr(kind: FieldKind, place: TokenStream) -> TokenStream {
    match kind {
        FieldKind::Int => quote! {
            ::dynfilter::Value::Int(::core::convert::From::from(#place))
        },
        FieldKind::Decimal => quote! { ::dynfilter::Value::Decimal(#place) },
        FieldKind::String => quote! {
            ::dynfilter::Value::String(::core::convert::AsRef::<str>::as_ref(&#place))
        },
        FieldKind::Bool => quote! { ::dynfilter::Value::Bool(#place) },
        FieldKind::Date => quote! { ::dynfilter::Value::Date(#place) },
    }
}

/// The name constant for `query_name`, or an error when the converted name
/// is not a valid identifier (`"spend.avg"`, `"2fa"`).
fn const_ident(query_name: &str, span: Span) -> Result<Ident> {
    let name = to_screaming_snake_case(query_name);
    let mut ident = syn::parse_str::<Ident>(&name).map_err(|_| {
        Error::new(
            span,
            format!(
                "query field name '{}' does not make a valid constant name ({})",
                query_name, name
            ),
        )
    })?;
    ident.set_span(span);
    Ok(ident)
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
        } else if c == '_' || c == '-' || c == ' ' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = c.is_alphanumeric();
        }
    }

    result
}
