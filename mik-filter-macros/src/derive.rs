//! `#[derive(Filterable)]` expansion.

use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::punctuated::Punctuated;
use syn::token::Comma;
use syn::{Attribute, Data, DeriveInput, Field, Fields, LitStr};

use crate::kind::Kind;

// ============================================================================
// FIELD ATTRIBUTE PARSING
// ============================================================================

#[derive(Default)]
struct FieldAttrs {
    rename: Option<String>,
    skip: bool,
    input_format: Option<String>,
    output_format: Option<String>,
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("filter") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                // `rename = "-"` is the same as `skip`
                if value.value() == "-" {
                    result.skip = true;
                } else {
                    result.rename = Some(value.value());
                }
            } else if meta.path.is_ident("skip") {
                result.skip = true;
            } else if meta.path.is_ident("input_format") {
                let value: LitStr = meta.value()?.parse()?;
                result.input_format = Some(value.value());
            } else if meta.path.is_ident("output_format") {
                let value: LitStr = meta.value()?.parse()?;
                result.output_format = Some(value.value());
            } else {
                return Err(meta.error(
                    "unknown filter attribute. \
                     Expected one of: rename, skip, input_format, output_format",
                ));
            }
            Ok(())
        })?;
    }

    Ok(result)
}

// ============================================================================
// STRUCT FIELD EXTRACTION
// ============================================================================

fn extract_named_fields(input: &DeriveInput) -> syn::Result<&Punctuated<Field, Comma>> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(&fields.named),
            _ => Err(syn::Error::new_spanned(
                input,
                "Filterable derive only supports structs with named fields. \
                 Example: `struct User { id: u64, name: String }`",
            )),
        },
        _ => Err(syn::Error::new_spanned(
            input,
            "Filterable derive only supports structs. \
             A filter schema must be a record with named fields.",
        )),
    }
}

// ============================================================================
// DERIVE FILTERABLE
// ============================================================================

pub fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let descriptors = extract_named_fields(input)?
        .iter()
        .map(field_descriptor)
        .collect::<syn::Result<Vec<_>>>()?;

    Ok(quote! {
        impl #impl_generics ::mik_filter::Filterable for #name #ty_generics #where_clause {
            fn shape() -> ::mik_filter::Shape {
                ::mik_filter::Shape::Record(::std::vec![#(#descriptors),*])
            }
        }
    })
}

fn field_descriptor(field: &Field) -> syn::Result<TokenStream2> {
    let Some(ident) = &field.ident else {
        return Err(syn::Error::new_spanned(field, "expected a named field"));
    };
    let attrs = parse_field_attrs(&field.attrs)?;
    let kind = Kind::of(&field.ty);

    let has_format = attrs.input_format.is_some() || attrs.output_format.is_some();
    if has_format && !kind.is_timestamp() {
        return Err(syn::Error::new_spanned(
            &field.ty,
            "input_format / output_format only apply to DateTime fields",
        ));
    }

    let ident = ident.unraw().to_string();
    let mut descriptor = quote! {
        ::mik_filter::FieldDescriptor::new(#ident, #kind)
    };
    if let Some(rename) = &attrs.rename {
        descriptor.extend(quote! { .rename(#rename) });
    }
    if attrs.skip {
        descriptor.extend(quote! { .skip() });
    }
    if has_format {
        let input = optional_string(attrs.input_format.as_deref());
        let output = optional_string(attrs.output_format.as_deref());
        descriptor.extend(quote! {
            .time_format(::mik_filter::TimeFormat { input: #input, output: #output })
        });
    }
    Ok(descriptor)
}

fn optional_string(value: Option<&str>) -> TokenStream2 {
    match value {
        Some(s) => quote! { ::std::option::Option::Some(::std::string::String::from(#s)) },
        None => quote! { ::std::option::Option::None },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn expand_err(input: DeriveInput) -> String {
        expand(&input).unwrap_err().to_string()
    }

    #[test]
    fn test_rejects_enum() {
        let err = expand_err(parse_quote! { enum Status { Active, Deleted } });
        assert!(err.contains("only supports structs"));
    }

    #[test]
    fn test_rejects_tuple_struct() {
        let err = expand_err(parse_quote! { struct Id(u64); });
        assert!(err.contains("named fields"));
    }

    #[test]
    fn test_rejects_unit_struct() {
        let err = expand_err(parse_quote! { struct Marker; });
        assert!(err.contains("named fields"));
    }

    #[test]
    fn test_rejects_union() {
        let err = expand_err(parse_quote! { union Bits { a: u32, b: f32 } });
        assert!(err.contains("only supports structs"));
    }

    #[test]
    fn test_rejects_unknown_attribute() {
        let err = expand_err(parse_quote! {
            struct User {
                #[filter(sortable)]
                id: u64,
            }
        });
        assert!(err.contains("unknown filter attribute"));
    }

    #[test]
    fn test_rejects_format_on_non_timestamp() {
        let err = expand_err(parse_quote! {
            struct User {
                #[filter(output_format = "%Y")]
                name: String,
            }
        });
        assert!(err.contains("only apply to DateTime fields"));
    }

    #[test]
    fn test_dash_rename_skips() {
        let attrs = parse_field_attrs(&[parse_quote!(#[filter(rename = "-")])]).unwrap();
        assert!(attrs.skip);
        assert_eq!(attrs.rename, None);
    }

    #[test]
    fn test_ignores_other_attributes() {
        let attrs = parse_field_attrs(&[
            parse_quote!(#[serde(rename = "x")]),
            parse_quote!(#[filter(rename = "y", input_format = "%Y")]),
        ])
        .unwrap();
        assert_eq!(attrs.rename.as_deref(), Some("y"));
        assert_eq!(attrs.input_format.as_deref(), Some("%Y"));
        assert!(!attrs.skip);
    }

    #[test]
    fn test_expansion_uses_raw_ident_name() {
        let tokens = expand(&parse_quote! {
            struct Item { r#type: String }
        })
        .unwrap()
        .to_string();
        assert!(tokens.contains("\"type\""));
        assert!(!tokens.contains("r#type"));
    }
}
