//! Mapping Rust field types to `mik_filter::FieldKind`.

use proc_macro2::TokenStream as TokenStream2;
use quote::{ToTokens, quote};
use syn::{GenericArgument, PathArguments, Type};

/// Field kind as seen at expansion time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    Bool,
    Int(u32),
    Uint(u32),
    Float(u32),
    String,
    Timestamp,
    Nullable(Box<Kind>),
    Other(String),
}

impl Kind {
    /// Classify a field type by the last path segment.
    ///
    /// Type aliases are not resolved: `type Id = u64` maps to `Other("Id")`.
    pub fn of(ty: &Type) -> Self {
        match ty {
            Type::Reference(r) => Self::of(&r.elem),
            Type::Group(g) => Self::of(&g.elem),
            Type::Paren(p) => Self::of(&p.elem),
            Type::Path(type_path) => {
                let Some(segment) = type_path.path.segments.last() else {
                    return Self::Other(String::new());
                };
                let name = segment.ident.to_string();
                match name.as_str() {
                    "bool" => Self::Bool,
                    "i8" => Self::Int(8),
                    "i16" => Self::Int(16),
                    "i32" => Self::Int(32),
                    "i64" | "isize" => Self::Int(64),
                    "u8" => Self::Uint(8),
                    "u16" => Self::Uint(16),
                    "u32" => Self::Uint(32),
                    "u64" | "usize" => Self::Uint(64),
                    "f32" => Self::Float(32),
                    "f64" => Self::Float(64),
                    "String" | "str" => Self::String,
                    "DateTime" => Self::Timestamp,
                    "Option" => match first_type_arg(&segment.arguments) {
                        Some(inner) => Self::Nullable(Box::new(Self::of(inner))),
                        None => Self::Other(name),
                    },
                    _ => Self::Other(name),
                }
            },
            other => Self::Other(other.to_token_stream().to_string()),
        }
    }

    /// `true` for timestamps, nullable or not.
    pub fn is_timestamp(&self) -> bool {
        match self {
            Self::Timestamp => true,
            Self::Nullable(inner) => **inner == Self::Timestamp,
            _ => false,
        }
    }
}

fn first_type_arg(args: &PathArguments) -> Option<&Type> {
    if let PathArguments::AngleBracketed(args) = args
        && let Some(GenericArgument::Type(inner)) = args.args.first()
    {
        return Some(inner);
    }
    None
}

impl ToTokens for Kind {
    fn to_tokens(&self, tokens: &mut TokenStream2) {
        let kind = quote! { ::mik_filter::FieldKind };
        tokens.extend(match self {
            Self::Bool => quote! { #kind::Bool },
            Self::Int(bits) => quote! { #kind::Int(#bits) },
            Self::Uint(bits) => quote! { #kind::Uint(#bits) },
            Self::Float(bits) => quote! { #kind::Float(#bits) },
            Self::String => quote! { #kind::String },
            Self::Timestamp => quote! { #kind::Timestamp },
            Self::Nullable(inner) => {
                quote! { #kind::Nullable(::std::boxed::Box::new(#inner)) }
            },
            Self::Other(name) => quote! { #kind::Other(::std::string::String::from(#name)) },
        });
    }
}
