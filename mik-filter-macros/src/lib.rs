// =============================================================================
// CRATE-LEVEL QUALITY LINTS (following Tokio/Serde standards)
// =============================================================================
#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]
// Note: unreachable_pub is not applicable to proc-macro crates where internal
// functions need pub visibility for module organization but aren't exported
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
// =============================================================================
// CLIPPY CONFIGURATION FOR PROC-MACRO CRATES
// =============================================================================
#![allow(clippy::doc_markdown)] // Code in docs - extensive changes needed
#![allow(clippy::missing_errors_doc)] // # Errors sections - doc-heavy
#![allow(clippy::missing_panics_doc)] // # Panics sections - doc-heavy

//! Proc-macros for `mik-filter` - `#[derive(Filterable)]`.
//!
//! Use through the `mik_filter` re-export rather than depending on this
//! crate directly.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;
mod kind;

/// Derive `mik_filter::Filterable` for a struct with named fields.
///
/// Generates a `Shape::Record` listing every field in declaration order.
///
/// ```ignore
/// #[derive(Filterable)]
/// pub struct User {
///     pub id: u64,
///     #[filter(rename = "user_name")]
///     pub name: String,
///     #[filter(skip)]
///     pub password_hash: String,
///     #[filter(output_format = "%Y-%m-%d")]
///     pub created_at: DateTime<Utc>,
/// }
/// ```
#[proc_macro_derive(Filterable, attributes(filter))]
pub fn derive_filterable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
