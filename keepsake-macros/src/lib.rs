//! Procedural macros for the keepsake project.
//!
//! `#[derive(Document)]` implements `keepsake::document::Document` for a record type.
//! The collection name comes from `#[document(collection = "...")]`, or defaults to the
//! lowercased type name.
//!
//! ```ignore
//! #[derive(Debug, Clone, Serialize, Deserialize, Document)]
//! #[document(collection = "photo")]
//! pub struct Photo {
//!     pub uploader: String,
//!     pub file_url: String,
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as keepsake_macros;

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput, LitStr};

#[proc_macro_derive(Document, attributes(document))]
pub fn derive_document(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand_document(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_document(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut collection: Option<LitStr> = None;

    for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("document")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("collection") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().is_empty() {
                    return Err(meta.error("collection name must not be empty"));
                }
                collection = Some(value);
                Ok(())
            } else {
                Err(meta.error("unsupported document attribute, expected `collection`"))
            }
        })?;
    }

    let collection = collection
        .unwrap_or_else(|| LitStr::new(&name.to_string().to_lowercase(), name.span()));

    Ok(quote! {
        impl #impl_generics ::keepsake::document::Document for #name #ty_generics #where_clause {
            fn collection_name() -> &'static str {
                #collection
            }
        }
    })
}
