//! `#[derive(Context)]`: one `FromRef` impl per field of the root.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

use crate::fields::named_fields;

pub fn derive_context_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let root = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match named_fields(&input, "Context") {
        Ok(fields) => fields,
        Err(err) => return err.to_compile_error().into(),
    };

    let impls = fields.iter().filter_map(|field| {
        let ident = field.ident.as_ref()?;
        let ty = &field.ty;
        Some(quote! {
            impl #impl_generics crate::FromRef<#root #ty_generics> for #ty #where_clause {
                fn from_ref(root: &#root #ty_generics) -> Self {
                    root.#ident.clone()
                }
            }
        })
    });

    quote! { #(#impls)* }.into()
}
