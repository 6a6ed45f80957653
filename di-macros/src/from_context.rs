//! `#[derive(FromContext)]`: build a struct field by field from the root.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

use crate::fields::named_fields;

pub fn derive_from_context_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let root = root_type(&input);

    let fields = match named_fields(&input, "FromContext") {
        Ok(fields) => fields,
        Err(err) => return err.to_compile_error().into(),
    };

    let inits = fields.iter().filter_map(|field| {
        let ident = field.ident.as_ref()?;
        let ty = &field.ty;
        Some(quote! {
            #ident: <#ty as crate::FromRef<#root>>::from_ref(root)
        })
    });

    quote! {
        impl #impl_generics crate::FromRef<#root> for #name #ty_generics #where_clause {
            fn from_ref(root: &#root) -> Self {
                Self {
                    #(#inits),*
                }
            }
        }
    }
    .into()
}

/// Root type from `#[from_context(Context = "Root")]`, defaulting to `Context`.
fn root_type(input: &DeriveInput) -> proc_macro2::TokenStream {
    let mut root: Option<syn::Type> = None;

    for attr in input
        .attrs
        .iter()
        .filter(|a| a.path().is_ident("from_context"))
    {
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("Context") {
                let lit: syn::LitStr = meta.value()?.parse()?;
                root = Some(lit.parse()?);
            }
            Ok(())
        });
    }

    match root {
        Some(ty) => quote! { #ty },
        None => quote! { Context },
    }
}
