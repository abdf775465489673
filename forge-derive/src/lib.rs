//! Derive macro for the per-variant "kind info" boilerplate described by
//! the forge AST's node-kind info table: a human name and a declarable
//! flag, read off each enum variant. (Operator symbols are not part of
//! this table — they vary per-instance rather than per-kind, since a
//! `value-unary`/`value-binary` node's concrete operator lives in its
//! payload; see `Node::operator_symbol` in `ast/mod.rs`.)
//!
//! Modeled on the attribute-driven enum derives used by the pesca parser
//! crates this workspace grew out of (`#[terminal]` on token variants):
//! here the attribute is `#[declarable]`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{DataEnum, DeriveInput, Fields, Variant};

#[proc_macro_derive(NodeInfo, attributes(declarable))]
pub fn derive_node_info(input: TokenStream) -> TokenStream {
    let ast = syn::parse(input).unwrap();
    impl_node_info_macro(ast)
}

/// Converts a `PascalCase` variant identifier to the `kebab-case` kind
/// name used by debug printing (e.g. `ValueBool` -> `value-bool`).
fn to_kebab_case(ident: &str) -> String {
    let mut out = String::new();
    for (i, c) in ident.chars().enumerate() {
        if c.is_uppercase() {
            if i != 0 {
                out.push('-');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn variant_pattern(ident: &syn::Ident, variant: &Variant) -> proc_macro2::TokenStream {
    let var_ident = &variant.ident;
    match &variant.fields {
        Fields::Named(_) => quote! { #ident::#var_ident { .. } },
        Fields::Unnamed(_) => quote! { #ident::#var_ident(..) },
        Fields::Unit => quote! { #ident::#var_ident },
    }
}

fn impl_node_info_macro(ast: DeriveInput) -> TokenStream {
    let DeriveInput { ident, data, .. } = ast;

    let syn::Data::Enum(DataEnum { variants, .. }) = data else {
        panic!("NodeInfo can only be derived for enums");
    };

    let name_arms = variants.iter().map(|variant| {
        let pattern = variant_pattern(&ident, variant);
        let name = to_kebab_case(&variant.ident.to_string());
        quote! { #pattern => #name, }
    });

    let declarable_arms = variants.iter().map(|variant| {
        let pattern = variant_pattern(&ident, variant);
        let is_declarable = variant
            .attrs
            .iter()
            .any(|attr| attr.path().is_ident("declarable"));
        quote! { #pattern => #is_declarable, }
    });

    let gen = quote! {
        impl #ident {
            /// The human-readable kind name, as used by debug printing.
            pub fn kind_name(&self) -> &'static str {
                match self {
                    #(#name_arms)*
                }
            }

            /// Whether nodes of this kind may be inserted into a scope frame
            /// by a declaration block's "load into frame" step.
            pub fn is_declarable(&self) -> bool {
                match self {
                    #(#declarable_arms)*
                }
            }
        }
    };

    gen.into()
}
