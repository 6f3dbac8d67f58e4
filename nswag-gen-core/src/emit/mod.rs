//! Renders an OpenAPI description into a Rust API client.

use proc_macro2::TokenStream;
use quote::quote;

use crate::parse::{Document, path::BadPath};

mod client;
mod context;
mod naming;
mod operation;
mod schema;
mod settings;

pub use settings::*;

use self::{
    client::CodegenClient,
    context::CodegenContext,
    naming::{CodegenIdent, CodegenVis},
    schema::CodegenSchemaType,
};

/// Generates a single Rust source file for a description.
#[derive(Debug)]
pub struct ClientGenerator<'a> {
    doc: &'a Document,
    settings: ClientGeneratorSettings,
}

impl<'a> ClientGenerator<'a> {
    pub fn new(doc: &'a Document, settings: ClientGeneratorSettings) -> Self {
        Self { doc, settings }
    }

    /// Renders the client, the error type, and the DTO types
    /// into formatted Rust source.
    pub fn generate_file(&self) -> Result<String, EmitError> {
        let context = CodegenContext::new(self.doc, &self.settings);
        let settings = &self.settings;

        let uses = settings
            .additional_namespace_usages
            .iter()
            .filter_map(|usage| syn::parse_str::<syn::Path>(usage).ok())
            .map(|path| quote!(#[allow(unused_imports)] use #path::*;));

        let types = if settings.generate_dto_types {
            let schemas = self
                .doc
                .components
                .iter()
                .flat_map(|components| &components.schemas)
                .filter(|(name, _)| !context.is_excluded_type(name));
            schemas
                .map(|(name, schema)| CodegenSchemaType::new(&context, name, schema).to_tokens())
                .collect::<Result<Vec<_>, _>>()?
        } else {
            vec![]
        };

        let client = if settings.generate_client_classes {
            CodegenClient::new(&context).to_tokens()?
        } else {
            quote!()
        };

        let items = quote! {
            #(#uses)*
            #client
            #(#types)*
        };
        let items = nest(&settings.types.namespace, items);

        let file: syn::File = syn::parse2(items).map_err(EmitError::Format)?;
        let mut text = String::from(HEADER);
        text.push_str(&prettyplease::unparse(&file));
        Ok(text)
    }
}

/// Wraps `items` in one module per segment of a dotted namespace.
fn nest(namespace: &str, items: TokenStream) -> TokenStream {
    namespace
        .split('.')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .rev()
        .fold(items, |items, segment| {
            let name = CodegenIdent::Module(segment);
            let vis = CodegenVis::Public;
            quote! {
                #vis mod #name {
                    #items
                }
            }
        })
}

/// Generates one or more `#[doc]` attributes for a description,
/// wrapping at 80 characters for readability.
pub fn doc_attrs(description: &str) -> TokenStream {
    let lines = textwrap::wrap(description, 80)
        .into_iter()
        .map(|line| format!(" {line}"))
        .map(|line| quote!(#[doc = #line]));
    quote! { #(#lines)* }
}

const HEADER: &str = "\
// <auto-generated>
//     Generated by nswag-gen. Changes to this file will be lost
//     when the code is regenerated.
// </auto-generated>

";

#[derive(Debug, miette::Diagnostic, thiserror::Error)]
pub enum EmitError {
    #[error("reference to undefined schema `{0}`")]
    #[diagnostic(code(nswag::emit::unresolved_ref))]
    UnresolvedRef(String),
    #[error(transparent)]
    #[diagnostic(transparent)]
    BadPath(#[from] BadPath),
    #[error("generated code isn't valid Rust")]
    #[diagnostic(code(nswag::emit::format))]
    Format(#[source] syn::Error),
}
