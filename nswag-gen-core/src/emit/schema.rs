use indexmap::IndexMap;
use itertools::Itertools;
use proc_macro2::TokenStream;
use quote::quote;

use crate::parse::{RefOrSchema, Schema, Ty};

use super::{
    ClassStyle, EmitError, context::CodegenContext, doc_attrs, naming::CodegenIdent,
};

/// Generates the type definition for one component schema.
pub struct CodegenSchemaType<'a> {
    context: &'a CodegenContext<'a>,
    name: &'a str,
    schema: &'a Schema,
}

impl<'a> CodegenSchemaType<'a> {
    pub fn new(context: &'a CodegenContext<'a>, name: &'a str, schema: &'a Schema) -> Self {
        Self {
            context,
            name,
            schema,
        }
    }

    pub fn to_tokens(&self) -> Result<TokenStream, EmitError> {
        let schema = self.schema;
        if let Some(variants) = string_variants(schema) {
            return Ok(self.enum_(&variants));
        }
        if let Some(variants) = schema.one_of.as_deref().or(schema.any_of.as_deref()) {
            return self.untagged(variants);
        }
        if schema.properties.is_some() || schema.all_of.as_ref().is_some_and(|all| all.len() > 1)
        {
            let properties = self.properties()?;
            return self.struct_(&properties);
        }
        self.alias()
    }

    fn derives(&self) -> TokenStream {
        let eq = match self.context.settings.types.class_style {
            ClassStyle::Record => quote!(PartialEq,),
            ClassStyle::Poco | ClassStyle::Inpc | ClassStyle::Prism => quote!(),
        };
        quote! {
            #[derive(Clone, Debug, #eq ::serde::Serialize, ::serde::Deserialize)]
        }
    }

    fn json_methods(&self) -> TokenStream {
        if !self.context.settings.types.generate_json_methods {
            return quote!();
        }
        let name = CodegenIdent::Type(self.name);
        let vis = self.context.type_vis();
        quote! {
            impl #name {
                #vis fn to_json(&self) -> ::std::result::Result<::std::string::String, ::serde_json::Error> {
                    ::serde_json::to_string(self)
                }

                #vis fn from_json(json: &str) -> ::std::result::Result<Self, ::serde_json::Error> {
                    ::serde_json::from_str(json)
                }
            }
        }
    }

    /// Collects properties and required names, flattening `allOf` one
    /// level deep.
    fn properties(&self) -> Result<Vec<Property<'a>>, EmitError> {
        let mut parts = vec![self.schema];
        for part in self.schema.all_of.iter().flatten() {
            parts.push(match part {
                RefOrSchema::Ref(r) => self
                    .context
                    .doc
                    .schema(r.path.name())
                    .ok_or_else(|| EmitError::UnresolvedRef(r.path.name().to_owned()))?,
                RefOrSchema::Schema(schema) => schema.as_ref(),
            });
        }
        let mut properties = IndexMap::new();
        for &part in &parts {
            for (name, schema) in part.properties.iter().flatten() {
                properties.insert(name.as_str(), schema);
            }
        }
        Ok(properties
            .into_iter()
            .map(|(name, schema)| Property {
                name,
                schema,
                required: parts.iter().any(|part| part.required.iter().any(|r| r == name)),
            })
            .collect())
    }

    fn struct_(&self, properties: &[Property<'_>]) -> Result<TokenStream, EmitError> {
        let name = CodegenIdent::Type(self.name);
        let vis = self.context.type_vis();
        let fields = properties
            .iter()
            .map(|property| {
                let field = CodegenIdent::Field(property.name);
                let ty = self.context.ref_or_schema(property.schema)?;
                let rename = (field.to_unraw_string() != property.name).then(|| {
                    let original = property.name;
                    quote!(#[serde(rename = #original)])
                });
                let doc = match property.schema {
                    RefOrSchema::Schema(schema) => schema.description.as_deref().map(doc_attrs),
                    RefOrSchema::Ref(_) => None,
                };
                Ok(if property.required {
                    quote! {
                        #doc
                        #rename
                        #vis #field: #ty,
                    }
                } else {
                    quote! {
                        #doc
                        #rename
                        #[serde(default, skip_serializing_if = "::std::option::Option::is_none")]
                        #vis #field: ::std::option::Option<#ty>,
                    }
                })
            })
            .collect::<Result<Vec<_>, EmitError>>()?;
        let doc = self.schema.description.as_deref().map(doc_attrs);
        let derives = self.derives();
        let json = self.json_methods();
        Ok(quote! {
            #doc
            #derives
            #vis struct #name {
                #(#fields)*
            }

            #json
        })
    }

    fn enum_(&self, variants: &[&str]) -> TokenStream {
        let name = CodegenIdent::Type(self.name);
        let vis = self.context.type_vis();
        let variants = variants.iter().map(|&variant| {
            let ident = CodegenIdent::Variant(variant);
            quote! {
                #[serde(rename = #variant)]
                #ident,
            }
        });
        let doc = self.schema.description.as_deref().map(doc_attrs);
        let json = self.json_methods();
        quote! {
            #doc
            #[derive(
                Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd,
                ::serde::Serialize, ::serde::Deserialize,
            )]
            #vis enum #name {
                #(#variants)*
            }

            #json
        }
    }

    fn untagged(&self, variants: &[RefOrSchema]) -> Result<TokenStream, EmitError> {
        let name = CodegenIdent::Type(self.name);
        let vis = self.context.type_vis();
        let variants = variants
            .iter()
            .enumerate()
            .map(|(index, variant)| {
                let ty = self.context.ref_or_schema(variant)?;
                Ok(match variant {
                    RefOrSchema::Ref(r) => {
                        let ident = CodegenIdent::Variant(r.path.name());
                        quote!(#ident(#ty),)
                    }
                    RefOrSchema::Schema(_) => {
                        let ident = quote::format_ident!("V{index}");
                        quote!(#ident(#ty),)
                    }
                })
            })
            .collect::<Result<Vec<_>, EmitError>>()?;
        let doc = self.schema.description.as_deref().map(doc_attrs);
        let derives = self.derives();
        let json = self.json_methods();
        Ok(quote! {
            #doc
            #derives
            #[serde(untagged)]
            #vis enum #name {
                #(#variants)*
            }

            #json
        })
    }

    fn alias(&self) -> Result<TokenStream, EmitError> {
        let name = CodegenIdent::Type(self.name);
        let vis = self.context.type_vis();
        let ty = self.context.schema(self.schema)?;
        let doc = self.schema.description.as_deref().map(doc_attrs);
        Ok(quote! {
            #doc
            #vis type #name = #ty;
        })
    }
}

struct Property<'a> {
    name: &'a str,
    schema: &'a RefOrSchema,
    required: bool,
}

/// Returns the variants of a string enum, or `None` if `schema`
/// isn't one.
fn string_variants(schema: &Schema) -> Option<Vec<&str>> {
    if schema.primary_type() != Some(Ty::String) {
        return None;
    }
    let variants = schema.variants.as_ref()?;
    variants
        .iter()
        .filter(|value| !value.is_null())
        .map(|value| value.as_str())
        .collect::<Option<Vec<_>>>()
        .map(|variants| variants.into_iter().unique().collect())
}
