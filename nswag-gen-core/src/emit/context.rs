use proc_macro2::TokenStream;
use quote::{ToTokens, quote};

use crate::parse::{Document, Format, RefOrSchema, Schema, SchemaRef, Ty, AdditionalProperties};

use super::{
    ClientGeneratorSettings, EmitError, TypeSettings,
    naming::{CodegenIdent, CodegenVis},
};

/// Everything the emitters share: the description, the settings, and the
/// Rust types the type settings resolve to.
#[derive(Debug)]
pub struct CodegenContext<'a> {
    pub doc: &'a Document,
    pub settings: &'a ClientGeneratorSettings,
    any: TokenStream,
    array: TokenStream,
    dictionary: TokenStream,
    date: TokenStream,
    date_time: TokenStream,
}

impl<'a> CodegenContext<'a> {
    pub fn new(doc: &'a Document, settings: &'a ClientGeneratorSettings) -> Self {
        let types = &settings.types;
        let defaults = TypeSettings::default();
        Self {
            doc,
            settings,
            any: setting::<syn::Type>(&types.any_type, &defaults.any_type),
            array: setting::<syn::Path>(&types.array_type, &defaults.array_type),
            dictionary: setting::<syn::Path>(&types.dictionary_type, &defaults.dictionary_type),
            date: setting::<syn::Type>(&types.date_type, &defaults.date_type),
            date_time: setting::<syn::Type>(&types.date_time_type, &defaults.date_time_type),
        }
    }

    pub fn type_vis(&self) -> CodegenVis {
        CodegenVis::from_modifier(&self.settings.types.type_access_modifier)
    }

    pub fn client_vis(&self) -> CodegenVis {
        CodegenVis::from_modifier(&self.settings.client_class_access_modifier)
    }

    /// The client's error type.
    pub fn error_type(&self) -> CodegenIdent<'a> {
        CodegenIdent::Type(&self.settings.exception_class)
    }

    pub fn is_excluded_type(&self, name: &str) -> bool {
        self.settings.types.excluded_type_names.iter().any(|n| n == name)
    }

    /// Returns the Rust type for a schema or reference.
    pub fn ref_or_schema(&self, schema: &RefOrSchema) -> Result<TokenStream, EmitError> {
        match schema {
            RefOrSchema::Ref(r) => self.schema_ref(&r.path),
            RefOrSchema::Schema(schema) => self.schema(schema),
        }
    }

    /// Returns the type name for a reference to a component schema.
    pub fn schema_ref(&self, r: &SchemaRef) -> Result<TokenStream, EmitError> {
        if self.doc.schema(r.name()).is_none() {
            return Err(EmitError::UnresolvedRef(r.name().to_owned()));
        }
        Ok(CodegenIdent::Type(r.name()).into_token_stream())
    }

    /// Returns the Rust type for an inline schema, wrapped in an `Option`
    /// if it's nullable.
    pub fn schema(&self, schema: &Schema) -> Result<TokenStream, EmitError> {
        let ty = self.non_null_schema(schema)?;
        Ok(if schema.is_nullable() {
            quote!(::std::option::Option<#ty>)
        } else {
            ty
        })
    }

    fn non_null_schema(&self, schema: &Schema) -> Result<TokenStream, EmitError> {
        if let Some([only]) = schema.all_of.as_deref() {
            return self.ref_or_schema(only);
        }
        if schema.all_of.is_some() || schema.one_of.is_some() || schema.any_of.is_some() {
            return Ok(self.any.clone());
        }
        Ok(match (schema.primary_type(), schema.format) {
            (Some(Ty::String), Some(Format::DateTime)) => self.date_time.clone(),
            (Some(Ty::String), Some(Format::Date)) => self.date.clone(),
            (Some(Ty::String), Some(Format::Uuid)) => quote!(::uuid::Uuid),
            (Some(Ty::String), Some(Format::Uri)) => quote!(::url::Url),
            (Some(Ty::String), Some(Format::Byte | Format::Binary)) => {
                quote!(::std::vec::Vec<u8>)
            }
            (Some(Ty::String), _) => quote!(::std::string::String),
            (Some(Ty::Integer), Some(Format::Int32)) => quote!(i32),
            (Some(Ty::Integer), _) => quote!(i64),
            (Some(Ty::Number), Some(Format::Float)) => quote!(f32),
            (Some(Ty::Number), _) => quote!(f64),
            (Some(Ty::Boolean), _) => quote!(bool),
            (Some(Ty::Array), _) => {
                let item = match &schema.items {
                    Some(items) => self.ref_or_schema(items)?,
                    None => self.any.clone(),
                };
                let array = &self.array;
                quote!(#array<#item>)
            }
            (Some(Ty::Object) | None, _) if schema.properties.is_none() => {
                match &schema.additional_properties {
                    Some(AdditionalProperties::RefOrSchema(value)) => {
                        let value = self.ref_or_schema(value)?;
                        let dictionary = &self.dictionary;
                        quote!(#dictionary<::std::string::String, #value>)
                    }
                    Some(AdditionalProperties::Bool(true)) => {
                        let (dictionary, any) = (&self.dictionary, &self.any);
                        quote!(#dictionary<::std::string::String, #any>)
                    }
                    _ => self.any.clone(),
                }
            }
            // Inline objects with properties, and `null`-only schemas.
            _ => self.any.clone(),
        })
    }
}

/// Parses a type setting, falling back to the default if it isn't valid
/// Rust.
pub(super) fn setting<T: syn::parse::Parse + ToTokens>(value: &str, default: &str) -> TokenStream {
    syn::parse_str::<T>(value)
        .or_else(|_| syn::parse_str::<T>(default))
        .map(|parsed| parsed.into_token_stream())
        .unwrap_or_else(|err| err.into_compile_error())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::tests::{PETSTORE_JSON, assert_matches};

    fn render(ctx: &CodegenContext<'_>, json: &str) -> String {
        let schema: RefOrSchema = serde_json::from_str(json).unwrap();
        ctx.ref_or_schema(&schema).unwrap().to_string()
    }

    #[test]
    fn test_primitive_types() {
        let doc = Document::from_json(PETSTORE_JSON).unwrap();
        let settings = ClientGeneratorSettings::default();
        let ctx = CodegenContext::new(&doc, &settings);

        assert_eq!(render(&ctx, r#"{"type": "integer", "format": "int32"}"#), "i32");
        assert_eq!(render(&ctx, r#"{"type": "integer"}"#), "i64");
        assert_eq!(render(&ctx, r#"{"type": "string", "format": "uuid"}"#), ":: uuid :: Uuid");
        assert_eq!(
            render(&ctx, r#"{"type": "string", "nullable": true}"#),
            ":: std :: option :: Option < :: std :: string :: String >"
        );
    }

    #[test]
    fn test_containers_use_settings() {
        let doc = Document::from_json(PETSTORE_JSON).unwrap();
        let mut settings = ClientGeneratorSettings::default();
        settings.types.array_type = "::smallvec::SmallVec".to_owned();
        settings.types.dictionary_type = "System.Collections.Generic.IDictionary".to_owned();
        let ctx = CodegenContext::new(&doc, &settings);

        assert_eq!(
            render(&ctx, r##"{"type": "array", "items": {"$ref": "#/components/schemas/Pet"}}"##),
            ":: smallvec :: SmallVec < Pet >"
        );
        // Not a Rust path, so the default wins.
        assert_eq!(
            render(&ctx, r#"{"type": "object", "additionalProperties": {"type": "boolean"}}"#),
            ":: std :: collections :: BTreeMap < :: std :: string :: String , bool >"
        );
    }

    #[test]
    fn test_unresolved_ref() {
        let doc = Document::from_json(PETSTORE_JSON).unwrap();
        let settings = ClientGeneratorSettings::default();
        let ctx = CodegenContext::new(&doc, &settings);
        let schema: RefOrSchema =
            serde_json::from_str(r##"{"$ref": "#/components/schemas/Owner"}"##).unwrap();
        assert_matches!(ctx.ref_or_schema(&schema), Err(EmitError::UnresolvedRef(ref name)) if name == "Owner");
    }
}
