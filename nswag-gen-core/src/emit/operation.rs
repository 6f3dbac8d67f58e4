use itertools::Itertools;
use proc_macro2::{Span, TokenStream};
use quote::{ToTokens, TokenStreamExt, quote};
use syn::Ident;

use crate::parse::{
    Method, Operation, Parameter, ParameterLocation, PathItem, RefOrSchema, Ty,
    path::{self, PathFragment, PathSegment},
};

use super::{EmitError, context::CodegenContext, doc_attrs, naming::CodegenIdent};

/// Generates a single client method for an API operation.
#[derive(Debug)]
pub struct CodegenOperation<'a> {
    context: &'a CodegenContext<'a>,
    path: &'a str,
    method: Method,
    op: &'a Operation,
    segments: Vec<PathSegment<'a>>,
    params: Vec<CodegenParam<'a>>,
}

impl<'a> CodegenOperation<'a> {
    pub fn new(
        context: &'a CodegenContext<'a>,
        path: &'a str,
        item: &'a PathItem,
        method: Method,
        op: &'a Operation,
    ) -> Result<Self, EmitError> {
        let segments = path::parse(path)?;
        let params = CodegenParam::collect(context, &segments, item, op)?;
        Ok(Self {
            context,
            path,
            method,
            op,
            segments,
            params,
        })
    }

    /// Returns the method name: the operation ID if there is one, or
    /// the method and path otherwise.
    pub fn name(&self) -> String {
        match &self.op.operation_id {
            Some(id) => CodegenIdent::Method(id).to_unraw_string(),
            None => {
                let name = format!("{} {}", self.method.as_str(), self.path);
                CodegenIdent::Method(&name).to_unraw_string()
            }
        }
    }

    /// Generates the `#[doc]` and `#[deprecated]` attributes.
    pub fn attrs(&self) -> TokenStream {
        let doc = self
            .op
            .summary
            .as_deref()
            .or(self.op.description.as_deref())
            .map(doc_attrs);
        let deprecated = self.op.deprecated.then(|| quote!(#[deprecated]));
        quote! {
            #doc
            #deprecated
        }
    }

    /// Generates the method signature, without a visibility or body.
    pub fn signature(&self) -> Result<TokenStream, EmitError> {
        let name = self.name();
        let method_name = CodegenIdent::Method(&name);
        let params = self.params.iter().map(|param| {
            let ident = &param.ident;
            let ty = &param.ty;
            quote!(#ident: #ty)
        });
        let return_type = self.return_type()?;
        let error = self.context.error_type();
        Ok(quote! {
            async fn #method_name(
                &self,
                #(#params),*
            ) -> ::std::result::Result<#return_type, #error>
        })
    }

    /// Generates the method body.
    pub fn body(&self) -> Result<TokenStream, EmitError> {
        let build_url = self.url();
        let build_query = self.query();
        let build_request = self.request();
        let parse_response = if self.response_schema().is_some() {
            quote! {
                let __body = __response.bytes().await?;
                Ok(::serde_json::from_slice(&__body)?)
            }
        } else {
            quote! {
                let _ = __response;
                Ok(())
            }
        };
        Ok(quote! {
            #build_url
            #build_query
            #build_request
            #parse_response
        })
    }

    /// Returns the schema of the first successful JSON response.
    fn response_schema(&self) -> Option<&'a RefOrSchema> {
        self.op
            .responses
            .iter()
            .filter(|(status, _)| status.starts_with('2'))
            .filter_map(|(_, response)| response.content.as_ref())
            .flat_map(|content| content.iter())
            .find(|(media, _)| is_json(media))
            .and_then(|(_, media)| media.schema.as_ref())
    }

    fn return_type(&self) -> Result<TokenStream, EmitError> {
        match self.response_schema() {
            Some(schema) => self.context.ref_or_schema(schema),
            None => Ok(quote!(())),
        }
    }

    /// Generates code to build the request URL, with path parameters substituted.
    fn url(&self) -> TokenStream {
        let error = self.context.error_type();
        let segs = self.segments.iter().map(|segment| match segment.fragments() {
            [] => quote! { "" },
            [PathFragment::Literal(text)] => {
                let text: &str = text;
                quote! { #text }
            }
            [PathFragment::Param(name)] => {
                let value = CodegenIdent::Param(name);
                quote! { #value }
            }
            fragments => {
                // Build a format string, with placeholders for parameter fragments.
                let format = fragments.iter().fold(String::new(), |mut f, fragment| {
                    match fragment {
                        PathFragment::Literal(text) => {
                            f.push_str(&text.replace('{', "{{").replace('}', "}}"))
                        }
                        PathFragment::Param(_) => f.push_str("{}"),
                    }
                    f
                });
                // `url::PathSegmentsMut::push` percent-encodes the full
                // segment, so fragments are interpolated directly.
                let args = segment.params().map(CodegenIdent::Param);
                quote! { &format!(#format, #(#args),*) }
            }
        });
        quote! {
            let __url = {
                let mut __url = self.base_url.clone();
                __url
                    .path_segments_mut()
                    .map_err(|()| #error::UrlCannotBeABase)?
                    .pop_if_empty()
                    #(.push(#segs))*;
                __url
            };
        }
    }

    /// Generates code to append query parameters.
    fn query(&self) -> TokenStream {
        let serializations = self
            .params
            .iter()
            .filter(|param| param.location == ParameterLocation::Query && !param.is_body)
            .map(|param| {
                let name = param.name;
                let ident = &param.ident;
                match (param.is_array, param.required) {
                    (true, true) => quote! {
                        for value in &#ident {
                            __url.query_pairs_mut().append_pair(#name, &value.to_string());
                        }
                    },
                    (true, false) => quote! {
                        if let Some(values) = &#ident {
                            for value in values {
                                __url.query_pairs_mut().append_pair(#name, &value.to_string());
                            }
                        }
                    },
                    (false, true) => quote! {
                        __url.query_pairs_mut().append_pair(#name, &#ident.to_string());
                    },
                    (false, false) => quote! {
                        if let Some(value) = &#ident {
                            __url.query_pairs_mut().append_pair(#name, &value.to_string());
                        }
                    },
                }
            })
            .collect_vec();
        if serializations.is_empty() {
            return quote! {};
        }
        quote! {
            let __url = {
                let mut __url = __url;
                #(#serializations)*
                __url
            };
        }
    }

    /// Generates code to send the request.
    fn request(&self) -> TokenStream {
        let http_method = CodegenMethod(self.method);
        let headers = self
            .params
            .iter()
            .filter(|param| param.location == ParameterLocation::Header)
            .map(|param| {
                let name = param.name;
                let ident = &param.ident;
                if param.required {
                    quote! { __builder = __builder.header(#name, #ident); }
                } else {
                    quote! {
                        if let Some(value) = #ident {
                            __builder = __builder.header(#name, value);
                        }
                    }
                }
            });
        let body = self.params.iter().find(|param| param.is_body).map(|param| {
            let ident = &param.ident;
            let send = quote! {
                __builder = __builder
                    .header(::reqwest::header::CONTENT_TYPE, "application/json")
                    .body(::serde_json::to_vec(#ident)?);
            };
            if param.required {
                send
            } else {
                quote! {
                    if let Some(#ident) = #ident {
                        #send
                    }
                }
            }
        });
        quote! {
            #[allow(unused_mut)]
            let mut __builder = self.client.#http_method(__url);
            #(#headers)*
            #body
            let __response = __builder.send().await?.error_for_status()?;
        }
    }
}

/// A method parameter.
#[derive(Debug)]
struct CodegenParam<'a> {
    name: &'a str,
    ident: TokenStream,
    ty: TokenStream,
    location: ParameterLocation,
    required: bool,
    is_array: bool,
    is_body: bool,
}

impl<'a> CodegenParam<'a> {
    /// Collects path, query, and header parameters, then the request body.
    ///
    /// Operation parameters override path item parameters with the same
    /// name and location. Cookie parameters and excluded names are
    /// skipped.
    fn collect(
        context: &'a CodegenContext<'a>,
        segments: &[PathSegment<'a>],
        item: &'a PathItem,
        op: &'a Operation,
    ) -> Result<Vec<Self>, EmitError> {
        let declared = item
            .parameters
            .iter()
            .filter(|shared| {
                !op.parameters
                    .iter()
                    .any(|p| p.name == shared.name && p.location == shared.location)
            })
            .chain(&op.parameters)
            .collect_vec();

        // Path parameters come from the template, so that every
        // placeholder has an argument.
        let mut params = segments
            .iter()
            .flat_map(|segment| segment.params())
            .unique()
            .map(|name| Self {
                name,
                ident: CodegenIdent::Param(name).into_token_stream(),
                ty: quote!(&str),
                location: ParameterLocation::Path,
                required: true,
                is_array: false,
                is_body: false,
            })
            .collect_vec();

        let excluded = &context.settings.excluded_parameter_names;
        for param in declared {
            if excluded.contains(&param.name) {
                continue;
            }
            match param.location {
                ParameterLocation::Query => params.push(Self::query(context, param)?),
                ParameterLocation::Header => params.push(Self::header(param)),
                ParameterLocation::Path | ParameterLocation::Cookie => {}
            }
        }

        if let Some(body) = &op.request_body
            && let Some(schema) = body
                .content
                .iter()
                .find(|(media, _)| is_json(media))
                .and_then(|(_, media)| media.schema.as_ref())
        {
            let ty = context.ref_or_schema(schema)?;
            // The body takes `request_body` if a declared parameter is
            // already named `request`.
            let taken = params
                .iter()
                .any(|param| param.ident.to_string() == "request");
            let ident = if taken {
                quote!(request_body)
            } else {
                quote!(request)
            };
            params.push(Self {
                name: "request",
                ident,
                ty: if body.required {
                    quote!(&#ty)
                } else {
                    quote!(::std::option::Option<&#ty>)
                },
                location: ParameterLocation::Query,
                required: body.required,
                is_array: false,
                is_body: true,
            });
        }

        if context.settings.generate_optional_parameters {
            params.sort_by_key(|param| !param.required);
        }
        Ok(params)
    }

    fn query(context: &CodegenContext<'_>, param: &'a Parameter) -> Result<Self, EmitError> {
        let ty = match &param.schema {
            Some(schema) => context.ref_or_schema(schema)?,
            None => quote!(::std::string::String),
        };
        let is_array = matches!(
            &param.schema,
            Some(RefOrSchema::Schema(schema)) if schema.primary_type() == Some(Ty::Array)
        );
        Ok(Self {
            name: &param.name,
            ident: CodegenIdent::Param(&param.name).into_token_stream(),
            ty: if param.required {
                ty
            } else {
                quote!(::std::option::Option<#ty>)
            },
            location: ParameterLocation::Query,
            required: param.required,
            is_array,
            is_body: false,
        })
    }

    fn header(param: &'a Parameter) -> Self {
        Self {
            name: &param.name,
            ident: CodegenIdent::Param(&param.name).into_token_stream(),
            ty: if param.required {
                quote!(&str)
            } else {
                quote!(::std::option::Option<&str>)
            },
            location: ParameterLocation::Header,
            required: param.required,
            is_array: false,
            is_body: false,
        }
    }
}

fn is_json(media: &str) -> bool {
    let essence = media.split(';').next().unwrap_or(media).trim();
    essence == "application/json" || essence.ends_with("+json")
}

#[derive(Clone, Copy, Debug)]
pub struct CodegenMethod(pub Method);

impl ToTokens for CodegenMethod {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.append(Ident::new(self.0.as_str(), Span::call_site()));
    }
}
