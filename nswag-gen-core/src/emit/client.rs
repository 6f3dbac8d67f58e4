use proc_macro2::TokenStream;
use quote::quote;

use super::{
    ClientGeneratorSettings, EmitError,
    context::{CodegenContext, setting},
    naming::{CodegenIdent, CodegenVis},
    operation::CodegenOperation,
};

/// Generates the client struct, its optional trait, and its error type.
pub struct CodegenClient<'a> {
    context: &'a CodegenContext<'a>,
}

impl<'a> CodegenClient<'a> {
    pub fn new(context: &'a CodegenContext<'a>) -> Self {
        Self { context }
    }

    /// Returns the client's type name, with the `{controller}`
    /// placeholder removed.
    pub fn class_name(&self) -> String {
        let name = self.context.settings.class_name.replace("{controller}", "");
        match name.trim() {
            "" => "Client".to_owned(),
            name => name.to_owned(),
        }
    }

    pub fn to_tokens(&self) -> Result<TokenStream, EmitError> {
        let settings = self.context.settings;
        let class_name = self.class_name();
        let name = CodegenIdent::Type(&class_name);
        let vis = self.context.client_vis();
        let error = self.context.error_type();
        let http_client = setting::<syn::Type>(
            &settings.http_client_type,
            &ClientGeneratorSettings::default().http_client_type,
        );

        let ops = self
            .context
            .doc
            .paths
            .iter()
            .flat_map(|(path, item)| {
                item.operations()
                    .map(move |(method, op)| (path.as_str(), item, method, op))
            })
            .map(|(path, item, method, op)| {
                CodegenOperation::new(self.context, path, item, method, op)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let client_doc = {
            let info = &self.context.doc.info;
            format!(" API client for {} (version {})", info.title, info.version)
        };

        let default_base_url = self.context.doc.servers.first().map(|server| {
            let url = &server.url;
            quote! {
                /// The first server URL listed in the description.
                #vis const DEFAULT_BASE_URL: &'static str = #url;
            }
        });

        let with_http_client_vis = if settings.inject_http_client {
            vis
        } else {
            CodegenVis::Private
        };

        let base_url_property = settings.generate_base_url_property.then(|| {
            quote! {
                #vis fn base_url(&self) -> &::url::Url {
                    &self.base_url
                }

                #vis fn set_base_url(&mut self, base_url: ::url::Url) {
                    self.base_url = base_url;
                }
            }
        });

        let (methods, api) = if settings.generate_client_interfaces {
            let trait_name = format!("{class_name}Api");
            let trait_ident = CodegenIdent::Type(&trait_name);
            let supertrait = settings
                .client_base_interface
                .as_deref()
                .and_then(|base| syn::parse_str::<syn::Path>(base).ok())
                .map(|base| quote!(: #base));
            let decls = ops
                .iter()
                .map(|op| {
                    let attrs = op.attrs();
                    let signature = op.signature()?;
                    Ok(quote! {
                        #attrs
                        #signature;
                    })
                })
                .collect::<Result<Vec<_>, EmitError>>()?;
            let impls = ops
                .iter()
                .map(|op| {
                    let signature = op.signature()?;
                    let body = op.body()?;
                    Ok(quote! {
                        #[allow(deprecated)]
                        #signature {
                            #body
                        }
                    })
                })
                .collect::<Result<Vec<_>, EmitError>>()?;
            let api = quote! {
                #[allow(async_fn_in_trait)]
                #vis trait #trait_ident #supertrait {
                    #(#decls)*
                }

                impl #trait_ident for #name {
                    #(#impls)*
                }
            };
            (vec![], api)
        } else {
            let methods = ops
                .iter()
                .map(|op| {
                    let attrs = op.attrs();
                    let signature = op.signature()?;
                    let body = op.body()?;
                    Ok(quote! {
                        #attrs
                        #vis #signature {
                            #body
                        }
                    })
                })
                .collect::<Result<Vec<_>, EmitError>>()?;
            (methods, quote!())
        };

        let error_type = settings
            .generate_exception_classes
            .then(|| self.error_type());

        Ok(quote! {
            #[doc = #client_doc]
            #[derive(Clone, Debug)]
            #vis struct #name {
                client: #http_client,
                base_url: ::url::Url,
            }

            impl #name {
                #default_base_url

                /// Creates a new client.
                #vis fn new(base_url: impl AsRef<str>) -> ::std::result::Result<Self, #error> {
                    Ok(Self::with_http_client(
                        <#http_client>::default(),
                        base_url.as_ref().parse()?,
                    ))
                }

                #with_http_client_vis fn with_http_client(client: #http_client, base_url: ::url::Url) -> Self {
                    Self { client, base_url }
                }

                #base_url_property

                #(#methods)*
            }

            #api

            #error_type
        })
    }

    /// Generates the error type that client methods return.
    fn error_type(&self) -> TokenStream {
        let error = self.context.error_type();
        let vis = self.context.client_vis();
        quote! {
            /// An error returned by the API client.
            #[derive(Debug)]
            #vis enum #error {
                /// The request failed, or the server returned an error status.
                Request(::reqwest::Error),
                /// The base URL couldn't be parsed.
                Url(::url::ParseError),
                /// The base URL can't have path segments.
                UrlCannotBeABase,
                /// The request or response body isn't valid JSON for its type.
                Json(::serde_json::Error),
            }

            impl ::std::fmt::Display for #error {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    match self {
                        Self::Request(err) => write!(f, "request failed: {err}"),
                        Self::Url(err) => write!(f, "invalid base URL: {err}"),
                        Self::UrlCannotBeABase => f.write_str("base URL can't have path segments"),
                        Self::Json(err) => write!(f, "invalid JSON: {err}"),
                    }
                }
            }

            impl ::std::error::Error for #error {
                fn source(&self) -> ::std::option::Option<&(dyn ::std::error::Error + 'static)> {
                    match self {
                        Self::Request(err) => Some(err),
                        Self::Url(err) => Some(err),
                        Self::UrlCannotBeABase => None,
                        Self::Json(err) => Some(err),
                    }
                }
            }

            impl ::std::convert::From<::reqwest::Error> for #error {
                fn from(err: ::reqwest::Error) -> Self {
                    Self::Request(err)
                }
            }

            impl ::std::convert::From<::url::ParseError> for #error {
                fn from(err: ::url::ParseError) -> Self {
                    Self::Url(err)
                }
            }

            impl ::std::convert::From<::serde_json::Error> for #error {
                fn from(err: ::serde_json::Error) -> Self {
                    Self::Json(err)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{
        emit::{ClientGenerator, TypeSettings},
        parse::Document,
        tests::PETSTORE_JSON,
    };

    fn generate(settings: ClientGeneratorSettings) -> String {
        let doc = Document::from_json(PETSTORE_JSON).unwrap();
        ClientGenerator::new(&doc, settings).generate_file().unwrap()
    }

    #[test]
    fn test_class_name_placeholder() {
        let doc = Document::from_json(PETSTORE_JSON).unwrap();
        let mut settings = ClientGeneratorSettings::default();
        let context = CodegenContext::new(&doc, &settings);
        assert_eq!(CodegenClient::new(&context).class_name(), "Client");

        settings.class_name = "Petstore{controller}Client".to_owned();
        let context = CodegenContext::new(&doc, &settings);
        assert_eq!(CodegenClient::new(&context).class_name(), "PetstoreClient");
    }

    #[test]
    fn test_client_surface() {
        let code = generate(ClientGeneratorSettings {
            class_name: "PetstoreClient".to_owned(),
            exception_class: "PetstoreError".to_owned(),
            ..Default::default()
        });
        assert!(code.contains("/// API client for Petstore (version 1.0.0)"), "{code}");
        assert!(code.contains("pub struct PetstoreClient {"), "{code}");
        assert!(code.contains("client: ::reqwest::Client,"), "{code}");
        assert!(code.contains("pub fn with_http_client("), "{code}");
        assert!(code.contains("pub fn set_base_url(&mut self"), "{code}");
        assert!(code.contains("pub enum PetstoreError {"), "{code}");
        assert!(code.contains("UrlCannotBeABase"), "{code}");
        assert!(!code.contains("DEFAULT_BASE_URL"), "{code}");
    }

    #[test]
    fn test_internal_client_without_extras() {
        let code = generate(ClientGeneratorSettings {
            client_class_access_modifier: "internal".to_owned(),
            inject_http_client: false,
            generate_base_url_property: false,
            generate_exception_classes: false,
            ..Default::default()
        });
        assert!(code.contains("pub(crate) struct Client {"), "{code}");
        assert!(code.contains("    fn with_http_client("), "{code}");
        assert!(!code.contains("pub(crate) fn with_http_client("), "{code}");
        assert!(!code.contains("fn set_base_url"), "{code}");
        assert!(!code.contains("enum ApiException"), "{code}");
    }

    #[test]
    fn test_client_interface() {
        let code = generate(ClientGeneratorSettings {
            generate_client_interfaces: true,
            client_base_interface: Some("::std::marker::Sync".to_owned()),
            types: TypeSettings {
                namespace: String::new(),
                ..Default::default()
            },
            ..Default::default()
        });
        assert!(code.contains("pub trait ClientApi: ::std::marker::Sync {"), "{code}");
        assert!(code.contains("impl ClientApi for Client {"), "{code}");
        assert!(code.contains("async fn list_pets("), "{code}");
        assert!(!code.contains("pub async fn list_pets("), "{code}");
    }

    #[test]
    fn test_custom_http_client_type() {
        let code = generate(ClientGeneratorSettings {
            http_client_type: "crate::http::Client".to_owned(),
            ..Default::default()
        });
        assert!(code.contains("client: crate::http::Client,"), "{code}");

        let code = generate(ClientGeneratorSettings {
            http_client_type: "System.Net.Http.HttpClient".to_owned(),
            ..Default::default()
        });
        assert!(code.contains("client: ::reqwest::Client,"), "{code}");
    }
}
