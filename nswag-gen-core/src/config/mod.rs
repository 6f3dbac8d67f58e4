//! The subset of an NSwag document that drives client generation.

use std::{io, path::PathBuf, str::FromStr};

use serde::Deserialize;

use crate::error::SerdeError;

mod client;

pub use client::ClientOptions;

/// A parsed `.nswag` document.
///
/// Parsing is strict: a document without `documentGenerator.fromDocument`
/// or `codeGenerators.openApiToCSharpClient` is an error, not an empty
/// configuration.
#[derive(Clone, Debug)]
pub struct GenerationConfig {
    pub document_source: DocumentSource,
    pub client_options: ClientOptions,
    /// The code generator's `output` path, if any.
    pub output: Option<String>,
}

impl GenerationConfig {
    /// Reads and parses the document at `path`.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ConfigError::Read { path, source })?;
        text.parse()
    }
}

impl FromStr for GenerationConfig {
    type Err = ConfigError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let deserializer = &mut serde_json::Deserializer::from_str(text);
        let raw: RawDocument =
            serde_path_to_error::deserialize(deserializer).map_err(SerdeError::from)?;
        let RawCodeGenerator { options, output } = raw.code_generators.client;
        Ok(Self {
            document_source: DocumentSource {
                url: raw.document_generator.from_document.url.unwrap_or_default(),
                inline: raw.document_generator.from_document.json.unwrap_or_default(),
            },
            client_options: options,
            output,
        })
    }
}

/// Where the OpenAPI description comes from.
///
/// Both fields are always present; which one wins is decided when the
/// description is resolved.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DocumentSource {
    /// An `http(s)` URL, or a path relative to the document's directory.
    pub url: String,
    /// The description itself, as JSON or YAML.
    pub inline: String,
}

#[derive(Debug, miette::Diagnostic, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read `{}`", path.display())]
    #[diagnostic(code(nswag::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed NSwag document")]
    #[diagnostic(code(nswag::config::parse))]
    Parse(#[from] SerdeError),
    #[error("NSwag document has no `\"output\"` field")]
    #[diagnostic(
        code(nswag::config::no_output),
        help("add `\"output\": null` to the `openApiToCSharpClient` section")
    )]
    MissingOutputField,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    document_generator: RawDocumentGenerator,
    code_generators: RawCodeGenerators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocumentGenerator {
    from_document: RawFromDocument,
}

#[derive(Debug, Deserialize)]
struct RawFromDocument {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    json: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCodeGenerators {
    #[serde(rename = "openApiToCSharpClient")]
    client: RawCodeGenerator,
}

#[derive(Debug, Deserialize)]
struct RawCodeGenerator {
    #[serde(flatten)]
    options: ClientOptions,
    #[serde(default)]
    output: Option<String>,
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    use crate::{emit::ClassStyle, tests::assert_matches};

    #[test]
    fn test_parse_minimal_document() {
        let config: GenerationConfig = indoc! {r#"
            {
              "runtime": "Net60",
              "documentGenerator": {
                "fromDocument": {
                  "json": "openapi: 3.0.0",
                  "url": "https://example.com/openapi.json",
                  "output": null
                }
              },
              "codeGenerators": {
                "openApiToCSharpClient": {
                  "className": "PetstoreClient",
                  "namespace": "Petstore",
                  "generateClientInterfaces": true,
                  "excludedTypeNames": ["Internal"],
                  "classStyle": "Poco",
                  "output": "Client.cs"
                }
              }
            }
        "#}
        .parse()
        .unwrap();

        assert_eq!(config.document_source.url, "https://example.com/openapi.json");
        assert_eq!(config.document_source.inline, "openapi: 3.0.0");
        assert_eq!(
            config.client_options.class_name.as_deref(),
            Some("PetstoreClient")
        );
        assert_eq!(config.client_options.namespace.as_deref(), Some("Petstore"));
        assert_eq!(config.client_options.generate_client_interfaces, Some(true));
        assert_eq!(config.client_options.generate_dto_types, None);
        assert_eq!(
            config.client_options.excluded_type_names.as_deref(),
            Some(&["Internal".to_owned()][..])
        );
        assert_eq!(config.client_options.class_style, Some(ClassStyle::Poco));
        assert_eq!(config.output.as_deref(), Some("Client.cs"));
    }

    #[test]
    fn test_null_sources_are_empty() {
        let config: GenerationConfig = indoc! {r#"
            {
              "documentGenerator": { "fromDocument": { "url": null, "json": null } },
              "codeGenerators": { "openApiToCSharpClient": {} }
            }
        "#}
        .parse()
        .unwrap();

        assert_eq!(config.document_source, DocumentSource::default());
        assert_eq!(config.output, None);
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let text = "\u{feff}{\"documentGenerator\":{\"fromDocument\":{}},\"codeGenerators\":{\"openApiToCSharpClient\":{}}}";
        assert!(text.parse::<GenerationConfig>().is_ok());
    }

    #[test]
    fn test_missing_document_source_fails() {
        let result = indoc! {r#"
            {
              "documentGenerator": { "aspNetCoreToOpenApi": {} },
              "codeGenerators": { "openApiToCSharpClient": {} }
            }
        "#}
        .parse::<GenerationConfig>();

        assert_matches!(result, Err(ConfigError::Parse(_)));
        let message = format!("{}", std::error::Error::source(&result.unwrap_err()).unwrap());
        assert!(message.contains("documentGenerator"), "{message}");
    }

    #[test]
    fn test_missing_client_options_fails() {
        let result = r#"{ "documentGenerator": { "fromDocument": {} }, "codeGenerators": {} }"#
            .parse::<GenerationConfig>();
        assert_matches!(result, Err(ConfigError::Parse(_)));
    }

    #[test]
    fn test_malformed_json_fails() {
        let result = r#"{ "documentGenerator": "#.parse::<GenerationConfig>();
        assert_matches!(result, Err(ConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_class_style_fails() {
        let result = indoc! {r#"
            {
              "documentGenerator": { "fromDocument": {} },
              "codeGenerators": { "openApiToCSharpClient": { "classStyle": "Bogus" } }
            }
        "#}
        .parse::<GenerationConfig>();
        assert_matches!(result, Err(ConfigError::Parse(_)));
    }
}
