//! Turns one configuration file into generated source, in process.

use std::path::Path;

use tracing::{debug, info};

use crate::{
    cancel::CancellationToken,
    config::GenerationConfig,
    diagnostic::Diagnostic,
    emit::ClientGenerator,
    error::GenerateError,
    options::map_options,
    resolve::{Resolver, ResolverOptions},
};

/// Generated source text, and the file name it belongs in.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GeneratedSource {
    /// `<configFileName>.rs`.
    pub file_name: String,
    pub text: String,
}

/// Runs the load, resolve, map, and emit pipeline.
///
/// A generator holds no per-request state, so one instance can serve
/// many concurrent requests.
#[derive(Clone, Debug)]
pub struct Generator {
    resolver: Resolver,
}

impl Generator {
    pub fn new(options: &ResolverOptions) -> Result<Self, GenerateError> {
        Ok(Self::with_resolver(Resolver::new(options)?))
    }

    pub fn with_resolver(resolver: Resolver) -> Self {
        Self { resolver }
    }

    /// Generates source for the configuration at `config_path`. Relative
    /// description paths resolve against the configuration's directory.
    pub async fn generate(
        &self,
        config_path: &Path,
        cancel: &CancellationToken,
    ) -> Result<GeneratedSource, GenerateError> {
        debug!(config = %config_path.display(), "loading configuration");
        let config = GenerationConfig::load(config_path).await?;
        let base = config_path.parent().unwrap_or(Path::new(""));
        let file_name = generated_file_name(config_path);
        self.generate_config(&config, base, file_name, cancel).await
    }

    /// Generates source from configuration text that's already in memory.
    pub async fn generate_str(
        &self,
        contents: &str,
        base: &Path,
        file_name: impl Into<String>,
        cancel: &CancellationToken,
    ) -> Result<GeneratedSource, GenerateError> {
        let config: GenerationConfig = contents.parse()?;
        self.generate_config(&config, base, file_name.into(), cancel)
            .await
    }

    /// Like [`generate`](Self::generate), but reports failures as a
    /// [`Diagnostic`] for the file.
    pub async fn generate_or_diagnose(
        &self,
        config_path: &Path,
        cancel: &CancellationToken,
    ) -> Result<GeneratedSource, Diagnostic> {
        self.generate(config_path, cancel)
            .await
            .map_err(|err| Diagnostic::from_error(&err))
    }

    async fn generate_config(
        &self,
        config: &GenerationConfig,
        base: &Path,
        file_name: String,
        cancel: &CancellationToken,
    ) -> Result<GeneratedSource, GenerateError> {
        let doc = self
            .resolver
            .resolve(&config.document_source, base, cancel)
            .await?;
        let settings = map_options(&config.client_options);
        let text = ClientGenerator::new(&doc, settings).generate_file()?;
        info!(file = %file_name, title = %doc.info.title, "generated client");
        Ok(GeneratedSource { file_name, text })
    }
}

/// Returns `<configFileName>.rs` for a configuration path.
pub fn generated_file_name(config_path: &Path) -> String {
    let name = config_path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_else(|| "nswag".into());
    format!("{name}.rs")
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::{
        config::ConfigError,
        resolve::ResolveError,
        tests::{PETSTORE_JSON, assert_matches},
    };

    fn generator() -> Generator {
        Generator::new(&ResolverOptions::default()).unwrap()
    }

    fn config(url: &str, inline: &str, class_name: &str) -> String {
        serde_json::to_string_pretty(&json!({
            "runtime": "Net80",
            "documentGenerator": {
                "fromDocument": { "url": url, "json": inline, "output": null }
            },
            "codeGenerators": {
                "openApiToCSharpClient": {
                    "className": class_name,
                    "namespace": "Petstore.Api",
                    "output": "Client.cs"
                }
            }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_inline_json_uses_class_name() {
        let source = generator()
            .generate_str(
                &config("", PETSTORE_JSON, "PetstoreClient"),
                Path::new("."),
                "petstore.nswag.rs",
                &CancellationToken::never(),
            )
            .await
            .unwrap();
        assert_eq!(source.file_name, "petstore.nswag.rs");
        assert!(source.text.contains("pub struct PetstoreClient {"), "{}", source.text);
        assert!(source.text.contains("pub mod petstore {"), "{}", source.text);
        assert!(source.text.contains("pub mod api {"), "{}", source.text);
    }

    #[tokio::test]
    async fn test_generate_from_disk_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("petstore.json"), PETSTORE_JSON)
            .await
            .unwrap();
        let config_path = dir.path().join("petstore.nswag");
        tokio::fs::write(&config_path, config("petstore.json", "", "{controller}Client"))
            .await
            .unwrap();

        let generator = generator();
        let cancel = CancellationToken::never();
        let first = generator.generate(&config_path, &cancel).await.unwrap();
        let second = generator.generate(&config_path, &cancel).await.unwrap();
        assert_eq!(first.file_name, "petstore.nswag.rs");
        assert!(first.text.contains("pub struct Client {"), "{}", first.text);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = generator()
            .generate(&dir.path().join("missing.nswag"), &CancellationToken::never())
            .await;
        assert_matches!(result, Err(GenerateError::Config(ConfigError::Read { .. })));
    }

    #[tokio::test]
    async fn test_invalid_inline_yaml() {
        let result = generator()
            .generate_str(
                &config("", "openapi: [", "Client"),
                Path::new("."),
                "bad.nswag.rs",
                &CancellationToken::never(),
            )
            .await;
        assert_matches!(
            result,
            Err(GenerateError::Resolve(ResolveError::Parse { .. }))
        );
    }

    #[tokio::test]
    async fn test_cancelled_before_resolution() {
        let result = generator()
            .generate_str(
                &config("https://example.com/openapi.json", "", "Client"),
                Path::new("."),
                "remote.nswag.rs",
                &CancellationToken::already_cancelled(),
            )
            .await;
        let err = result.unwrap_err();
        assert!(err.is_cancelled(), "{err:?}");
    }

    #[tokio::test]
    async fn test_failure_becomes_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("broken.nswag");
        tokio::fs::write(&config_path, "{ not json").await.unwrap();
        let diagnostic = generator()
            .generate_or_diagnose(&config_path, &CancellationToken::never())
            .await
            .unwrap_err();
        assert_eq!(diagnostic.id, "NSG0001");
        assert!(diagnostic.message.contains("malformed NSwag document"), "{}", diagnostic.message);
    }

    #[test]
    fn test_generated_file_name() {
        assert_eq!(
            generated_file_name(Path::new("/repo/api/petstore.nswag")),
            "petstore.nswag.rs"
        );
    }
}
