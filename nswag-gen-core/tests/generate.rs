use std::path::{Path, PathBuf};

use nswag_gen_core::{
    CancellationToken, GenerationConfig, Generator, emit::ClassStyle, fallback::patch_output,
    resolve::ResolverOptions,
};
use pretty_assertions::assert_eq;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[tokio::test]
async fn test_full_nswag_document() {
    let config = GenerationConfig::load(fixture("petstore.nswag")).await.unwrap();
    assert_eq!(config.document_source.url, "specs/petstore.yaml");
    assert_eq!(config.client_options.class_name.as_deref(), Some("PetstoreClient"));
    assert_eq!(config.client_options.class_style, Some(ClassStyle::Poco));
    assert_eq!(config.output.as_deref(), Some("PetstoreClient.cs"));
}

#[tokio::test]
async fn test_generates_from_relative_yaml() {
    let generator = Generator::new(&ResolverOptions::default()).unwrap();
    let source = generator
        .generate(&fixture("petstore.nswag"), &CancellationToken::never())
        .await
        .unwrap();
    assert_eq!(source.file_name, "petstore.nswag.rs");

    let text = &source.text;
    assert!(text.starts_with("// <auto-generated>"), "{text}");
    assert!(text.contains("pub mod petstore {"), "{text}");
    assert!(text.contains("pub struct PetstoreClient {"), "{text}");
    assert!(text.contains("client: ::reqwest::Client,"), "{text}");
    assert!(
        text.contains(r#"pub const DEFAULT_BASE_URL: &'static str = "https://petstore.example.com/v1";"#),
        "{text}"
    );
    assert!(text.contains("pub async fn list_pets("), "{text}");
    assert!(text.contains("pub async fn create_pets("), "{text}");
    assert!(text.contains("pub async fn show_pet_by_id("), "{text}");
    assert!(text.contains("pub enum PetstoreException {"), "{text}");
    assert!(text.contains("pub type Pets = ::std::vec::Vec<Pet>;"), "{text}");

    // The output is itself valid Rust.
    syn::parse_file(text).unwrap();
}

#[test]
fn test_patch_changes_only_the_last_output_value() {
    let text = std::fs::read_to_string(fixture("petstore.nswag")).unwrap();
    let patched = patch_output(&text, Path::new("/tmp/nswag/output.rs")).unwrap();

    let old = r#""PetstoreClient.cs""#;
    let new = r#""/tmp/nswag/output.rs""#;
    let at = text.rfind(old).unwrap();
    assert_eq!(&patched[..at], &text[..at]);
    assert_eq!(&patched[at..at + new.len()], new);
    assert_eq!(&patched[at + new.len()..], &text[at + old.len()..]);
    assert!(patched.contains(r#""output": null,"#));
}
