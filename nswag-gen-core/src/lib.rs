//! Generates Rust API clients from NSwag client-generation documents.
//!
//! The pipeline reads a `.nswag` document ([`config`]), resolves the OpenAPI
//! description it points at ([`resolve`]), forwards its client options to the
//! emitter ([`options`]), and renders source text ([`emit`]). [`generate`]
//! drives these in-process; [`fallback`] drives an external NSwag console
//! against a patched copy of the document instead.

pub mod cancel;
pub mod config;
pub mod diagnostic;
pub mod emit;
pub mod error;
pub mod fallback;
pub mod generate;
pub mod options;
pub mod parse;
pub mod resolve;

pub use cancel::{CancellationHandle, CancellationToken};
pub use config::GenerationConfig;
pub use diagnostic::{Diagnostic, Severity};
pub use error::GenerateError;
pub use fallback::FallbackGenerator;
pub use generate::{GeneratedSource, Generator};

#[cfg(test)]
mod tests;
