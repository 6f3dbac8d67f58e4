//! OpenAPI description parsing.

pub mod path;
mod types;

pub use types::*;
