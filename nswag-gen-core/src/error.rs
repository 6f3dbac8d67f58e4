use crate::{config::ConfigError, emit::EmitError, fallback::InvocationError, resolve::ResolveError};

#[derive(Debug, thiserror::Error)]
pub enum SerdeError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    JsonWithPath(#[from] serde_path_to_error::Error<serde_json::Error>),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    YamlWithPath(#[from] serde_path_to_error::Error<serde_yaml::Error>),
}

/// Any failure while turning one configuration file into source text.
#[derive(Debug, miette::Diagnostic, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Invocation(#[from] InvocationError),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Emit(#[from] EmitError),
}

impl GenerateError {
    /// Returns `true` if generation stopped because it was cancelled,
    /// rather than because something failed.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Resolve(ResolveError::Cancelled))
    }
}
