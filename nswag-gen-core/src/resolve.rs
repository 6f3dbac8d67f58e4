//! Obtains the OpenAPI description a configuration points at.
//!
//! The source is picked from the shape of two strings, in this order:
//!
//! 1. An empty `url` means the description is inline. Inline text that
//!    starts with `{` is JSON; anything else is YAML.
//! 2. A `url` with an `http://` or `https://` scheme is fetched.
//! 3. Any other `url` is a path relative to the configuration's directory.
//!
//! Fetched and read descriptions use the same `{` check to pick a format.

use std::{
    borrow::Cow,
    io,
    path::{Path, PathBuf},
    time::Duration,
};

use tracing::debug;

use crate::{
    cancel::CancellationToken,
    config::DocumentSource,
    error::SerdeError,
    parse::Document,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where a description will be loaded from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DocumentLocation<'a> {
    InlineJson(&'a str),
    InlineYaml(&'a str),
    Remote(&'a str),
    File(PathBuf),
}

impl<'a> DocumentLocation<'a> {
    /// Decides where `source` loads from, resolving relative paths
    /// against `base`.
    pub fn of(source: &'a DocumentSource, base: &Path) -> Self {
        let url = source.url.trim();
        if url.is_empty() {
            match TextFormat::sniff(&source.inline) {
                TextFormat::Json => Self::InlineJson(&source.inline),
                TextFormat::Yaml => Self::InlineYaml(&source.inline),
            }
        } else if has_http_scheme(url) {
            Self::Remote(url)
        } else {
            Self::File(base.join(url))
        }
    }
}

/// The serialization of a description's text.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TextFormat {
    Json,
    Yaml,
}

impl TextFormat {
    pub fn sniff(text: &str) -> Self {
        if text.trim_start().starts_with('{') {
            Self::Json
        } else {
            Self::Yaml
        }
    }

    pub fn parse(self, text: &str) -> Result<Document, SerdeError> {
        match self {
            Self::Json => Document::from_json(text),
            Self::Yaml => Document::from_yaml(text),
        }
    }
}

impl std::fmt::Display for TextFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        })
    }
}

/// Returns `true` if `url` starts with `http://` or `https://`, ignoring
/// case. A bare `http` prefix isn't enough, so relative paths like
/// `httpdocs/api.json` are read as files.
fn has_http_scheme(url: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// Options for fetching remote descriptions.
#[derive(Clone, Debug)]
pub struct ResolverOptions {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

/// Loads and parses descriptions.
#[derive(Clone, Debug)]
pub struct Resolver {
    client: reqwest::Client,
}

impl Resolver {
    pub fn new(options: &ResolverOptions) -> Result<Self, ResolveError> {
        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent.as_str())
            .build()
            .map_err(ResolveError::Client)?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Resolves `source` into a document. `base` is the directory that
    /// relative paths are resolved against.
    ///
    /// Cancelling `cancel` aborts an in-flight fetch or read, and fails with
    /// [`ResolveError::Cancelled`].
    pub async fn resolve(
        &self,
        source: &DocumentSource,
        base: &Path,
        cancel: &CancellationToken,
    ) -> Result<Document, ResolveError> {
        if cancel.is_cancelled() {
            return Err(ResolveError::Cancelled);
        }

        let location = DocumentLocation::of(source, base);
        debug!(?location, "resolving OpenAPI description");

        let (origin, text) = match location {
            DocumentLocation::InlineJson(text) => {
                return parse(TextFormat::Json, "inline description".into(), text);
            }
            DocumentLocation::InlineYaml(text) => {
                return parse(TextFormat::Yaml, "inline description".into(), text);
            }
            DocumentLocation::Remote(url) => {
                let text = tokio::select! {
                    biased;
                    () = cancel.cancelled() => return Err(ResolveError::Cancelled),
                    result = self.fetch(url) => result?,
                };
                (Cow::Borrowed(url), text)
            }
            DocumentLocation::File(path) => {
                let text = tokio::select! {
                    biased;
                    () = cancel.cancelled() => return Err(ResolveError::Cancelled),
                    result = tokio::fs::read_to_string(&path) => {
                        result.map_err(|source| ResolveError::Read { path: path.clone(), source })?
                    }
                };
                (Cow::Owned(path.display().to_string()), text)
            }
        };

        parse(TextFormat::sniff(&text), origin, &text)
    }

    async fn fetch(&self, url: &str) -> Result<String, ResolveError> {
        let fetch_error = |source| ResolveError::Fetch {
            url: url.to_owned(),
            source,
        };
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(fetch_error)?;
        response.text().await.map_err(fetch_error)
    }
}

fn parse(format: TextFormat, origin: Cow<'_, str>, text: &str) -> Result<Document, ResolveError> {
    if text.trim().is_empty() {
        return Err(ResolveError::Empty {
            origin: origin.into_owned(),
        });
    }
    format.parse(text).map_err(|source| ResolveError::Parse {
        origin: origin.into_owned(),
        format,
        source,
    })
}

#[derive(Debug, miette::Diagnostic, thiserror::Error)]
pub enum ResolveError {
    #[error("failed to build HTTP client")]
    #[diagnostic(code(nswag::resolve::client))]
    Client(#[source] reqwest::Error),
    #[error("failed to fetch `{url}`")]
    #[diagnostic(code(nswag::resolve::fetch))]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to read `{}`", path.display())]
    #[diagnostic(code(nswag::resolve::read))]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{origin} is empty")]
    #[diagnostic(code(nswag::resolve::empty))]
    Empty { origin: String },
    #[error("failed to parse {origin} as {format}")]
    #[diagnostic(code(nswag::resolve::parse))]
    Parse {
        origin: String,
        format: TextFormat,
        #[source]
        source: SerdeError,
    },
    #[error("resolution was cancelled")]
    #[diagnostic(code(nswag::resolve::cancelled))]
    Cancelled,
}
