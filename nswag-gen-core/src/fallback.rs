//! Generates source by running an external NSwag tool against a patched
//! copy of the configuration.

use std::{
    ffi::OsStr,
    io,
    path::{Path, PathBuf},
    process::{Command, Stdio},
    sync::LazyLock,
};

use regex::Regex;
use tracing::{debug, warn};

use crate::{config::ConfigError, error::GenerateError};

/// Matches an `"output"` field whose value is `null` or a string, and
/// captures the value.
static OUTPUT_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""output"\s*:\s*(null|"(?:[^"\\]|\\.)*")"#).expect("invalid output field regex")
});

/// Runs an external generation tool as `<tool> run <config>`.
///
/// Each call owns a private temporary directory holding the working copy
/// of the configuration and the output file. The directory is removed
/// when the call returns, whatever the outcome.
///
/// [`generate`](Self::generate) blocks until the tool exits. Async callers
/// should run it on a blocking worker.
#[derive(Clone, Debug)]
pub struct FallbackGenerator {
    tool: PathBuf,
    temp_root: Option<PathBuf>,
}

impl FallbackGenerator {
    pub fn new(tool: impl Into<PathBuf>) -> Self {
        Self {
            tool: tool.into(),
            temp_root: None,
        }
    }

    /// Creates temporary directories under `dir` instead of the system
    /// temporary directory.
    pub fn temp_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(dir.into());
        self
    }

    /// Generates source for the configuration at `config_path`.
    pub fn generate(&self, config_path: &Path) -> Result<String, GenerateError> {
        check_executable(&self.tool)?;

        let contents = std::fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.to_owned(),
            source,
        })?;

        let dir = self.temp_dir().map_err(InvocationError::TempFiles)?;
        let working_config = dir.path().join("config.nswag");
        let output = dir.path().join("output.rs");

        let patched = patch_output(&contents, &output)?;
        std::fs::write(&working_config, patched).map_err(InvocationError::TempFiles)?;

        let mut command = Command::new(&self.tool);
        command
            .arg("run")
            .arg(&working_config)
            .stdin(Stdio::null())
            .stdout(Stdio::piped());
        hide_window(&mut command);

        debug!(tool = %self.tool.display(), config = %working_config.display(), "running tool");
        let result = command
            .spawn()
            .and_then(|child| child.wait_with_output())
            .map_err(|source| InvocationError::Launch {
                tool: self.tool.clone(),
                source,
            })?;
        let stdout = String::from_utf8_lossy(&result.stdout).into_owned();

        match std::fs::read_to_string(&output) {
            Ok(text) => {
                if !result.status.success() {
                    warn!(tool = %self.tool.display(), status = %result.status, "tool failed, but wrote output");
                }
                Ok(text)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(InvocationError::NoOutput { stdout }.into())
            }
            Err(source) => Err(InvocationError::ReadOutput {
                path: output.clone(),
                source,
            }
            .into()),
        }
    }

    fn temp_dir(&self) -> io::Result<tempfile::TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("nswag-");
        match &self.temp_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
    }
}

/// Points the last `"output"` field in `text` at `output`.
///
/// Only the value of that field changes; every other byte, including
/// earlier `"output"` fields, is kept. A `null` value is replaced like
/// a string. The path is written with forward slashes.
pub fn patch_output(text: &str, output: &Path) -> Result<String, ConfigError> {
    let value = OUTPUT_FIELD
        .captures_iter(text)
        .last()
        .and_then(|captures| captures.get(1))
        .ok_or(ConfigError::MissingOutputField)?;
    let path = output.to_string_lossy().replace('\\', "/");
    let literal = serde_json::Value::String(path).to_string();

    let mut patched = String::with_capacity(text.len() + literal.len());
    patched.push_str(&text[..value.start()]);
    patched.push_str(&literal);
    patched.push_str(&text[value.end()..]);
    Ok(patched)
}

/// Checks that `tool` has this platform's executable extension: `.exe`
/// on Windows, none elsewhere.
fn check_executable(tool: &Path) -> Result<(), InvocationError> {
    let expected = std::env::consts::EXE_EXTENSION;
    let matches = match tool.extension().and_then(OsStr::to_str) {
        Some(extension) => extension.eq_ignore_ascii_case(expected),
        None => expected.is_empty(),
    };
    if tool.file_name().is_some() && matches {
        Ok(())
    } else {
        Err(InvocationError::NotExecutable {
            path: tool.to_owned(),
        })
    }
}

#[cfg(windows)]
fn hide_window(command: &mut Command) {
    use std::os::windows::process::CommandExt;
    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    command.creation_flags(CREATE_NO_WINDOW);
}

#[cfg(not(windows))]
fn hide_window(_: &mut Command) {}

#[derive(Debug, miette::Diagnostic, thiserror::Error)]
pub enum InvocationError {
    #[error("`{}` isn't an executable", path.display())]
    #[diagnostic(
        code(nswag::fallback::not_executable),
        help("pass the path to the NSwag console executable")
    )]
    NotExecutable { path: PathBuf },
    #[error("failed to create temporary files")]
    #[diagnostic(code(nswag::fallback::temp_files))]
    TempFiles(#[source] io::Error),
    #[error("failed to run `{}`", tool.display())]
    #[diagnostic(code(nswag::fallback::launch))]
    Launch {
        tool: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("NSwag wrote no output. Its console output was:\n{stdout}")]
    #[diagnostic(code(nswag::fallback::no_output))]
    NoOutput { stdout: String },
    #[error("failed to read generated output from `{}`", path.display())]
    #[diagnostic(code(nswag::fallback::read_output))]
    ReadOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
