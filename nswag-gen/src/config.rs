use std::{
    ffi::OsString,
    io::ErrorKind as IoErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use clap::{
    CommandFactory, FromArgMatches,
    error::{ErrorKind as ClapErrorKind, Result as ClapResult},
};
use nswag_gen_core::resolve::ResolverOptions;
use serde::Deserialize;

/// The optional configuration file, read from the working directory.
pub const CONFIG_FILE_NAME: &str = "nswag-gen.toml";

const DEFAULT_EXTENSION: &str = "nswag";

#[derive(Debug)]
pub struct Main {
    pub verbose: bool,
    pub command: Command,
}

impl Main {
    pub fn parse() -> ClapResult<Main> {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::parse_from(std::env::args_os(), &cwd)
    }

    /// Parses `args`, filling unset options from the configuration file
    /// in `dir`.
    pub fn parse_from<I, T>(args: I, dir: &Path) -> ClapResult<Main>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut cmd = MainArgs::command();
        let mut matches = cmd
            .try_get_matches_from_mut(args)
            .map_err(|err| err.format(&mut cmd))?;
        let args =
            MainArgs::from_arg_matches_mut(&mut matches).map_err(|err| err.format(&mut cmd))?;

        let file: ConfigFile = {
            let path = dir.join(CONFIG_FILE_NAME);
            match std::fs::read_to_string(&path) {
                Ok(contents) => toml::from_str(&contents).map_err(|err| {
                    cmd.error(
                        ClapErrorKind::ValueValidation,
                        format!("Failed to parse `{}`: {err}", path.display()),
                    )
                })?,
                Err(err) if err.kind() == IoErrorKind::NotFound => ConfigFile::default(),
                Err(err) => {
                    return Err(cmd.error(
                        ClapErrorKind::Io,
                        format!("Failed to read `{}`: {err}", path.display()),
                    ));
                }
            }
        };

        let command = match args.command {
            CommandArgs::Generate(args) => Command::Generate(file.merge_generate(args)),
            CommandArgs::RunTool(args) => {
                let tool = args.tool.or(file.tool).ok_or_else(|| {
                    cmd.error(
                        ClapErrorKind::MissingRequiredArgument,
                        format!(
                            "the NSwag tool wasn't given; pass `--tool` or set `tool` in `{CONFIG_FILE_NAME}`"
                        ),
                    )
                })?;
                Command::RunTool(RunTool {
                    tool,
                    config: args.config,
                    output: args.output,
                })
            }
        };

        Ok(Main {
            verbose: args.verbose,
            command,
        })
    }
}

#[derive(Debug)]
pub enum Command {
    Generate(Generate),
    RunTool(RunTool),
}

#[derive(Debug)]
pub struct Generate {
    pub paths: Vec<PathBuf>,
    pub out_dir: Option<PathBuf>,
    /// The extension that marks configuration files in directories.
    pub extension: String,
    pub resolver: ResolverOptions,
}

#[derive(Debug)]
pub struct RunTool {
    pub tool: PathBuf,
    pub config: PathBuf,
    pub output: Option<PathBuf>,
}

#[derive(Debug, clap::Parser)]
#[command(version, about, long_about = None)]
struct MainArgs {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: CommandArgs,
}

#[derive(Debug, clap::Subcommand)]
enum CommandArgs {
    /// Generate a client for each NSwag document.
    Generate(GenerateArgs),
    /// Run the NSwag console tool against a single document.
    RunTool(RunToolArgs),
}

#[derive(Debug, clap::Args)]
struct GenerateArgs {
    /// NSwag documents, or directories to search for them.
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// The directory for generated files. Defaults to each document's
    /// directory.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// The extension of NSwag documents in directories. Defaults to `nswag`.
    #[arg(long)]
    extension: Option<String>,

    /// The timeout for fetching remote descriptions, in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// The `User-Agent` for fetching remote descriptions.
    #[arg(long)]
    user_agent: Option<String>,
}

#[derive(Debug, clap::Args)]
struct RunToolArgs {
    /// The NSwag console executable.
    #[arg(long)]
    tool: Option<PathBuf>,

    /// The NSwag document.
    config: PathBuf,

    /// Write the generated code here instead of to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
struct ConfigFile {
    out_dir: Option<PathBuf>,
    extension: Option<String>,
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
    tool: Option<PathBuf>,
}

impl ConfigFile {
    fn merge_generate(&self, args: GenerateArgs) -> Generate {
        let defaults = ResolverOptions::default();
        Generate {
            paths: args.paths,
            out_dir: args.out_dir.or_else(|| self.out_dir.clone()),
            extension: args
                .extension
                .or_else(|| self.extension.clone())
                .unwrap_or_else(|| DEFAULT_EXTENSION.to_owned()),
            resolver: ResolverOptions {
                timeout: args
                    .timeout_secs
                    .or(self.timeout_secs)
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.timeout),
                user_agent: args
                    .user_agent
                    .or_else(|| self.user_agent.clone())
                    .unwrap_or(defaults.user_agent),
            },
        }
    }
}
