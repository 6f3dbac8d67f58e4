use std::path::{Path, PathBuf};

use itertools::Itertools;
use miette::{Context, IntoDiagnostic, Result};
use nswag_gen_core::{
    CancellationToken, Diagnostic, FallbackGenerator, GeneratedSource, Generator,
};
use tokio::task::JoinSet;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use walkdir::WalkDir;

mod config;

use self::config::{Command, Generate, Main, RunTool};

#[tokio::main]
async fn main() -> Result<()> {
    let Ok(main) = Main::parse().map_err(|err| err.exit());
    init_tracing(main.verbose);

    match main.command {
        Command::Generate(command) => generate(command).await,
        Command::RunTool(command) => run_tool(command).await,
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

async fn generate(command: Generate) -> Result<()> {
    let files = discover(&command.paths, &command.extension)?;
    if files.is_empty() {
        warn!("no NSwag documents found");
        return Ok(());
    }

    let generator = Generator::new(&command.resolver)?;
    let (cancel, handle) = CancellationToken::new();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("cancelling");
            handle.cancel();
        }
    });

    let mut tasks = JoinSet::new();
    for path in files {
        let generator = generator.clone();
        let cancel = cancel.clone();
        tasks.spawn(async move {
            let result = generator.generate_or_diagnose(&path, &cancel).await;
            (path, result)
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        results.push(joined.into_diagnostic()?);
    }

    let failed = write_outputs(results, command.out_dir.as_deref()).await;
    if failed > 0 {
        miette::bail!("{failed} NSwag document(s) failed to generate");
    }
    Ok(())
}

async fn run_tool(command: RunTool) -> Result<()> {
    let RunTool {
        tool,
        config,
        output,
    } = command;
    let text = tokio::task::spawn_blocking(move || FallbackGenerator::new(tool).generate(&config))
        .await
        .into_diagnostic()??;
    match output {
        Some(path) => tokio::fs::write(&path, text)
            .await
            .into_diagnostic()
            .with_context(|| format!("Failed to write `{}`", path.display()))?,
        None => print!("{text}"),
    }
    Ok(())
}

/// Expands directories into the NSwag documents they contain, in
/// path order. Files are kept as given.
fn discover(paths: &[PathBuf], extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry
                .into_diagnostic()
                .with_context(|| format!("Failed to search `{}`", path.display()))?;
            let matches = entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
            if entry.file_type().is_file() && matches {
                files.push(entry.into_path());
            }
        }
    }
    Ok(files.into_iter().unique().collect())
}

/// Writes each generated source in path order, and reports each failure,
/// including failures to write. Returns the number of failed documents.
async fn write_outputs(
    results: Vec<(PathBuf, Result<GeneratedSource, Diagnostic>)>,
    out_dir: Option<&Path>,
) -> usize {
    let mut failed = 0;
    for (path, result) in results.into_iter().sorted_by(|(a, _), (b, _)| a.cmp(b)) {
        let written = match result {
            Ok(source) => write_source(&path, out_dir, &source).await.map_err(|err| {
                let err: &(dyn std::error::Error + 'static) = err.as_ref();
                Diagnostic::from_error(err)
            }),
            Err(diagnostic) => Err(diagnostic),
        };
        match written {
            Ok(target) => {
                info!(config = %path.display(), output = %target.display(), "wrote generated client");
            }
            Err(diagnostic) => {
                failed += 1;
                report(&path, &diagnostic);
            }
        }
    }
    failed
}

/// Writes generated source into `out_dir`, or next to its document.
async fn write_source(
    config: &Path,
    out_dir: Option<&Path>,
    source: &GeneratedSource,
) -> Result<PathBuf> {
    let dir = match out_dir {
        Some(dir) => dir,
        None => config.parent().unwrap_or(Path::new("")),
    };
    tokio::fs::create_dir_all(dir)
        .await
        .into_diagnostic()
        .with_context(|| format!("Failed to create `{}`", dir.display()))?;
    let target = dir.join(&source.file_name);
    tokio::fs::write(&target, &source.text)
        .await
        .into_diagnostic()
        .with_context(|| format!("Failed to write `{}`", target.display()))?;
    Ok(target)
}

fn report(path: &Path, diagnostic: &Diagnostic) {
    eprintln!("{}: {diagnostic}", path.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn test_discover_walks_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("api");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(nested.join("pets.nswag"), "{}").unwrap();
        std::fs::write(nested.join("Users.NSWAG"), "{}").unwrap();
        std::fs::write(nested.join("notes.txt"), "").unwrap();
        let explicit = dir.path().join("other.json");

        let files = discover(&[dir.path().to_owned(), explicit.clone()], "nswag").unwrap();
        assert_eq!(
            files,
            [nested.join("Users.NSWAG"), nested.join("pets.nswag"), explicit]
        );
    }

    #[test]
    fn test_discover_removes_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("pets.nswag");
        std::fs::write(&file, "{}").unwrap();

        let files = discover(&[dir.path().to_owned(), file.clone()], "nswag").unwrap();
        assert_eq!(files, [file]);
    }

    #[tokio::test]
    async fn test_write_outputs_continues_after_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        // A file where a directory should be makes its target unwritable.
        let blocked = dir.path().join("blocked");
        std::fs::write(&blocked, "").unwrap();
        let source = |name: &str| GeneratedSource {
            file_name: format!("{name}.rs"),
            text: "// generated\n".to_owned(),
        };
        let results = vec![
            (dir.path().join("d.nswag"), Ok(source("d.nswag"))),
            (blocked.join("a.nswag"), Ok(source("a.nswag"))),
            (
                dir.path().join("c.nswag"),
                Err(Diagnostic::from_error(&std::io::Error::other("bad document"))),
            ),
        ];

        let failed = write_outputs(results, None).await;
        assert_eq!(failed, 2);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("d.nswag.rs")).unwrap(),
            "// generated\n"
        );
        assert!(!dir.path().join("c.nswag.rs").exists());
    }

    #[tokio::test]
    async fn test_write_source_next_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("pets.nswag");
        let source = GeneratedSource {
            file_name: "pets.nswag.rs".to_owned(),
            text: "// generated\n".to_owned(),
        };

        let target = write_source(&config, None, &source).await.unwrap();
        assert_eq!(target, dir.path().join("pets.nswag.rs"));

        let out_dir = dir.path().join("out");
        let target = write_source(&config, Some(&out_dir), &source).await.unwrap();
        assert_eq!(target, out_dir.join("pets.nswag.rs"));
        assert_eq!(std::fs::read_to_string(target).unwrap(), "// generated\n");
    }
}
