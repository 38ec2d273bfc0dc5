use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use code_optimizer::analysis::files::collect_paths;
use code_optimizer::analysis::timings;
use code_optimizer::config::{self, Config, LogFormat};
use code_optimizer::{AnalysisError, CodeOptimizer, Tool, ToolOutput};

#[derive(Debug, Parser)]
#[command(name = "code-optimizer", version, about = "Complexity, nested-loop and security checks for Python code")]
struct Cli {
    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Cyclomatic-style complexity score per function
    Complexity(Input),
    /// Nested loops that are likely performance bottlenecks
    Bottlenecks(Input),
    /// Known-dangerous API usage
    Security(Input),
    /// All three analyses
    All(Input),
}

#[derive(Debug, Args)]
struct Input {
    /// Files or directories to analyze; reads code from stdin when omitted
    paths: Vec<PathBuf>,
}

impl Command {
    fn split(self) -> (Tool, Vec<PathBuf>) {
        match self {
            Self::Complexity(input) => (Tool::AnalyzeCodeComplexity, input.paths),
            Self::Bottlenecks(input) => (Tool::FindPerformanceBottlenecks, input.paths),
            Self::Security(input) => (Tool::SuggestSecurityImprovements, input.paths),
            Self::All(input) => (Tool::All, input.paths),
        }
    }
}

/// Per-file entry in batch output
#[derive(serde::Serialize)]
#[serde(untagged)]
enum Entry {
    Report(ToolOutput),
    Failed { error: String },
}

/// Path-keyed results, serialized as a JSON object in path order
struct BatchOutput(Vec<(String, Entry)>);

impl Serialize for BatchOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (path, entry) in &self.0 {
            map.serialize_entry(path, entry)?;
        }
        map.end()
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

/// Run blocking analysis off the async runtime, bounded by `timeout`
async fn run_isolated<T, F>(timeout: Duration, job: F) -> std::result::Result<T, AnalysisError>
where
    T: Send + 'static,
    F: FnOnce() -> std::result::Result<T, AnalysisError> + Send + 'static,
{
    match tokio::time::timeout(timeout, tokio::task::spawn_blocking(job)).await {
        Ok(Ok(out)) => out,
        Ok(Err(e)) => Err(AnalysisError::WorkerFailed(e.to_string())),
        Err(_) => Err(AnalysisError::Timeout {
            timeout_ms: timeout.as_millis(),
        }),
    }
}

fn write_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

async fn run_stdin(optimizer: CodeOptimizer, cfg: &Config, tool: Tool, pretty: bool) -> Result<ExitCode> {
    let mut code = String::new();
    io::stdin()
        .read_to_string(&mut code)
        .context("failed to read code from stdin")?;

    let output = run_isolated(cfg.timeout, move || optimizer.invoke(tool, &code)).await?;
    write_json(&output, pretty)?;
    Ok(ExitCode::SUCCESS)
}

/// Each file gets its own worker and its own deadline; unreadable files and
/// failed analyses are reported per path without stopping the batch.
async fn run_paths(
    optimizer: CodeOptimizer,
    cfg: &Config,
    tool: Tool,
    inputs: Vec<PathBuf>,
    pretty: bool,
) -> Result<ExitCode> {
    let files = collect_paths(&inputs, cfg)?;
    tracing::debug!(files = files.len(), %tool, "starting batch analysis");

    let mut pending = Vec::with_capacity(files.len());
    for file in &files {
        let label = file.display().to_string();
        let task = match std::fs::read_to_string(file) {
            Ok(code) => {
                let optimizer = optimizer.clone();
                Ok(tokio::spawn(run_isolated(cfg.timeout, move || optimizer.invoke(tool, &code))))
            }
            Err(e) => Err(format!("failed to read {label}: {e}")),
        };
        pending.push((label, task));
    }

    let mut failed = false;
    let mut entries = Vec::with_capacity(pending.len());
    for (label, task) in pending {
        let result = match task {
            Ok(handle) => match handle.await {
                Ok(result) => result.map_err(|e| e.to_string()),
                Err(e) => Err(AnalysisError::WorkerFailed(e.to_string()).to_string()),
            },
            Err(read_error) => Err(read_error),
        };
        let entry = match result {
            Ok(output) => Entry::Report(output),
            Err(error) => {
                failed = true;
                tracing::warn!(path = %label, %error, "analysis failed");
                Entry::Failed { error }
            }
        };
        entries.push((label, entry));
    }
    write_json(&BatchOutput(entries), pretty)?;

    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let (cfg, warnings) = config::load_config_with_warnings()?;
    init_tracing(cfg.log_format);
    for warning in &warnings {
        tracing::warn!("{warning}");
    }

    let optimizer = CodeOptimizer::from_config(&cfg);
    let (tool, paths) = cli.command.split();

    let code = if paths.is_empty() {
        run_stdin(optimizer, &cfg, tool, cli.pretty).await
    } else {
        run_paths(optimizer, &cfg, tool, paths, cli.pretty).await
    };

    let summary = timings::summary();
    if !summary.is_empty() {
        eprint!("{summary}");
    }
    code
}
