use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reachscope::analysis::DeadCodeAnalyzer;
use reachscope::config::AnalyzerConfig;
use reachscope::export::{self, ExportData, ExportFormat};
use reachscope::loader;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "reachscope")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version)]
#[command(about = "Dead-code and reachability analyzer for JavaScript, TypeScript and Python projects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Find orphaned files, unused exports and unused dependencies
    Analyze {
        /// Path to analyze (defaults to current directory)
        #[arg(short, long, default_value = ".")]
        path: PathBuf,

        /// Output format: json or markdown
        #[arg(short, long, default_value_t = ExportFormat::Json)]
        format: ExportFormat,

        /// Analyzer configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Log every analysis phase
        #[arg(short, long, conflicts_with = "quiet")]
        verbose: bool,

        /// Only log errors
        #[arg(short, long)]
        quiet: bool,
    },
    /// Show version information
    Version,
}

/// Installs the stderr subscriber. `RUST_LOG` wins over the flags.
fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn project_name(path: &Path) -> String {
    path.canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| path.display().to_string())
}

fn run_analyze(path: &Path, format: ExportFormat, config: Option<&Path>) -> Result<()> {
    let config = match config {
        Some(file) => AnalyzerConfig::from_file(file)
            .with_context(|| format!("Failed to load config from {}", file.display()))?,
        None => AnalyzerConfig::default(),
    };

    let files = loader::load_project(path).with_context(|| format!("Failed to load project at {}", path.display()))?;
    info!(path = %path.display(), files = files.len(), "analyzing project");

    let outcome = DeadCodeAnalyzer::new(config).run(&files);
    let data = ExportData::new(project_name(path), &outcome);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    export::export(format, &data, &mut handle).context("Failed to write report")?;
    handle.flush().context("Failed to flush report")?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Analyze {
            path,
            format,
            config,
            verbose,
            quiet,
        }) => {
            init_tracing(verbose, quiet);
            run_analyze(&path, format, config.as_deref())
        }
        Some(Commands::Version) => {
            println!("reachscope v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        None => {
            println!("reachscope - dead-code and reachability analyzer");
            println!("Run 'reachscope analyze' to analyze the current directory");
            println!("Run 'reachscope --help' for more information");
            Ok(())
        }
    }
}
