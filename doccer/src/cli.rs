///
/// This module implements the CLI interface for doccer: command parsing,
/// argument validation, and routing to the pipelines in [`doccer-core`].
///
/// ## Features
/// - Entry struct [`Cli`] defines all user-facing options and subcommands.
/// - `build` runs the whole aggregation pipeline for a directory.
/// - `index` injects the symbol index into an existing reflection dump.
/// - `config` prints the merged configuration.
/// - Async entrypoint (`run`) for programmatic invocation and integration testing.
///
/// ## Extending
/// When adding subcommands, update [`Commands`] below and keep all
/// non-trivial logic inside `doccer-core`.
///
/// [`doccer-core`]: ../../doccer-core/
/// [`Cli`]: struct.Cli.html
/// [`Commands`]: enum.Commands.html
use crate::load_config::load_config;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use doccer_core::aggregate::{aggregate, inject_file};
use doccer_core::compiler::TypedocCompiler;
use doccer_core::download::GitFetcher;
use doccer_core::inject::{IndexInjector, MarkerPolicy, DEFAULT_MARKER_TAG};
use doccer_core::render::{IndexRenderer, PageLayout};
use std::path::PathBuf;

/// CLI for doccer: aggregate API documentation from many repositories.
#[derive(Parser)]
#[clap(
    name = "doccer",
    version,
    about = "Aggregate API documentation across repositories into one site with a full symbol index"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch all repositories, reflect them, inject the index and render the site
    Build {
        /// Directory to resolve layered configuration from (defaults to the current directory)
        #[clap(long)]
        dir: Option<PathBuf>,
    },
    /// Inject the full index into an existing reflection JSON dump
    Index {
        /// Reflection JSON produced by the documentation compiler
        #[clap(long)]
        input: PathBuf,
        /// Where to write the result (defaults to rewriting the input)
        #[clap(long)]
        output: Option<PathBuf>,
        /// Comment tag marking the injection point
        #[clap(long, default_value = DEFAULT_MARKER_TAG)]
        marker: String,
        #[clap(long, value_enum, default_value_t = PolicyArg::FirstOnly)]
        policy: PolicyArg,
        #[clap(long, value_enum, default_value_t = LayoutArg::Flat)]
        layout: LayoutArg,
    },
    /// Print the merged configuration as JSON
    Config {
        #[clap(long)]
        dir: Option<PathBuf>,
    },
}

/// How to treat more than one index marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    FirstOnly,
    Broadcast,
    Reject,
}

impl From<PolicyArg> for MarkerPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::FirstOnly => MarkerPolicy::FirstOnly,
            PolicyArg::Broadcast => MarkerPolicy::Broadcast,
            PolicyArg::Reject => MarkerPolicy::Reject,
        }
    }
}

/// Page layout of the compiler output the index links into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LayoutArg {
    Flat,
    Directories,
}

impl From<LayoutArg> for PageLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Flat => PageLayout::Flat,
            LayoutArg::Directories => PageLayout::Directories,
        }
    }
}

fn resolve_dir(dir: Option<PathBuf>) -> Result<PathBuf> {
    match dir {
        Some(dir) => Ok(dir),
        None => std::env::current_dir().context("Failed to determine current directory"),
    }
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Build { dir } => {
            let config = load_config(resolve_dir(dir)?)?;
            tracing::info!(command = "build", "Starting documentation build");
            let fetcher = GitFetcher::new(config.work_dir.clone(), config.install.clone());
            let compiler = TypedocCompiler::new(config.compiler.clone());
            match aggregate(&config, &fetcher, &compiler).await {
                Ok(report) => {
                    tracing::info!(command = "build", ?report, "Documentation build complete");
                    println!(
                        "Built documentation for {} repositories into {}; index has {} entries.",
                        report.repositories.len(),
                        report.out_dir.display(),
                        report.index.entries
                    );
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "build", error = %e, "Documentation build failed");
                    Err(anyhow::Error::new(e))
                }
            }
        }
        Commands::Index {
            input,
            output,
            marker,
            policy,
            layout,
        } => {
            let output = output.unwrap_or_else(|| input.clone());
            let injector = IndexInjector::new(marker)
                .with_policy(policy.into())
                .with_renderer(IndexRenderer::new(layout.into()));
            let report = inject_file(&input, &output, &injector)
                .with_context(|| format!("Failed to index {}", input.display()))?;
            tracing::info!(command = "index", ?report, "Index injection complete");
            println!(
                "Indexed {} entries into {} site(s); {} marker(s) skipped.",
                report.entries,
                report.injected.len(),
                report.skipped.len()
            );
            Ok(())
        }
        Commands::Config { dir } => {
            let config = load_config(resolve_dir(dir)?)?;
            let json = serde_json::to_string_pretty(&config)
                .context("Failed to serialise configuration")?;
            println!("{json}");
            Ok(())
        }
    }
}
