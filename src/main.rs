//! Oscillate - iteratively refine a topic into its best idea.
//!
//! Streams the thought process to the terminal while the refinement loop runs
//! and prints the surviving idea at the end.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use oscillate::core::{Config, LOCAL_CONFIG_FILE};
use oscillate::ProviderKind;

/// Oscillating creativity machine: refine a topic into its best idea
#[derive(Parser)]
#[command(name = "oscillate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of the default lookup
    #[arg(short, long, global = true, env = "OSCILLATE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Refine a topic into its best idea
    #[cfg(feature = "ai")]
    Run {
        /// The goal to refine
        topic: String,

        /// Number of generate/select rounds
        #[arg(short, long)]
        rounds: Option<usize>,

        /// Seconds to pause between rounds
        #[arg(long)]
        pause_secs: Option<u64>,

        /// Model to request
        #[arg(short, long)]
        model: Option<String>,

        /// Completion provider (openai, ollama)
        #[arg(short, long)]
        provider: Option<ProviderKind>,

        /// Override the provider endpoint (e.g. a credential proxy)
        #[arg(long)]
        base_url: Option<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show configuration
    Config {
        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() -> Result<()> {
    // A local .env may supply OPENAI_API_KEY and OSCILLATE_CONFIG
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();

    match cli.command {
        #[cfg(feature = "ai")]
        Commands::Run { topic, rounds, pause_secs, model, provider, base_url, format } => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(rounds) = rounds {
                config.refine.rounds = rounds;
            }
            if let Some(pause_secs) = pause_secs {
                config.refine.pause_secs = pause_secs;
            }
            if let Some(model) = model {
                config.ai.model = model;
            }
            if let Some(provider) = provider {
                config.ai.provider = provider;
            }
            if base_url.is_some() {
                config.ai.base_url = base_url;
            }
            cmd_run(&topic, &config, &format)?;
        }
        Commands::Config { path } => {
            cmd_config(cli.config.as_deref(), path)?;
        }
        Commands::Completions { shell } => {
            cmd_completions(shell);
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from_file(path),
        None => Config::load(),
    }
}

/// Run the refinement loop for a topic.
#[cfg(feature = "ai")]
fn cmd_run(topic: &str, config: &Config, format: &str) -> Result<()> {
    use std::sync::Arc;

    use oscillate::ai::build_provider;
    use oscillate::core::Topic;
    use oscillate::{App, RefineConfig, RefineEvent, RefinementWorkflow, Submission};

    let json = match format {
        "text" => false,
        "json" => true,
        other => anyhow::bail!("Unknown output format '{other}' (expected text or json)"),
    };

    // Nothing is sent anywhere for a blank topic.
    if Topic::new(topic).is_err() {
        anyhow::bail!("Please enter a topic to refine.");
    }

    let provider = build_provider(&config.ai)?;
    let mut workflow =
        RefinementWorkflow::new(provider).with_config(RefineConfig::from_config(config));

    if !json {
        workflow = workflow.with_observer(Arc::new(|event: &RefineEvent| {
            for line in event.display_lines() {
                println!("{line}\n");
            }
        }));
    }

    let app = App::new(workflow);

    // Create tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()?;

    match rt.block_on(app.submit(topic)) {
        Submission::Completed(refinement) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&refinement)?);
            } else {
                println!("Final Idea:\n{}", refinement.final_idea);
            }
            Ok(())
        }
        Submission::Failed(err) => {
            tracing::debug!(error = ?err, "Refinement failed");
            if json {
                if let Some(log) = err.partial_log() {
                    println!("{}", serde_json::to_string_pretty(log)?);
                }
            }
            anyhow::bail!(err.user_message())
        }
        Submission::Ignored => anyhow::bail!("Please enter a topic to refine."),
        Submission::Busy => anyhow::bail!("A refinement is already running."),
    }
}

/// Show configuration.
fn cmd_config(explicit: Option<&Path>, show_path: bool) -> Result<()> {
    if show_path {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(Config::locate)
            .or_else(|| Config::config_dir().map(|d| d.join("config.toml")))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE));
        println!("{}", path.display());
        return Ok(());
    }

    let config = load_config(explicit)?;
    print!("{}", toml::to_string_pretty(&config.redacted())?);
    Ok(())
}

/// Generate shell completions.
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "oscillate", &mut io::stdout());
}
