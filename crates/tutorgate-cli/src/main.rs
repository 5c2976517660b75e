//! `tutorgate` -- CLI binary for the tutor gateway.
//!
//! Provides the following subcommands:
//!
//! - `tutorgate serve` -- Discover handlers and serve the HTTP API.
//! - `tutorgate tutors` -- Run discovery and print the tutor table.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::warn;

use tutorgate_core::{DEFAULT_TUTOR_ID, Dispatcher, HandlerRegistry};
use tutorgate_llm::{GenerationBackend, OllamaClient, OllamaConfig};
use tutorgate_server::{ApiState, build_router};
use tutorgate_types::GatewayConfig;

/// Default config file looked up next to the working directory.
const DEFAULT_CONFIG_PATH: &str = "tutorgate.json";

/// tutorgate gateway CLI.
#[derive(Parser)]
#[command(name = "tutorgate", about = "AI tutor gateway", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Discover handlers and serve the HTTP API.
    Serve(ServeArgs),

    /// Run discovery and print the tutor table without serving.
    Tutors(TutorsArgs),
}

#[derive(clap::Args)]
struct ServeArgs {
    /// Path to the gateway config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the configured bind port.
    #[arg(long)]
    port: Option<u16>,
}

#[derive(clap::Args)]
struct TutorsArgs {
    /// Path to the gateway config file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<GatewayConfig> {
    let config = match path {
        Some(path) => GatewayConfig::load(path)?,
        None => GatewayConfig::load_or_default(Path::new(DEFAULT_CONFIG_PATH))?,
    };
    Ok(config)
}

fn build_backend(config: &GatewayConfig) -> Arc<dyn GenerationBackend> {
    Arc::new(OllamaClient::new(OllamaConfig {
        base_url: config.backend.base_url.clone(),
        timeout_secs: config.backend.timeout_secs,
    }))
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let backend = build_backend(&config);
    let registry = Arc::new(HandlerRegistry::discover(&config.handlers_dir, backend.clone()));

    if registry.tutor(DEFAULT_TUTOR_ID).is_none() {
        warn!(
            "no '{DEFAULT_TUTOR_ID}' handler discovered; chat falls back to the built-in profile"
        );
    }

    let dispatcher = Arc::new(Dispatcher::new(registry.clone(), backend.clone()));
    let router = build_router(
        ApiState {
            dispatcher,
            registry,
            backend,
        },
        &config.cors_origins,
    );

    tutorgate_server::serve(&config.host, config.port, router).await?;
    Ok(())
}

fn tutors(args: TutorsArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let backend = build_backend(&config);
    let registry = HandlerRegistry::discover(&config.handlers_dir, backend);

    let profiles = registry.tutors();
    if profiles.is_empty() {
        println!("no tutors discovered under {}", config.handlers_dir.display());
        return Ok(());
    }

    println!("{:<24} {:<24} {:<16}", "ID", "NAME", "MODEL");
    for profile in profiles {
        println!(
            "{:<24} {:<24} {:<16}",
            profile.id, profile.display_name, profile.backend_model
        );
    }

    let domains = registry.analysis_domains();
    if !domains.is_empty() {
        println!("\nanalysis domains: {}", domains.join(", "));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    match cli.command {
        Commands::Serve(args) => serve(args).await?,
        Commands::Tutors(args) => tutors(args)?,
    }
    Ok(())
}
