// src/main.rs
//! Loopstall
//!
//! Serves HTTP endpoints that run blocking disk, network and cpu workloads
//! on the scheduler thread, or runs a single workload from the command line.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use loopstall::fixtures::{create_dummy_file, megabytes};
use loopstall::observability::{init_metrics, init_tracing, record_run};
use loopstall::runtime::build_runtime;
use loopstall::server::{AppState, ControlServer, ResponseFormat, WorkloadOverrides};
use loopstall::utils::config::HarnessConfig;
use loopstall::{BuildInfo, MeasurementReporter, WorkloadKind, WorkloadResult, WorkloadRunner};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(
    name = "loopstall",
    version,
    long_version = loopstall::LONG_VERSION,
    about = "Measure how blocking work starves a cooperative scheduler"
)]
struct Cli {
    /// Config file (extension optional)
    #[arg(long, env = "LOOPSTALL_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP control surface (default)
    Serve,

    /// Run one workload in-process and print its summary
    Run(RunArgs),

    /// Write the dummy file read by disk workloads
    CreateFile {
        /// Target path; defaults to the configured disk path
        #[arg(long)]
        path: Option<PathBuf>,

        /// Size in megabytes
        #[arg(long, default_value_t = 1024)]
        size_mb: u64,
    },
}

#[derive(Debug, Args)]
struct RunArgs {
    /// disk, network or cpu
    kind: WorkloadKind,

    #[arg(long)]
    repeat: Option<u64>,

    /// File to read (disk)
    #[arg(long)]
    path: Option<PathBuf>,

    /// Endpoint to call (network)
    #[arg(long)]
    url: Option<String>,

    /// Problem size (cpu)
    #[arg(long)]
    size: Option<u64>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => HarnessConfig::load_from(path),
        None => HarnessConfig::load(),
    }
    .context("Failed to load configuration")?;

    init_tracing(config.logging.format)?;

    info!("Starting {}", BuildInfo::current());

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config),
        Command::Run(args) => run_once(&config, args),
        Command::CreateFile { path, size_mb } => {
            let path = path.unwrap_or_else(|| config.disk.path.clone());
            let written = create_dummy_file(&path, megabytes(size_mb)?)?;
            println!("Created {} ({} bytes)", path.display(), written);
            Ok(())
        }
    }
}

fn serve(config: HarnessConfig) -> Result<()> {
    let metrics = init_metrics()?;
    let runtime = build_runtime(&config.runtime)?;

    info!("Configuration loaded: {:?}", config);

    runtime.block_on(async move {
        let listener = ControlServer::bind(&config.listen_addr()).await?;
        let server = Arc::new(ControlServer::new(AppState::new(config, Some(metrics))));

        let shutdown_signal = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to install CTRL+C signal handler: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Received shutdown signal, cleaning up...");
        };

        server.serve(listener, shutdown_signal).await
    })?;

    info!("Server stopped gracefully");
    Ok(())
}

fn run_once(config: &HarnessConfig, args: RunArgs) -> Result<()> {
    let overrides = WorkloadOverrides {
        repeat: args.repeat.map(|r| r.to_string()),
        size: args.size.map(|s| s.to_string()),
        path: args.path.map(|p| p.display().to_string()),
        url: args.url,
        format: if args.json {
            ResponseFormat::Json
        } else {
            ResponseFormat::Text
        },
    };

    let base = config.workload(args.kind);
    let requested = base.repeat_count;
    let result = match overrides.apply(base) {
        Ok(workload) => WorkloadRunner::new().run(&workload),
        Err(reason) => WorkloadResult::invalid(args.kind, requested, reason),
    };
    record_run(&result);

    match overrides.format {
        ResponseFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        ResponseFormat::Text => println!("{}", MeasurementReporter::new().summarize(&result)),
    }

    if result.is_completed() {
        Ok(())
    } else {
        std::process::exit(1);
    }
}
