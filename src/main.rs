//! fileprog - transfer progress tracking for messaging clients
//!
//! Command-line front end for the progress tracker. It replays scripted store
//! notifications through a progress slot and prints what the indicator would
//! show at each step.
//!
//! # Usage
//!
//! ```bash
//! fileprog replay script.json          # Replay a notification script
//! fileprog replay script.json --json   # Same, one JSON frame per line
//! fileprog simulate --chunks 10        # Synthetic download
//! fileprog simulate --upload --cancel  # Synthetic upload, cancelled halfway
//! fileprog config                      # Show effective configuration
//! ```

use clap::{Parser, Subcommand};
use fileprog::{config, script};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

shadow_rs::shadow!(build);

const LONG_VERSION: &str = shadow_rs::formatcp!(
    "{} ({} {})",
    build::PKG_VERSION,
    build::SHORT_COMMIT,
    build::BUILD_TIME
);

#[derive(Parser)]
#[command(name = "fileprog")]
#[command(about = "Transfer progress tracker - replay and simulate file transfers", long_about = None)]
#[command(version = build::PKG_VERSION, long_version = LONG_VERSION)]
struct Cli {
    /// Configuration file (default: <data dir>/config.json)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON script of store notifications
    Replay {
        /// Path to the script
        script: PathBuf,
        /// Print frames as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Run a synthetic chunked transfer
    Simulate {
        /// File size in bytes
        #[arg(long, default_value_t = 1_048_576)]
        size: u64,
        /// Number of progress notifications
        #[arg(long, default_value_t = 8)]
        chunks: u64,
        /// Delay between notifications in milliseconds
        #[arg(long, default_value_t = 50)]
        delay: u64,
        /// Simulate an upload instead of a download
        #[arg(long)]
        upload: bool,
        /// Stop the transfer halfway
        #[arg(long)]
        cancel: bool,
        /// Print frames as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration
    Config,
}

fn main() -> ExitCode {
    let _ = fileprog::utils::ensure_dirs();
    init_logging();
    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(handle_cli(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Logs to `fileprog.log` in the state directory, falling back to stderr.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Some(log_path) = fileprog::utils::log_file()
        && let Ok(file) = std::fs::File::create(log_path)
    {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(file)
            .init();
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn load_effective_config(path: Option<&Path>) -> fileprog::Result<config::ProgressConfig> {
    match path {
        Some(path) => config::load_config_from(path).await,
        None => Ok(config::load_config().await),
    }
}

async fn handle_cli(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_effective_config(cli.config.as_deref()).await?;
    let settings = config.tracker_settings();

    match cli.command {
        Commands::Replay { script: path, json } => {
            let script = script::load_script(&path).await?;
            let frames = script::run_script(&script, settings).await?;
            print_frames(&frames, json)?;
        }
        Commands::Simulate {
            size,
            chunks,
            delay,
            upload,
            cancel,
            json,
        } => {
            let simulation = script::Simulation {
                size,
                chunks,
                chunk_delay_ms: delay,
                upload,
                cancel,
                ..script::Simulation::default()
            };
            let mut settings = settings;
            if upload {
                settings.options.track_upload = true;
            }
            let script = simulation.to_script(settings.animation_complete);
            let frames = script::run_script(&script, settings).await?;
            print_frames(&frames, json)?;
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}

fn print_frames(frames: &[script::Frame], json: bool) -> Result<(), Box<dyn std::error::Error>> {
    for frame in frames {
        if json {
            println!("{}", serde_json::to_string(frame)?);
            continue;
        }

        let step = frame
            .step
            .map_or_else(|| "init".to_string(), |s| format!("{s:>4}"));
        let state = &frame.state;
        if state.in_progress {
            let cancel = if state.show_cancel_control { "  [x]" } else { "" };
            println!(
                "{step}  {:<11} {:>6.1}%{cancel}",
                state.phase.to_string(),
                state.progress_percent
            );
        } else {
            println!("{step}  -");
        }
    }
    Ok(())
}
