//! Audio Lab - apply one effect to an audio file

use anyhow::Context;
use audiolab_cli::commands::{self, ProcessRequest};
use audiolab_cli::config::AppConfig;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "audiolab")]
#[command(about = "Offline audio effects: decode, process, write WAV", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./audiolab.toml if present)
    #[arg(short, long, global = true, env = "AUDIOLAB_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply an effect and write the result as WAV
    Process {
        /// Input audio file
        #[arg(short, long)]
        input: PathBuf,
        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,
        /// Effect identifier, e.g. reverb or pitch_shift
        #[arg(short, long)]
        effect: String,
        /// Effect parameters as a JSON object
        #[arg(short, long, conflicts_with = "params_file")]
        params: Option<String>,
        /// Read effect parameters from a JSON file
        #[arg(long)]
        params_file: Option<PathBuf>,
    },
    /// List every effect with its parameter schema
    Effects,
    /// Print duration, sample rate and channel count of a file
    Info {
        /// Input audio file
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_filter.as_str().into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Process {
            input,
            output,
            effect,
            params,
            params_file,
        } => {
            let params = commands::read_params(params.as_deref(), params_file.as_deref())?;
            let request = ProcessRequest {
                input,
                output,
                effect,
                params,
            };
            print_json(&commands::process(&config, &request)?)?;
        }
        Commands::Effects => {
            print_json(&commands::describe_effects())?;
        }
        Commands::Info { input } => {
            print_json(&commands::inspect(&config, &input)?)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize report")?;
    println!("{}", text);
    Ok(())
}
