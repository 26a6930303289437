//! Binary entry point: parses flags, sets up logging and configuration, and
//! launches the JARVIS loop.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use jarvis::assistant::{self, InputMode, RunOptions};
use jarvis::config::{AppConfig, CONFIG_PATH};

#[derive(Parser)]
#[command(name = "jarvis", version, about = "Voice assistant for a servo, an LED, and environment sensors")]
struct Cli {
    /// Read utterances from stdin instead of the microphone
    #[arg(long)]
    text: bool,

    /// Chat memory file (overrides config.json)
    #[arg(long, env = "JARVIS_MEMORY_FILE")]
    memory_file: Option<PathBuf>,

    /// Run without the serial link; hardware commands are skipped
    #[arg(long)]
    no_hardware: bool,

    /// Configuration file
    #[arg(long, default_value = CONFIG_PATH)]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info,jarvis=info",
        1 => "info,jarvis=debug",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = AppConfig::load(&cli.config);
    if let Some(path) = cli.memory_file {
        config.memory_file = path.to_string_lossy().into_owned();
    }
    let options = RunOptions {
        input: if cli.text { InputMode::Text } else { InputMode::Voice },
        hardware: !cli.no_hardware,
    };

    match assistant::run_voice_assistant(config, options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "assistant stopped");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
