//! XD Graph CLI - JSON bridge for code emitters
//!
//! Commands: inspect, convert, assets
//! Outputs JSON to stdout, logs to stderr
//! Returns non-zero when the container cannot be read

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

use xdgraph_core::{logging::init_logging, ConversionPipeline, ConvertConfig, PipelineError};

#[derive(Parser)]
#[command(name = "xdgraph-cli")]
#[command(about = "XD Graph CLI - design container to visual document IR")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a JSON conversion config
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize the raw container
    Inspect {
        /// Container file
        file: PathBuf,
    },

    /// Normalize every artboard and build the asset map
    Convert {
        /// Container file
        file: PathBuf,
    },

    /// Build the asset map only
    Assets {
        /// Container file
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = match &cli.config {
        Some(path) => match ConvertConfig::load_from_file(path) {
            Ok(c) => c,
            Err(e) => return fail(&e.into()),
        },
        None => ConvertConfig::default(),
    };

    let pipeline = ConversionPipeline::new(config);

    let result = match &cli.command {
        Commands::Inspect { file } => pipeline.inspect(file).and_then(|s| render(&s, cli.pretty)),
        Commands::Convert { file } => pipeline.convert(file).and_then(|o| render(&o, cli.pretty)),
        Commands::Assets { file } => pipeline.assets(file).and_then(|a| render(&a, cli.pretty)),
    };

    match result {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String, PipelineError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn fail(error: &PipelineError) -> ExitCode {
    let output = serde_json::json!({
        "success": false,
        "error": error.to_string(),
    });
    println!("{}", output);
    ExitCode::FAILURE
}
