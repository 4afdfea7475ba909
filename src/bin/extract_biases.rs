use std::path::PathBuf;

use bias_codex::bias::{self, ExtractConfig};
use bias_codex::bias::pipeline::{DEFAULT_OUTPUT_FILE, DEFAULT_SVG_FILE};
use bias_codex::wiki::WikiClient;
use clap::Parser;
use reqwest::Client;
use tracing::info;

/// Extract cognitive biases from SVG and fetch Wikipedia data.
#[derive(Parser)]
#[command(name = "extract-biases", version)]
struct Cli {
    /// Number of biases to extract
    num_biases: usize,

    /// Path to the SVG file
    #[arg(long = "svg_file", visible_alias = "svg-file", default_value = DEFAULT_SVG_FILE)]
    svg_file: PathBuf,

    /// Output file path
    #[arg(long = "output_file", visible_alias = "output-file", default_value = DEFAULT_OUTPUT_FILE)]
    output_file: PathBuf,

    /// Summaries fetched in parallel; 1 keeps requests strictly sequential
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=16))]
    concurrency: u8,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    bias_codex::init_tracing()?;

    let http = Client::builder().build()?;
    let wiki = WikiClient::from_env(http)?;

    let config = ExtractConfig {
        num_biases: cli.num_biases,
        svg_file: cli.svg_file,
        output_file: cli.output_file,
        concurrency: usize::from(cli.concurrency),
    };
    info!(svg = %config.svg_file.display(), count = config.num_biases, "extracting biases");

    bias::run(&config, &wiki)
        .await
        .inspect_err(|e| tracing::error!("extraction failed: {e}"))?;
    Ok(())
}
