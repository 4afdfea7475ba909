use std::path::PathBuf;

use bias_codex::lang::{self, SplitConfig};
use bias_codex::lang::pipeline::{
    DEFAULT_FILE_STEM, DEFAULT_INPUT, DEFAULT_LANGUAGE, DEFAULT_OUTPUT_DIR,
};
use clap::Parser;
use tracing::info;

/// Split a multilingual Cognitive Bias Codex SVG into one SVG per language.
#[derive(Parser)]
#[command(name = "split-languages", version)]
struct Cli {
    /// Multilingual source SVG
    #[arg(long, default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Directory receiving the per-language files
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Language left in the source file; no variant is written for it
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    default_lang: String,

    /// File name prefix; outputs are named <stem>_<code>.svg
    #[arg(long, default_value = DEFAULT_FILE_STEM)]
    file_stem: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    bias_codex::init_tracing()?;

    let config = SplitConfig {
        input: cli.input,
        output_dir: cli.output_dir,
        default_language: cli.default_lang,
        file_stem: cli.file_stem,
    };
    info!(input = %config.input.display(), "splitting languages");

    lang::run(&config).inspect_err(|e| tracing::error!("split failed: {e}"))?;
    Ok(())
}
