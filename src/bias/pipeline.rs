use std::path::PathBuf;

use futures::{StreamExt, TryStreamExt, stream};
use tracing::info;

use super::{BiasEntry, BiasError, load_biases, save_report};
use crate::wiki::{SummarySource, WikiError, link_segment};

pub const DEFAULT_SVG_FILE: &str = "Cognitive_bias_codex_en.svg.txt";
pub const DEFAULT_OUTPUT_FILE: &str = "biases_output.html";

#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub num_biases: usize,
    pub svg_file: PathBuf,
    pub output_file: PathBuf,
    /// Summaries fetched at once. 1 fetches strictly one after another.
    pub concurrency: usize,
}

impl ExtractConfig {
    pub fn new(num_biases: usize) -> Self {
        Self {
            num_biases,
            svg_file: PathBuf::from(DEFAULT_SVG_FILE),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            concurrency: 1,
        }
    }
}

/// Attach a summary to every entry. Results keep extraction order whatever
/// the concurrency; the first failed fetch aborts the whole batch.
pub async fn enrich<S: SummarySource>(
    source: &S,
    entries: Vec<BiasEntry>,
    concurrency: usize,
) -> Result<Vec<BiasEntry>, WikiError> {
    stream::iter(entries)
        .map(|entry| async move {
            println!("{}", progress_line(&entry));
            let summary = source.fetch_summary(&entry.link).await?;
            Ok::<_, WikiError>(entry.with_summary(summary))
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}

fn progress_line(entry: &BiasEntry) -> String {
    format!(
        "Fetching content for {} ({})...",
        entry.label,
        link_segment(&entry.link)
    )
}

/// Extract, enrich and save. Returns the number of biases written.
pub async fn run<S: SummarySource>(config: &ExtractConfig, source: &S) -> Result<usize, BiasError> {
    let biases = load_biases(&config.svg_file, config.num_biases)?;
    println!("Extracted {} biases from the SVG", biases.len());

    let enriched = enrich(source, biases, config.concurrency).await?;
    let empty = enriched.iter().filter(|b| b.summary.is_empty()).count();

    save_report(&enriched, &config.output_file)?;
    info!(
        count = enriched.len(),
        without_summary = empty,
        output = %config.output_file.display(),
        "report written"
    );
    println!(
        "Saved {} biases to {}",
        enriched.len(),
        config.output_file.display()
    );
    Ok(enriched.len())
}
