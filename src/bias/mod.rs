pub mod pipeline;
pub mod report;

use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::svg::{self, Element, SVG_NS, SYSTEM_LANGUAGE, XLINK_NS};
use crate::wiki::WikiError;

pub use pipeline::{ExtractConfig, enrich, run};
pub use report::{render, save_report};

#[derive(Debug, thiserror::Error)]
pub enum BiasError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Wiki(#[from] WikiError),
}

/// One bias from the codex: its English label, Wikipedia link and,
/// once enriched, the article's lead-section HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BiasEntry {
    pub label: String,
    pub link: String,
    pub summary: String,
}

impl BiasEntry {
    pub fn new(label: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            link: link.into(),
            summary: String::new(),
        }
    }

    pub fn with_summary(self, summary: String) -> Self {
        Self { summary, ..self }
    }
}

/// Collect up to `max_count` biases from the codex anchors, in document order.
///
/// An anchor contributes only if it has a non-empty `xlink:href` and its first
/// `<text>` without `systemLanguage` has non-blank content.
pub fn extract(root: &Element, max_count: usize) -> Vec<BiasEntry> {
    let mut biases = Vec::new();
    if max_count == 0 {
        return biases;
    }

    for anchor in root.descendants().filter(|e| e.is(SVG_NS, "a")) {
        let Some(link) = anchor.attr(Some(XLINK_NS), "href").filter(|l| !l.is_empty()) else {
            continue;
        };

        let label = anchor
            .descendants()
            .find(|e| e.is(SVG_NS, "text") && !e.has_attr(None, SYSTEM_LANGUAGE))
            .map(|text| text.text_content().trim().to_string())
            .unwrap_or_default();

        if label.is_empty() {
            debug!(%link, "anchor without default-language label skipped");
            continue;
        }

        biases.push(BiasEntry::new(label, link));
        if biases.len() >= max_count {
            break;
        }
    }

    biases
}

/// Parse `svg` and extract from it. A malformed document is reported and
/// yields no biases rather than an error.
pub fn extract_from_str(svg: &str, max_count: usize) -> Vec<BiasEntry> {
    match svg::parse(svg) {
        Ok(root) => extract(&root, max_count),
        Err(e) => {
            error!(%e, "failed to parse SVG");
            println!("Error parsing SVG: {e}");
            Vec::new()
        }
    }
}

pub fn load_biases(path: &Path, max_count: usize) -> Result<Vec<BiasEntry>, BiasError> {
    let svg = std::fs::read_to_string(path).map_err(|source| BiasError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(extract_from_str(&svg, max_count))
}
