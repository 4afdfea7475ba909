pub mod pipeline;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::svg::{Element, Node, SYSTEM_LANGUAGE, SvgError, XML_NS};

pub use pipeline::{SplitConfig, run};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n";

static LANG_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"systemLanguage="([^"]+)""#).expect("systemLanguage regex is valid")
});

#[derive(Debug, thiserror::Error)]
pub enum LangError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse SVG: {0}")]
    Svg(#[from] SvgError),

    #[error("language code '{0}' cannot be used in a file name")]
    InvalidCode(String),
}

/// Every distinct `systemLanguage="..."` value in the raw text, sorted.
///
/// This is a textual scan, so it also works on documents that do not parse.
pub fn detect_languages(svg: &str) -> Vec<String> {
    LANG_ATTR_RE
        .captures_iter(svg)
        .map(|c| c[1].to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Copy of `root` holding only untagged content and content tagged `code`.
///
/// Elements tagged with another language are dropped with their subtree, the
/// `systemLanguage` attribute is stripped everywhere, and a root `xml:lang`
/// is rewritten to `code`.
pub fn filter_for_language(root: &Element, code: &str) -> Element {
    let mut filtered = root.clone();
    let removed = prune(&mut filtered, code);
    filtered.remove_attr(None, SYSTEM_LANGUAGE);
    filtered.set_attr(Some(XML_NS), "lang", code);
    debug!(code, removed, "filtered language variant");
    filtered
}

/// Each element filters its own children, so removal never has to search
/// for a parent.
fn prune(element: &mut Element, code: &str) -> usize {
    let before = element.children.len();
    element.children.retain(|child| match child {
        Node::Element(e) => e.attr(None, SYSTEM_LANGUAGE).is_none_or(|lang| lang == code),
        _ => true,
    });
    let mut removed = before - element.children.len();

    for child in &mut element.children {
        if let Node::Element(e) = child {
            e.remove_attr(None, SYSTEM_LANGUAGE);
            removed += prune(e, code);
        }
    }
    removed
}

/// Output path for one language variant: `<dir>/<stem>_<code>.svg`.
pub fn output_path(output_dir: &Path, file_stem: &str, code: &str) -> Result<PathBuf, LangError> {
    validate_code(code)?;
    Ok(output_dir.join(format!("{file_stem}_{code}.svg")))
}

fn validate_code(code: &str) -> Result<(), LangError> {
    if code.is_empty()
        || code == "."
        || code == ".."
        || code.contains(['/', '\\', '\0', '\n', '\r'])
    {
        return Err(LangError::InvalidCode(code.to_string()));
    }
    Ok(())
}

/// Filter `root` for `code` and write it, with an XML declaration, into
/// `output_dir` (created if missing). Returns the written path.
pub fn write_language_svg(
    root: &Element,
    code: &str,
    output_dir: &Path,
    file_stem: &str,
) -> Result<PathBuf, LangError> {
    let path = output_path(output_dir, file_stem, code)?;
    let filtered = filter_for_language(root, code);

    std::fs::create_dir_all(output_dir).map_err(|source| LangError::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut svg = String::from(XML_DECLARATION);
    svg.push_str(&filtered.to_xml());
    std::fs::write(&path, svg).map_err(|source| LangError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
