use std::path::PathBuf;

use tracing::info;

use super::{LangError, detect_languages, write_language_svg};
use crate::svg;

pub const DEFAULT_INPUT: &str = "assets/images/cognitive_bias_codex_enfr.svg";
pub const DEFAULT_OUTPUT_DIR: &str = "assets/images";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_FILE_STEM: &str = "cognitive_bias_codex";

#[derive(Debug, Clone)]
pub struct SplitConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// Language kept in the source file itself; no variant is written for it.
    pub default_language: String,
    pub file_stem: String,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            default_language: DEFAULT_LANGUAGE.to_string(),
            file_stem: DEFAULT_FILE_STEM.to_string(),
        }
    }
}

/// Write one SVG per non-default language found in the input.
/// Returns the written paths in language order.
pub fn run(config: &SplitConfig) -> Result<Vec<PathBuf>, LangError> {
    let source = std::fs::read_to_string(&config.input).map_err(|source| LangError::Read {
        path: config.input.clone(),
        source,
    })?;

    let mut languages = detect_languages(&source);
    println!("Detected languages: {}", languages.join(", "));
    languages.retain(|lang| *lang != config.default_language);

    if languages.is_empty() {
        info!(input = %config.input.display(), "no non-default languages to split");
        return Ok(Vec::new());
    }

    let root = svg::parse(&source)?;

    let mut written = Vec::with_capacity(languages.len());
    for lang in &languages {
        println!("Processing {lang} language...");
        let path = write_language_svg(&root, lang, &config.output_dir, &config.file_stem)?;
        println!("Created language-specific SVG: {}", path.display());
        written.push(path);
    }

    info!(count = written.len(), "language variants written");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::tests::MULTILINGUAL;

    fn config_in(dir: &std::path::Path, source: &str) -> SplitConfig {
        let input = dir.join("cognitive_bias_codex_enfr.svg");
        std::fs::write(&input, source).unwrap();
        SplitConfig {
            input,
            output_dir: dir.join("images"),
            ..SplitConfig::default()
        }
    }

    #[test]
    fn default_config_matches_asset_layout() {
        let config = SplitConfig::default();
        assert_eq!(config.input, PathBuf::from("assets/images/cognitive_bias_codex_enfr.svg"));
        assert_eq!(config.output_dir, PathBuf::from("assets/images"));
        assert_eq!(config.default_language, "en");
    }

    #[test]
    fn writes_one_file_per_non_default_language() {
        let dir = tempfile::tempdir().unwrap();
        let source = MULTILINGUAL.replace(
            "<rect id=\"plain\"/>",
            "<rect id=\"plain\"/><text systemLanguage=\"en\">English</text>",
        );
        let config = config_in(dir.path(), &source);

        let written = run(&config).unwrap();

        let images = dir.path().join("images");
        assert_eq!(
            written,
            [
                images.join("cognitive_bias_codex_de.svg"),
                images.join("cognitive_bias_codex_fr.svg")
            ]
        );
        assert!(!images.join("cognitive_bias_codex_en.svg").exists());

        let fr = std::fs::read_to_string(&written[1]).unwrap();
        assert!(fr.contains("Ancrage"));
        assert!(!fr.contains("Ankereffekt"));
        assert!(!fr.contains("English"));
    }

    #[test]
    fn custom_default_language_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let config = SplitConfig {
            default_language: "de".to_string(),
            ..config_in(dir.path(), MULTILINGUAL)
        };

        let written = run(&config).unwrap();

        assert_eq!(written, [dir.path().join("images").join("cognitive_bias_codex_fr.svg")]);
    }

    #[test]
    fn untagged_document_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), "<svg><g/></svg>");

        assert!(run(&config).unwrap().is_empty());
        assert!(!dir.path().join("images").exists());
    }

    #[test]
    fn malformed_document_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), r#"<svg><g systemLanguage="fr"></svg>"#);

        assert!(matches!(run(&config), Err(LangError::Svg(_))));
    }

    #[test]
    fn missing_input_is_a_read_error() {
        let config = SplitConfig {
            input: PathBuf::from("/nonexistent/codex.svg"),
            ..SplitConfig::default()
        };

        assert!(matches!(run(&config), Err(LangError::Read { .. })));
    }
}
