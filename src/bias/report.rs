use std::path::Path;

use quick_xml::escape::escape;

use super::{BiasEntry, BiasError};

const LICENSE_URL: &str = "https://creativecommons.org/licenses/by-sa/3.0/";

/// Render the biases as a static HTML page, one `<div class='bias'>` each.
///
/// Label and link are escaped. The summary is Wikipedia's extract HTML and is
/// inserted as markup.
pub fn render(entries: &[BiasEntry]) -> String {
    let mut html = String::from("<html><body>\n");
    for entry in entries {
        let label = escape(entry.label.as_str());
        let link = escape(entry.link.as_str());
        html.push_str("<div class='bias'>\n");
        html.push_str(&format!("<h2>{label}</h2>\n"));
        html.push_str(&format!("<a href='{link}' target='_blank'>Wikipedia Link</a>\n"));
        html.push_str(&format!("<div class='content'>{}</div>\n", entry.summary));
        html.push_str(&format!(
            "<div class='attribution'>Content from <a href='{link}'>Wikipedia</a>, licensed under <a href='{LICENSE_URL}'>CC BY-SA 3.0</a></div>\n"
        ));
        html.push_str("</div>\n");
    }
    html.push_str("</body></html>\n");
    html
}

pub fn save_report(entries: &[BiasEntry], path: &Path) -> Result<(), BiasError> {
    std::fs::write(path, render(entries)).map_err(|source| BiasError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_is_bare_wrapper() {
        assert_eq!(render(&[]), "<html><body>\n</body></html>\n");
    }

    #[test]
    fn renders_one_block_per_entry() {
        let entries = [
            BiasEntry::new("Anchoring", "https://en.wikipedia.org/wiki/Anchoring_bias")
                .with_summary("<p><b>Anchoring</b> is a bias.</p>".to_string()),
            BiasEntry::new("Framing", "https://en.wikipedia.org/wiki/Framing_effect"),
        ];

        let html = render(&entries);

        assert_eq!(html.matches("<div class='bias'>").count(), 2);
        assert!(html.starts_with("<html><body>\n<div class='bias'>\n<h2>Anchoring</h2>\n"));
        assert!(html.contains(
            "<a href='https://en.wikipedia.org/wiki/Anchoring_bias' target='_blank'>Wikipedia Link</a>\n"
        ));
        assert!(html.contains("<div class='content'><p><b>Anchoring</b> is a bias.</p></div>\n"));
        assert!(html.contains("<div class='content'></div>\n"));
        assert!(html.contains(
            "Content from <a href='https://en.wikipedia.org/wiki/Framing_effect'>Wikipedia</a>, licensed under <a href='https://creativecommons.org/licenses/by-sa/3.0/'>CC BY-SA 3.0</a>"
        ));
        assert!(html.ends_with("</div>\n</body></html>\n"));
    }

    #[test]
    fn escapes_label_and_link() {
        let entries = [BiasEntry::new(
            "<script>alert(1)</script>",
            "/wiki/It's_a_trap",
        )];

        let html = render(&entries);

        assert!(html.contains("<h2>&lt;script&gt;alert(1)&lt;/script&gt;</h2>"));
        assert!(html.contains("href='/wiki/It&apos;s_a_trap'"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn save_report_writes_rendered_html() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("biases_output.html");
        let entries = [BiasEntry::new("Anchoring", "/wiki/Anchoring_bias")];

        save_report(&entries, &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), render(&entries));
    }

    #[test]
    fn save_report_fails_for_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.html");
        assert!(matches!(
            save_report(&[], &path),
            Err(BiasError::Write { .. })
        ));
    }
}
