use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// Response from `GET /w/api.php?action=query&prop=extracts`.
///
/// Every level is optional: a missing title or an unexpected shape
/// simply yields no extract.
#[derive(Deserialize, Debug, Default)]
pub struct QueryResponse {
    #[serde(default)]
    pub query: Option<Query>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Query {
    /// Sent as an object keyed by page id (`-1` for titles that do not
    /// exist); kept in the order the response lists them.
    #[serde(default, deserialize_with = "pages_in_order")]
    pub pages: Vec<Page>,
}

#[derive(Deserialize, Debug)]
pub struct Page {
    pub title: Option<String>,
    pub extract: Option<String>,
}

impl QueryResponse {
    /// The lead-section extract of the first page that has one.
    pub fn into_extract(self) -> String {
        self.query
            .into_iter()
            .flat_map(|q| q.pages)
            .find_map(|page| page.extract)
            .unwrap_or_default()
    }
}

fn pages_in_order<'de, D>(deserializer: D) -> Result<Vec<Page>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PagesVisitor;

    impl<'de> Visitor<'de> for PagesVisitor {
        type Value = Vec<Page>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of page id to page")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut pages = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((_id, page)) = map.next_entry::<String, Page>()? {
                pages.push(page);
            }
            Ok(pages)
        }
    }

    deserializer.deserialize_map(PagesVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_extract_from_first_page_with_one() {
        let body: QueryResponse = serde_json::from_str(
            r#"{"query":{"pages":{"-1":{"title":"Nope","missing":""},"42":{"title":"Anchoring","extract":"<p>Lead</p>"}}}}"#,
        )
        .unwrap();
        assert_eq!(body.into_extract(), "<p>Lead</p>");
    }

    #[test]
    fn pages_keep_response_order() {
        let body: QueryResponse = serde_json::from_str(
            r#"{"query":{"pages":{"10":{"extract":"ten"},"9":{"extract":"nine"}}}}"#,
        )
        .unwrap();
        assert_eq!(body.into_extract(), "ten");
    }

    #[test]
    fn missing_query_is_empty() {
        let body: QueryResponse = serde_json::from_str(r#"{"batchcomplete":""}"#).unwrap();
        assert_eq!(body.into_extract(), "");
    }

    #[test]
    fn page_without_extract_is_empty() {
        let body: QueryResponse =
            serde_json::from_str(r#"{"query":{"pages":{"7":{"title":"Stub"}}}}"#).unwrap();
        assert_eq!(body.into_extract(), "");
    }
}
