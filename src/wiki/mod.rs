pub mod types;

use std::env;

use percent_encoding::percent_decode_str;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use types::QueryResponse;

const API_URL: &str = "https://en.wikipedia.org/w/api.php";

#[derive(Debug, thiserror::Error)]
pub enum WikiError {
    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Wikipedia API error: status {0}")]
    Status(u16),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Source of lead-section summaries for a bias link.
/// Implemented by `WikiClient`; tests substitute an in-memory source.
pub trait SummarySource {
    async fn fetch_summary(&self, link: &str) -> Result<String, WikiError>;
}

/// Client for the MediaWiki query API (`prop=extracts`).
///
/// The endpoint defaults to English Wikipedia and can be overridden with
/// `WIKI_API_URL`. No retries and no request timeout beyond the client's.
#[derive(Clone)]
pub struct WikiClient {
    http: Client,
    api_url: String,
}

impl WikiClient {
    pub fn from_env(http: Client) -> Result<Self, WikiError> {
        let api_url = env::var("WIKI_API_URL")
            .ok()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| API_URL.to_string());
        Url::parse(&api_url)?;
        if api_url != API_URL {
            debug!(%api_url, "using custom Wikipedia endpoint");
        }
        Ok(Self { http, api_url })
    }

    #[cfg(test)]
    pub(crate) fn with_api_url(http: Client, api_url: &str) -> Self {
        Self {
            http,
            api_url: api_url.to_string(),
        }
    }

    fn query_url(&self, title: &str) -> Result<Url, WikiError> {
        Ok(Url::parse_with_params(
            &self.api_url,
            [
                ("action", "query"),
                ("format", "json"),
                ("prop", "extracts"),
                ("titles", title),
                ("exintro", "true"),
                ("redirects", "true"),
            ],
        )?)
    }
}

impl SummarySource for WikiClient {
    async fn fetch_summary(&self, link: &str) -> Result<String, WikiError> {
        let title = article_title(link);
        let url = self.query_url(&title)?;

        let response = self
            .http
            .get(url)
            .header("User-Agent", crate::USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, %title, "Wikipedia API error");
            return Err(WikiError::Status(status.as_u16()));
        }

        let body: QueryResponse = response.json().await?;
        let extract = body.into_extract();
        if extract.is_empty() {
            debug!(%title, "no extract returned");
        } else {
            debug!(%title, bytes = extract.len(), "extract fetched");
        }
        Ok(extract)
    }
}

/// The raw part of a bias link after the last `/wiki/`, or the whole link
/// when there is none.
pub fn link_segment(link: &str) -> &str {
    link.rsplit("/wiki/").next().unwrap_or(link)
}

/// Article title from a bias link: `link_segment` without fragment,
/// percent-decoded.
pub fn article_title(link: &str) -> String {
    let tail = link_segment(link);
    let tail = tail.split('#').next().unwrap_or(tail);
    percent_decode_str(tail).decode_utf8_lossy().into_owned()
}
