//! OpenAlexAgent - scholarly citation lookup against the OpenAlex works
//! API.
//!
//! Best-effort enrichment: any failure (transport, non-2xx, malformed
//! body, empty topic) degrades to an empty list and is logged at `warn`.
//! Results are requested ranked by relevance and capped by the caller's
//! limit.

use reqwest::Client;
use scriba_core::citation::Citation;
use scriba_core::error::{Result, ScribaError};
use scriba_core::generation::CitationSource;
use serde::Deserialize;

const BASE_URL: &str = "https://api.openalex.org";

/// Citation source backed by the OpenAlex works search endpoint.
#[derive(Clone)]
pub struct OpenAlexAgent {
    client: Client,
    base_url: String,
}

impl OpenAlexAgent {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Overrides the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn try_fetch(&self, topic: &str, limit: usize) -> Result<Vec<Citation>> {
        let per_page = limit.to_string();
        let response = self
            .client
            .get(format!("{}/works", self.base_url))
            .query(&[
                ("search", topic),
                ("per_page", per_page.as_str()),
                ("sort", "relevance_score:desc"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ScribaError::network(format!(
                "OpenAlex returned {}",
                response.status()
            )));
        }

        let payload: WorksResponse = response
            .json()
            .await
            .map_err(|err| ScribaError::network(format!("failed to parse OpenAlex body: {err}")))?;

        Ok(payload
            .results
            .into_iter()
            .take(limit)
            .map(Work::into_citation)
            .collect())
    }
}

impl Default for OpenAlexAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CitationSource for OpenAlexAgent {
    async fn fetch_citations(&self, topic: &str, limit: usize) -> Vec<Citation> {
        if topic.trim().is_empty() {
            return Vec::new();
        }

        match self.try_fetch(topic, limit).await {
            Ok(citations) => citations,
            Err(err) => {
                tracing::warn!("citation fetch failed, continuing without: {err}");
                Vec::new()
            }
        }
    }
}

#[derive(Deserialize)]
struct WorksResponse {
    #[serde(default)]
    results: Vec<Work>,
}

#[derive(Deserialize)]
struct Work {
    #[serde(default)]
    authorships: Vec<Authorship>,
    publication_year: Option<i32>,
    title: Option<String>,
    host_venue: Option<HostVenue>,
    doi: Option<String>,
}

#[derive(Deserialize)]
struct Authorship {
    author: Author,
}

#[derive(Deserialize)]
struct Author {
    display_name: Option<String>,
}

#[derive(Deserialize)]
struct HostVenue {
    display_name: Option<String>,
}

impl Work {
    fn into_citation(self) -> Citation {
        Citation {
            authors: self
                .authorships
                .into_iter()
                .filter_map(|authorship| authorship.author.display_name)
                .collect(),
            year: self.publication_year,
            title: self.title.unwrap_or_else(|| "Untitled".to_string()),
            venue: self.host_venue.and_then(|venue| venue.display_name),
            doi: self.doi,
        }
    }
}
