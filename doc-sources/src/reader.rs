//! Source readers producing chunked pages.

use std::time::Duration;

use async_trait::async_trait;
use doc_index::{DEFAULT_MAX_CHARS, PageText, chunk_pages};
use reqwest::Url;
use tracing::{info, instrument};

use crate::errors::SourceError;
use crate::html::html_to_text;

/// Turns a path or URL into an ordered sequence of chunked pages.
///
/// Implementations own their extraction details but share the chunking
/// policy; an empty document yields an empty sequence, not an error.
#[async_trait]
pub trait SourceReader: Send + Sync {
    async fn read(&self, target: &str) -> Result<Vec<PageText>, SourceError>;
}

/// Fetches a web page and chunks its tag-stripped text.
pub struct WebPageReader {
    client: reqwest::Client,
    max_chars: usize,
}

impl WebPageReader {
    pub fn new(timeout_secs: u64) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            max_chars: DEFAULT_MAX_CHARS,
        })
    }
}

#[async_trait]
impl SourceReader for WebPageReader {
    #[instrument(skip(self))]
    async fn read(&self, target: &str) -> Result<Vec<PageText>, SourceError> {
        let target = target.trim();
        if target.is_empty() {
            return Err(SourceError::EmptyTarget);
        }
        let url = Url::parse(target).map_err(|_| SourceError::InvalidUrl(target.to_string()))?;

        let resp = self.client.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(SourceError::HttpStatus {
                status: resp.status(),
                url: target.to_string(),
            });
        }

        let html = resp.text().await?;
        let text = html_to_text(&html);
        let pages = chunk_pages(&text, self.max_chars);

        info!(
            target: "doc_sources::web",
            chunks = pages.len(),
            "web page loaded"
        );
        Ok(pages)
    }
}

/// Reads a UTF-8 text file and chunks it.
///
/// Stands in for document formats whose extraction already happened upstream
/// (or is handled by an injected reader).
pub struct PlainTextReader {
    max_chars: usize,
}

impl PlainTextReader {
    pub fn new() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

impl Default for PlainTextReader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceReader for PlainTextReader {
    #[instrument(skip(self))]
    async fn read(&self, target: &str) -> Result<Vec<PageText>, SourceError> {
        let target = target.trim();
        if target.is_empty() {
            return Err(SourceError::EmptyTarget);
        }
        let text = tokio::fs::read_to_string(target).await?;
        Ok(chunk_pages(&text, self.max_chars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn web_reader_rejects_blank_and_invalid_targets() {
        let reader = WebPageReader::new(5).unwrap();
        assert!(matches!(
            reader.read("  ").await.unwrap_err(),
            SourceError::EmptyTarget
        ));
        assert!(matches!(
            reader.read("not a url").await.unwrap_err(),
            SourceError::InvalidUrl(_)
        ));
    }

    #[tokio::test]
    async fn plain_text_reader_chunks_a_file() {
        let dir = std::env::temp_dir();
        let path = dir.join("doc_sources_reader_test.txt");
        tokio::fs::write(&path, "The refund policy allows returns within 30 days.")
            .await
            .unwrap();

        let reader = PlainTextReader::new();
        let pages = reader.read(path.to_str().unwrap()).await.unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].page_number, 1);
        assert!(pages[0].text.contains("refund policy"));

        tokio::fs::remove_file(&path).await.ok();
    }

    #[tokio::test]
    async fn plain_text_reader_reports_missing_files() {
        let reader = PlainTextReader::new();
        assert!(matches!(
            reader.read("/definitely/not/here.txt").await.unwrap_err(),
            SourceError::Io(_)
        ));
    }
}
