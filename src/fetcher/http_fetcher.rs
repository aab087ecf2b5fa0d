use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;

use crate::app::{Result, ScoutError};
use crate::fetcher::{FetchResult, Fetcher, HttpConfig};

const ACCEPT_FEEDS: &str = "application/rss+xml, application/atom+xml, application/xml;q=0.9, \
                            text/html;q=0.8, */*;q=0.5";

pub struct HttpFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .gzip(true)
            .brotli(true)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
        })
    }

    fn map_request_error(url: &str, err: reqwest::Error) -> ScoutError {
        if err.is_timeout() {
            ScoutError::Timeout {
                url: url.to_string(),
            }
        } else {
            ScoutError::Http(err)
        }
    }
}

/// A declared length that does not even fit in `usize` is over any cap.
fn exceeds_cap(declared: u64, max_body_bytes: usize) -> bool {
    usize::try_from(declared).map_or(true, |len| len > max_body_bytes)
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResult> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, ACCEPT_FEEDS)
            .send()
            .await
            .map_err(|e| Self::map_request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScoutError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if response
            .content_length()
            .is_some_and(|len| exceeds_cap(len, self.max_body_bytes))
        {
            return Err(ScoutError::TooLarge {
                url: url.to_string(),
            });
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_ascii_lowercase());

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Self::map_request_error(url, e))?;
            if body.len().saturating_add(chunk.len()) > self.max_body_bytes {
                return Err(ScoutError::TooLarge {
                    url: url.to_string(),
                });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(FetchResult {
            final_url,
            content_type,
            body,
        })
    }
}
