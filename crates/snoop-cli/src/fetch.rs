//! Requesting resolved chunk files from a live site.
//!
//! Every chunk file is fetched once with a GET request built from the configured base URL. At
//! most `threads` requests are in flight at a time; responses are handed to a single consumer in
//! completion order so progress lines never interleave.

use std::fmt;
use std::sync::Arc;

use reqwest::header::HeaderMap;
use reqwest::{Client, Proxy, StatusCode};
use serde::Serialize;
use snoop_core::ChunkEntry;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::{SnoopConfig, parse_header};
use crate::error::{CliError, Result};

/// What happened to one chunk request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchOutcome {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP GET {}: ", self.url)?;
        match (self.status, &self.error) {
            (Some(code), _) => match StatusCode::from_u16(code) {
                Ok(status) => write!(f, "{status}"),
                Err(_) => write!(f, "{code}"),
            },
            (None, Some(error)) => write!(f, "failed ({error})"),
            (None, None) => f.write_str("no response"),
        }
    }
}

/// Join a base URL and a chunk file with exactly one slash between them.
pub fn chunk_url(base_url: &str, file: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        file.trim_start_matches('/')
    )
}

/// HTTP client for chunk requests.
pub struct Fetcher {
    client: Client,
    base_url: String,
    limit: Arc<Semaphore>,
}

impl Fetcher {
    /// Build a fetcher for `base_url` with the proxy, headers, TLS and concurrency settings of
    /// `config`.
    pub fn new(config: &SnoopConfig, base_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        for header in &config.headers {
            let (name, value) = parse_header(header)?;
            headers.append(name, value);
        }

        let mut builder = Client::builder()
            .default_headers(headers)
            .danger_accept_invalid_certs(config.insecure);
        builder = match &config.proxy {
            Some(proxy) => builder.proxy(Proxy::all(proxy.as_str()).map_err(CliError::HttpClient)?),
            None => builder.no_proxy(),
        };
        let client = builder.build().map_err(CliError::HttpClient)?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            limit: Arc::new(Semaphore::new(config.threads.max(1))),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request every entry's file.
    ///
    /// `on_response` is called once per request, from this task, in completion order. The
    /// returned outcomes follow the order of `entries`.
    pub async fn fetch_all<F>(&self, entries: &[ChunkEntry], mut on_response: F) -> Result<Vec<FetchOutcome>>
    where
        F: FnMut(&FetchOutcome),
    {
        let mut join_set = JoinSet::new();
        for (index, entry) in entries.iter().enumerate() {
            let url = chunk_url(&self.base_url, &entry.file);
            let client = self.client.clone();
            let limit = Arc::clone(&self.limit);

            join_set.spawn(async move {
                let outcome = match limit.acquire_owned().await {
                    Ok(_permit) => get(&client, url).await,
                    Err(_) => FetchOutcome {
                        url,
                        status: None,
                        error: Some("request limiter closed".to_string()),
                    },
                };
                (index, outcome)
            });
        }

        let mut outcomes = vec![None; entries.len()];
        while let Some(joined) = join_set.join_next().await {
            let (index, outcome) =
                joined.map_err(|e| CliError::Runtime(format!("chunk request task failed: {e}")))?;
            on_response(&outcome);
            outcomes[index] = Some(outcome);
        }
        Ok(outcomes.into_iter().flatten().collect())
    }
}

async fn get(client: &Client, url: String) -> FetchOutcome {
    let response = match client.get(&url).send().await {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(url = %url, error = %err, "chunk request failed");
            return FetchOutcome {
                url,
                status: None,
                error: Some(err.to_string()),
            };
        }
    };

    let status = response.status();
    // Drain the body so the whole exchange goes through any intercepting proxy.
    if let Err(err) = response.bytes().await {
        tracing::debug!(url = %url, error = %err, "failed to read chunk body");
    }
    tracing::debug!(url = %url, status = status.as_u16(), "chunk requested");

    FetchOutcome {
        url,
        status: Some(status.as_u16()),
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_url_joins_with_one_slash() {
        assert_eq!(
            chunk_url("https://example.com", "static/js/1.js"),
            "https://example.com/static/js/1.js"
        );
        assert_eq!(
            chunk_url("https://example.com//", "//static/js/1.js"),
            "https://example.com/static/js/1.js"
        );
        assert_eq!(chunk_url("https://example.com/app/", "a.js"), "https://example.com/app/a.js");
    }

    #[test]
    fn test_outcome_display() {
        let ok = FetchOutcome {
            url: "https://example.com/a.js".into(),
            status: Some(404),
            error: None,
        };
        assert_eq!(ok.to_string(), "HTTP GET https://example.com/a.js: 404 Not Found");

        let failed = FetchOutcome {
            url: "https://example.com/a.js".into(),
            status: None,
            error: Some("connection refused".into()),
        };
        assert_eq!(
            failed.to_string(),
            "HTTP GET https://example.com/a.js: failed (connection refused)"
        );
    }

    #[test]
    fn test_fetcher_rejects_bad_header() {
        let config = SnoopConfig {
            headers: vec!["broken".into()],
            ..SnoopConfig::default()
        };
        assert!(Fetcher::new(&config, "https://example.com").is_err());
    }

    #[tokio::test]
    async fn test_unreachable_host_reports_failure_per_entry() {
        let config = SnoopConfig {
            threads: 2,
            ..SnoopConfig::default()
        };
        // Port 9 on localhost is the discard service; nothing listens there in test sandboxes.
        let fetcher = Fetcher::new(&config, "http://127.0.0.1:9/").unwrap();
        let entries = vec![
            ChunkEntry::new(snoop_core::ChunkId::bare("0"), "a.js"),
            ChunkEntry::new(snoop_core::ChunkId::bare("1"), "/b.js"),
        ];

        let mut seen = 0;
        let outcomes = fetcher.fetch_all(&entries, |_| seen += 1).await.unwrap();
        assert_eq!(seen, 2);
        assert_eq!(outcomes[0].url, "http://127.0.0.1:9/a.js");
        assert_eq!(outcomes[1].url, "http://127.0.0.1:9/b.js");
        assert!(outcomes.iter().all(|outcome| outcome.status.is_none()));
    }
}
