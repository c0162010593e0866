//! HTTP client for source fetches
//!
//! Wraps a `reqwest::Client` that is built once per process and handed to
//! the pipeline, so every invocation reuses the same connection pool.

use crate::error::Result;
use crate::types::JsonValue;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Outcome of a single GET
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchResult {
    /// True iff the status is 2xx
    pub ok: bool,
    /// HTTP status code
    pub status: u16,
    /// Parsed JSON body, `null` when the body was empty
    pub body: JsonValue,
}

impl FetchResult {
    /// Body to normalize, or `None` when the fetch should yield no records
    pub fn usable_body(&self) -> Option<&JsonValue> {
        if self.ok && !self.body.is_null() {
            Some(&self.body)
        } else {
            None
        }
    }
}

/// HTTP client used by the fetch step
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a client with reqwest defaults and no extra headers
    pub fn new() -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client })
    }

    /// GET a URL and parse its body as JSON
    ///
    /// A non-2xx status is not an error: it is reported through
    /// [`FetchResult::ok`]. Connection failures and an unparseable 2xx body
    /// are.
    pub async fn fetch(&self, url: &str) -> Result<FetchResult> {
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        let ok = status.is_success();

        let body = if bytes.is_empty() {
            JsonValue::Null
        } else if ok {
            serde_json::from_slice(&bytes)?
        } else {
            // Error pages are often HTML; the body is never normalized anyway
            serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null)
        };

        if ok {
            debug!(
                "GET {} -> {} ({} bytes)",
                url,
                status.as_u16(),
                bytes.len()
            );
        } else {
            warn!("GET {} returned {}", url, status.as_u16());
        }

        Ok(FetchResult {
            ok,
            status: status.as_u16(),
            body,
        })
    }
}
