//! Zotero Web API client.
//!
//! Provides async HTTP client with:
//! - Connection pooling via reqwest
//! - Retry middleware with exponential backoff for transient failures
//! - A fixed politeness delay before each request
//!
//! The client only moves pages of raw JSON; validation happens in the fetcher.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde_json::Value;
use url::Url;

use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};
use crate::fetcher::{CollectionScope, PageRequest, PageSource};

/// Zotero Web API client.
#[derive(Clone)]
pub struct ZoteroClient {
    /// HTTP client with middleware.
    client: ClientWithMiddleware,

    /// API key (optional).
    api_key: Option<String>,

    /// API base URL.
    base_url: Url,

    /// Items per page.
    page_size: usize,

    /// Delay slept before each request.
    request_delay: Duration,
}

impl ZoteroClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid or HTTP client initialization fails.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        config.validate()?;

        let base_url = Url::parse(&config.api_base_url)?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("API base URL cannot carry a path: {}", config.api_base_url);
        }

        let mut headers = HeaderMap::new();
        headers.insert("Zotero-API-Version", HeaderValue::from_static(api::API_VERSION));

        if let Some(ref key) = config.api_key {
            let mut value = HeaderValue::from_str(key)?;
            value.set_sensitive(true);
            headers.insert("Zotero-API-Key", value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(api::MAX_KEEPALIVE)
            .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
            .gzip(true)
            .build()?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_secs(1), Duration::from_secs(30))
            .build_with_max_retries(config.max_retries);

        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            api_key: config.api_key,
            base_url,
            page_size: config.page_size,
            request_delay: config.request_delay,
        })
    }

    /// Check if an API key is configured.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Items requested per page.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Items endpoint for a group library or one of its collections.
    #[must_use]
    pub fn items_url(&self, scope: &CollectionScope) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("groups").push(&scope.group_id);
            if let Some(collection_id) = &scope.collection_id {
                segments.push("collections").push(collection_id);
            }
            segments.push("items");
        }
        url
    }

    /// Fetch one page of raw items.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, non-success status, or a body that is not a
    /// JSON array.
    pub async fn get_items_page(&self, request: &PageRequest) -> ClientResult<Vec<Value>> {
        let url = self.items_url(&request.scope);

        let params = vec![
            ("format".to_string(), "json".to_string()),
            ("include".to_string(), "data".to_string()),
            ("itemType".to_string(), request.item_types.clone()),
            ("limit".to_string(), request.limit.to_string()),
            ("start".to_string(), request.start.to_string()),
        ];

        match self.get(url, &params).await? {
            Value::Array(items) => Ok(items),
            other => Err(ClientError::NotAnArray { found: json_type_name(&other) }),
        }
    }

    /// Make a GET request and parse the body as JSON.
    async fn get(&self, url: Url, params: &[(String, String)]) -> ClientResult<Value> {
        // Politeness delay
        tokio::time::sleep(self.request_delay).await;

        let response = self.client.get(url).query(params).send().await?;

        if let Some(backoff) = response.headers().get("Backoff").and_then(|v| v.to_str().ok()) {
            tracing::warn!(seconds = backoff, "Zotero API asked clients to back off");
        }
        if let Some(total) = response.headers().get("Total-Results").and_then(|v| v.to_str().ok())
        {
            tracing::trace!(total, "Collection size reported by API");
        }

        let response = self.handle_response(response).await?;
        let body = response.bytes().await?;

        serde_json::from_slice(&body).map_err(ClientError::from)
    }

    /// Handle API response status codes.
    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> ClientResult<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        match status.as_u16() {
            429 => {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60);

                tracing::warn!(retry_after, "Rate limited by Zotero API");
                Err(ClientError::rate_limited(retry_after))
            }
            403 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::forbidden(text))
            }
            404 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::not_found(text))
            }
            400 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::bad_request(text))
            }
            500..=599 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::server(status.as_u16(), text))
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::UnexpectedStatus { status: status.as_u16(), message: text })
            }
        }
    }
}

#[async_trait::async_trait]
impl PageSource for ZoteroClient {
    async fn fetch_page(&self, request: &PageRequest) -> ClientResult<Vec<Value>> {
        self.get_items_page(request).await
    }
}

impl std::fmt::Debug for ZoteroClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoteroClient")
            .field("base_url", &self.base_url.as_str())
            .field("has_api_key", &self.has_api_key())
            .field("page_size", &self.page_size)
            .finish()
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
