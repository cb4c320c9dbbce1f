//! Collection fetcher: pages through a collection and validates every item.
//!
//! Pagination is strictly sequential. A page shorter than the requested limit ends the
//! collection, so a collection whose size is a multiple of the page size costs one extra
//! (empty) request. Any transport or validation failure aborts the whole fetch.

use async_stream::try_stream;
use futures::{Stream, TryStreamExt};
use serde_json::Value;

use crate::client::ZoteroClient;
use crate::config::Config;
use crate::error::{ClientResult, ConfigError, FetchError, FetchResult, ValidationError};
use crate::models::{ItemType, ValidatedRecord, is_note};

/// Which items to fetch: a whole group library or one collection in it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionScope {
    /// Zotero group ID.
    pub group_id: String,

    /// Collection key within the group; `None` means the whole library.
    pub collection_id: Option<String>,
}

impl CollectionScope {
    /// Scope covering one collection of a group.
    #[must_use]
    pub fn collection(group_id: impl Into<String>, collection_id: impl Into<String>) -> Self {
        Self { group_id: group_id.into(), collection_id: Some(collection_id.into()) }
    }

    /// Scope covering a group's whole library.
    #[must_use]
    pub fn library(group_id: impl Into<String>) -> Self {
        Self { group_id: group_id.into(), collection_id: None }
    }
}

/// One page request as seen by a [`PageSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Library or collection being paged.
    pub scope: CollectionScope,

    /// Offset of the first item on the page.
    pub start: usize,

    /// Maximum items on the page.
    pub limit: usize,

    /// Server-side item type filter (`"book || bookSection || ..."`).
    pub item_types: String,
}

/// Anything that can return one page of raw items.
///
/// [`ZoteroClient`] is the HTTP implementation.
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the raw items of one page, in API order.
    async fn fetch_page(&self, request: &PageRequest) -> ClientResult<Vec<Value>>;
}

#[async_trait::async_trait]
impl<T: PageSource + ?Sized> PageSource for std::sync::Arc<T> {
    async fn fetch_page(&self, request: &PageRequest) -> ClientResult<Vec<Value>> {
        (**self).fetch_page(request).await
    }
}

/// A validated page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// Offset the page was requested at.
    pub start: usize,

    /// Number of raw items returned, notes included.
    pub raw_len: usize,

    /// Number of notes dropped before validation.
    pub notes_dropped: usize,

    /// Validated records in page order.
    pub records: Vec<ValidatedRecord>,

    /// Whether this page ended the collection.
    pub is_last: bool,
}

impl FetchedPage {
    /// Drop notes from a raw page and validate the rest as one batch.
    ///
    /// Fails on the first invalid item. `is_last` is decided from the raw length,
    /// so notes still count towards the page limit.
    pub fn validate(
        raw: &[Value],
        start: usize,
        page_size: usize,
    ) -> Result<Self, ValidationError> {
        let mut records = Vec::with_capacity(raw.len());
        let mut notes_dropped = 0;

        for (index, item) in raw.iter().enumerate() {
            if is_note(item) {
                notes_dropped += 1;
                continue;
            }
            records.push(ValidatedRecord::from_raw(item, start, index)?);
        }

        Ok(Self {
            start,
            raw_len: raw.len(),
            notes_dropped,
            records,
            is_last: raw.len() < page_size,
        })
    }
}

/// Fetches and validates every record in a collection.
#[derive(Debug, Clone)]
pub struct CollectionFetcher<S> {
    source: S,
    page_size: usize,
}

impl CollectionFetcher<ZoteroClient> {
    /// Build a fetcher over a new HTTP client.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let client = ZoteroClient::new(config)?;
        let page_size = client.page_size();
        Ok(Self::new(client, page_size)?)
    }
}

impl<S: PageSource> CollectionFetcher<S> {
    /// Create a fetcher over `source`, requesting `page_size` items per page.
    pub fn new(source: S, page_size: usize) -> Result<Self, ConfigError> {
        if page_size == 0 {
            return Err(ConfigError::InvalidPageSize(page_size));
        }
        Ok(Self { source, page_size })
    }

    /// Items requested per page.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// The underlying page source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Stream validated pages in fetch order.
    ///
    /// The stream ends after the first short page, or after the first error.
    /// Dropping it cancels any in-flight request.
    pub fn pages<'a>(
        &'a self,
        scope: &'a CollectionScope,
    ) -> impl Stream<Item = FetchResult<FetchedPage>> + 'a {
        let page_size = self.page_size;
        let item_types = ItemType::query_filter();

        try_stream! {
            let mut start = 0;
            loop {
                let request = PageRequest {
                    scope: scope.clone(),
                    start,
                    limit: page_size,
                    item_types: item_types.clone(),
                };

                let raw = self
                    .source
                    .fetch_page(&request)
                    .await
                    .map_err(|e| FetchError::transport(start, e))?;

                let page = FetchedPage::validate(&raw, start, page_size).map_err(FetchError::from)?;

                tracing::debug!(
                    start,
                    raw = page.raw_len,
                    records = page.records.len(),
                    notes = page.notes_dropped,
                    "Fetched page"
                );

                let is_last = page.is_last;
                yield page;

                if is_last {
                    break;
                }
                start += page_size;
            }
        }
    }

    /// Fetch every record in scope, in page order.
    ///
    /// All-or-nothing: on error no records are returned.
    pub async fn fetch(&self, scope: &CollectionScope) -> FetchResult<Vec<ValidatedRecord>> {
        let pages = self.pages(scope);
        futures::pin_mut!(pages);

        let mut records = Vec::new();
        let mut page_count = 0usize;
        let mut notes_dropped = 0usize;

        while let Some(page) = pages.try_next().await? {
            page_count += 1;
            notes_dropped += page.notes_dropped;
            records.extend(page.records);
        }

        tracing::info!(
            group = %scope.group_id,
            collection = scope.collection_id.as_deref().unwrap_or("<library>"),
            records = records.len(),
            pages = page_count,
            notes_dropped,
            "Fetched collection"
        );

        Ok(records)
    }
}

/// Fetch a collection of a group over HTTP with the given configuration.
///
/// Pass `None` as `collection_id` to fetch the whole group library.
pub async fn fetch_collection(
    config: Config,
    collection_id: Option<&str>,
    group_id: &str,
) -> anyhow::Result<Vec<ValidatedRecord>> {
    let fetcher = CollectionFetcher::from_config(config)?;
    let scope = CollectionScope {
        group_id: group_id.to_string(),
        collection_id: collection_id.map(str::to_string),
    };
    Ok(fetcher.fetch(&scope).await?)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::error::ClientError;

    /// In-memory collection that records each requested cursor.
    #[derive(Debug)]
    struct FakeCollection {
        items: Vec<Value>,
        requests: Mutex<Vec<usize>>,
    }

    impl FakeCollection {
        fn new(items: Vec<Value>) -> Self {
            Self { items, requests: Mutex::new(Vec::new()) }
        }

        fn requested_starts(&self) -> Vec<usize> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl PageSource for FakeCollection {
        async fn fetch_page(&self, request: &PageRequest) -> ClientResult<Vec<Value>> {
            self.requests.lock().unwrap().push(request.start);
            let end = (request.start + request.limit).min(self.items.len());
            let start = request.start.min(end);
            Ok(self.items[start..end].to_vec())
        }
    }

    fn item(key: &str) -> Value {
        json!({
            "key": key,
            "data": {
                "key": key,
                "version": 1,
                "itemType": "preprint",
                "title": format!("Paper {key}"),
                "creators": [],
                "abstractNote": "",
                "tags": []
            }
        })
    }

    fn note(key: &str) -> Value {
        json!({"key": key, "data": {"key": key, "itemType": "note", "note": "<p>hi</p>"}})
    }

    fn keys(records: &[ValidatedRecord]) -> Vec<&str> {
        records.iter().map(|r| r.key.as_str()).collect()
    }

    #[tokio::test]
    async fn test_partial_last_page() {
        let items = (0..5).map(|i| item(&format!("K{i}"))).collect();
        let fetcher = CollectionFetcher::new(FakeCollection::new(items), 2).unwrap();

        let records = fetcher.fetch(&CollectionScope::library("1")).await.unwrap();

        assert_eq!(keys(&records), ["K0", "K1", "K2", "K3", "K4"]);
        assert_eq!(fetcher.source().requested_starts(), [0, 2, 4]);
    }

    #[tokio::test]
    async fn test_exact_multiple_issues_extra_request() {
        let items = (0..4).map(|i| item(&format!("K{i}"))).collect();
        let fetcher = CollectionFetcher::new(FakeCollection::new(items), 2).unwrap();

        let records = fetcher.fetch(&CollectionScope::library("1")).await.unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(fetcher.source().requested_starts(), [0, 2, 4]);
    }

    #[tokio::test]
    async fn test_empty_collection_single_request() {
        let fetcher = CollectionFetcher::new(FakeCollection::new(Vec::new()), 100).unwrap();

        let records = fetcher.fetch(&CollectionScope::collection("1", "ABC")).await.unwrap();

        assert!(records.is_empty());
        assert_eq!(fetcher.source().requested_starts(), [0]);
    }

    #[tokio::test]
    async fn test_notes_count_towards_page_length() {
        // Page 1 is full only because of the note; it must not end pagination.
        let items = vec![item("A"), note("N1"), item("B")];
        let fetcher = CollectionFetcher::new(FakeCollection::new(items), 2).unwrap();

        let records = fetcher.fetch(&CollectionScope::library("1")).await.unwrap();

        assert_eq!(keys(&records), ["A", "B"]);
        assert_eq!(fetcher.source().requested_starts(), [0, 2]);
    }

    #[tokio::test]
    async fn test_invalid_item_fails_whole_fetch() {
        let mut bad = item("BAD");
        bad["data"]["itemType"] = json!("attachment");
        let items = vec![item("A"), item("B"), bad];
        let fetcher = CollectionFetcher::new(FakeCollection::new(items), 2).unwrap();

        let err = fetcher.fetch(&CollectionScope::library("1")).await.unwrap_err();

        assert_eq!(err.item_key(), Some("BAD"));
        match err {
            FetchError::Validation(v) => {
                assert_eq!(v.start, 2);
                assert_eq!(v.index, 0);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transport_error_aborts() {
        struct Failing;

        #[async_trait::async_trait]
        impl PageSource for Failing {
            async fn fetch_page(&self, request: &PageRequest) -> ClientResult<Vec<Value>> {
                if request.start == 0 {
                    Ok(vec![json!({"data": {"key": "A", "itemType": "note"}})])
                } else {
                    Err(ClientError::server(503, "unavailable"))
                }
            }
        }

        let fetcher = CollectionFetcher::new(Failing, 1).unwrap();
        let err = fetcher.fetch(&CollectionScope::library("1")).await.unwrap_err();

        assert!(matches!(err, FetchError::Transport { start: 1, .. }));
    }

    #[tokio::test]
    async fn test_pages_stream_reports_page_metadata() {
        let items = vec![item("A"), note("N"), item("B")];
        let fetcher = CollectionFetcher::new(FakeCollection::new(items), 2).unwrap();
        let scope = CollectionScope::library("1");

        let pages: Vec<FetchedPage> = fetcher.pages(&scope).try_collect().await.unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].raw_len, 2);
        assert_eq!(pages[0].notes_dropped, 1);
        assert!(!pages[0].is_last);
        assert_eq!(pages[1].start, 2);
        assert!(pages[1].is_last);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let result = CollectionFetcher::new(FakeCollection::new(Vec::new()), 0);
        assert_eq!(result.unwrap_err(), ConfigError::InvalidPageSize(0));
    }

    #[test]
    fn test_request_carries_item_type_filter() {
        struct Capture(Mutex<Option<PageRequest>>);

        #[async_trait::async_trait]
        impl PageSource for Capture {
            async fn fetch_page(&self, request: &PageRequest) -> ClientResult<Vec<Value>> {
                *self.0.lock().unwrap() = Some(request.clone());
                Ok(Vec::new())
            }
        }

        let fetcher = CollectionFetcher::new(Capture(Mutex::new(None)), 100).unwrap();
        let scope = CollectionScope::collection("5014170", "V47TH9U4");
        tokio_test::block_on(fetcher.fetch(&scope)).unwrap();

        let request = fetcher.source().0.lock().unwrap().clone().unwrap();
        assert_eq!(request.scope, scope);
        assert_eq!(request.limit, 100);
        assert_eq!(request.start, 0);
        assert_eq!(request.item_types, ItemType::query_filter());
    }
}
