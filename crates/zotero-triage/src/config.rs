//! Configuration for the Zotero fetcher and the tag classifier.

use std::time::Duration;

use crate::error::ConfigError;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Base URL for the Zotero Web API.
    pub const BASE_URL: &str = "https://api.zotero.org";

    /// Zotero Web API version sent with every request.
    pub const API_VERSION: &str = "3";

    /// Items requested per page (the API maximum).
    pub const PAGE_SIZE: usize = 100;

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Delay slept before each page request.
    pub const REQUEST_DELAY: Duration = Duration::from_millis(100);

    /// Transport-level retries for transient failures.
    pub const MAX_RETRIES: u32 = 3;

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 4;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);
}

/// Fetcher and transport configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Zotero API key (optional, required for private libraries).
    pub api_key: Option<String>,

    /// Base URL of the Zotero API (for testing with mock servers).
    pub api_base_url: String,

    /// Items requested per page.
    pub page_size: usize,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Delay slept before each page request.
    pub request_delay: Duration,

    /// Retries for transient transport failures (5xx, connection resets).
    pub max_retries: u32,
}

impl Config {
    /// Create a new configuration with optional API key.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            api_base_url: api::BASE_URL.to_string(),
            page_size: api::PAGE_SIZE,
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            request_delay: api::REQUEST_DELAY,
            max_retries: api::MAX_RETRIES,
        }
    }

    /// Create a test configuration pointing at a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            api_key: None,
            api_base_url: base_url.to_string(),
            page_size: api::PAGE_SIZE,
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            request_delay: Duration::from_millis(0), // No delay in tests
            max_retries: 0,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `ZOTERO_API_KEY` and, if set, `ZOTERO_PAGE_SIZE`.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var("ZOTERO_API_KEY").ok().filter(|k| !k.is_empty());
        let mut config = Self::new(api_key);

        if let Ok(page_size) = std::env::var("ZOTERO_PAGE_SIZE") {
            config.page_size = page_size.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Builder-style page size override.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Check that the configuration can drive a fetch.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidPageSize(self.page_size));
        }
        Ok(())
    }

    /// Check if an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Tag strings that mark a record's relevance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelevanceLabels {
    /// Label meaning "relevant".
    pub relevant: String,
    /// Label meaning "maybe relevant".
    pub maybe_relevant: String,
    /// Label meaning "not relevant".
    pub not_relevant: String,
}

impl RelevanceLabels {
    /// Create a label set.
    #[must_use]
    pub fn new(
        relevant: impl Into<String>,
        maybe_relevant: impl Into<String>,
        not_relevant: impl Into<String>,
    ) -> Self {
        Self {
            relevant: relevant.into(),
            maybe_relevant: maybe_relevant.into(),
            not_relevant: not_relevant.into(),
        }
    }

    /// Check that every label is non-empty and distinct.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let labels = [
            ("yes", &self.relevant),
            ("maybe", &self.maybe_relevant),
            ("no", &self.not_relevant),
        ];

        for (relevance, label) in labels {
            if label.is_empty() {
                return Err(ConfigError::EmptyRelevanceLabel { relevance });
            }
        }

        if self.relevant == self.maybe_relevant || self.relevant == self.not_relevant {
            return Err(ConfigError::DuplicateRelevanceLabel { label: self.relevant.clone() });
        }
        if self.maybe_relevant == self.not_relevant {
            return Err(ConfigError::DuplicateRelevanceLabel {
                label: self.maybe_relevant.clone(),
            });
        }

        Ok(())
    }

    /// Whether `tag` is one of the three labels.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        tag == self.relevant || tag == self.maybe_relevant || tag == self.not_relevant
    }
}

impl Default for RelevanceLabels {
    fn default() -> Self {
        Self::new("RELEVANT", "MAYBE RELEVANT", "NOT RELEVANT")
    }
}

/// Classifier configuration: who can be assigned, and how relevance is tagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierConfig {
    /// Names recognized as assignment tags.
    pub roster: Vec<String>,

    /// Tags recognized as relevance judgments.
    pub relevance_labels: RelevanceLabels,

    /// Assignee used when a record carries no roster tag.
    pub default_assignee: String,
}

impl ClassifierConfig {
    /// Create a classifier configuration with the default relevance labels.
    #[must_use]
    pub fn new<I, S>(roster: I, default_assignee: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roster: roster.into_iter().map(Into::into).collect(),
            relevance_labels: RelevanceLabels::default(),
            default_assignee: default_assignee.into(),
        }
    }

    /// Builder-style relevance label override.
    #[must_use]
    pub fn with_relevance_labels(mut self, labels: RelevanceLabels) -> Self {
        self.relevance_labels = labels;
        self
    }

    /// Check that tags can be classified unambiguously.
    ///
    /// The default assignee does not have to be on the roster.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.roster.is_empty() {
            return Err(ConfigError::EmptyRoster);
        }
        if let Some(index) = self.roster.iter().position(String::is_empty) {
            return Err(ConfigError::EmptyRosterName { index });
        }
        if self.default_assignee.is_empty() {
            return Err(ConfigError::EmptyDefaultAssignee);
        }

        self.relevance_labels.validate()?;

        if let Some(name) = self.roster.iter().find(|name| self.relevance_labels.contains(name)) {
            return Err(ConfigError::AmbiguousTag { tag: name.clone() });
        }

        Ok(())
    }
}
