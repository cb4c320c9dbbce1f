//! Classifier output types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ValidatedRecord;

/// Relevance judgment carried by a record's tags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relevance {
    /// Relevant to the review.
    Yes,
    /// Not yet decided.
    #[default]
    Maybe,
    /// Not relevant.
    No,
}

impl Relevance {
    /// Get the lowercase name used in exports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::Maybe => "maybe",
            Self::No => "no",
        }
    }
}

impl fmt::Display for Relevance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record together with the fields derived from its tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedRecord {
    /// The validated record, unchanged.
    pub record: ValidatedRecord,

    /// Roster member responsible for reviewing the record.
    pub assigned_to: String,

    /// Relevance judgment.
    pub relevance: Relevance,

    /// Tags that are neither relevance labels nor roster names, in source order.
    pub topic_tags: Vec<String>,
}

/// Occurrence count of one topic tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    /// Topic tag.
    pub tag: String,
    /// Number of occurrences across all records.
    pub count: usize,
}

/// Topic tag distribution, most frequent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFrequencyReport {
    /// Entries sorted by descending count; equal counts keep first-seen order.
    pub entries: Vec<TagCount>,
}

impl TagFrequencyReport {
    /// Number of distinct topic tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no topic tags were seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count for a single tag (0 if never seen).
    #[must_use]
    pub fn count_of(&self, tag: &str) -> usize {
        self.entries.iter().find(|e| e.tag == tag).map_or(0, |e| e.count)
    }

    /// Iterate `(tag, count)` pairs in report order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|e| (e.tag.as_str(), e.count))
    }
}
