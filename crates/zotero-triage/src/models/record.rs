//! Validated bibliographic record matching the Zotero item `data` schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::normalize::{
    abstract_text, empty_as_none, non_empty_string, serialize_tag_list, tag_list, year_of,
};
use super::{Creator, ItemType};
use crate::error::ValidationError;

/// A bibliographic record that passed schema validation.
///
/// Serializing a record yields the raw `data` shape again, so a serialized record
/// validates back into an identical value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedRecord {
    /// Opaque item key, stable per remote item.
    pub key: String,

    /// Library version of the item at fetch time.
    pub version: u64,

    /// Item type.
    pub item_type: ItemType,

    /// Title.
    #[serde(deserialize_with = "non_empty_string")]
    pub title: String,

    /// Creators in citation order.
    pub creators: Vec<Creator>,

    /// Abstract with any leading "Abstract" heading removed.
    #[serde(default, deserialize_with = "abstract_text")]
    pub abstract_note: String,

    /// Institution (reports, theses).
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,

    /// Containing book title (book sections).
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub book_title: Option<String>,

    /// Proceedings title (conference papers).
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub proceedings_title: Option<String>,

    /// Conference name.
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub conference_name: Option<String>,

    /// Journal or repository name.
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub publication_title: Option<String>,

    /// Volume.
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,

    /// Issue.
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,

    /// Page range.
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,

    /// Series.
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,

    /// Series title.
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub series_title: Option<String>,

    /// Series text.
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub series_text: Option<String>,

    /// Journal abbreviation.
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub journal_abbreviation: Option<String>,

    /// Digital Object Identifier.
    #[serde(
        rename = "DOI",
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub doi: Option<String>,

    /// ISSN.
    #[serde(
        rename = "ISSN",
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub issn: Option<String>,

    /// Short title.
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub short_title: Option<String>,

    /// URL.
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Free-form publication date as entered in Zotero.
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// When the item was added to the library.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<DateTime<Utc>>,

    /// When the item was last modified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<DateTime<Utc>>,

    /// Raw tags in source order.
    #[serde(default, deserialize_with = "tag_list", serialize_with = "serialize_tag_list")]
    pub tags: Vec<String>,
}

impl ValidatedRecord {
    /// Validate one raw API item (an object with a `data` member).
    ///
    /// `start` and `index` locate the item for error reporting.
    pub fn from_raw(raw: &Value, start: usize, index: usize) -> Result<Self, ValidationError> {
        let key = raw
            .pointer("/data/key")
            .or_else(|| raw.get("key"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let Some(data) = raw.get("data").filter(|d| d.is_object()) else {
            return Err(ValidationError::new(key, start, index, "item has no `data` object"));
        };

        Self::deserialize(data).map_err(|e| ValidationError::new(key, start, index, e.to_string()))
    }

    /// Get the publication year parsed from `date`, if any.
    #[must_use]
    pub fn year(&self) -> Option<i32> {
        self.date.as_deref().and_then(year_of)
    }

    /// Get the DOI if available.
    #[must_use]
    pub fn doi(&self) -> Option<&str> {
        self.doi.as_deref()
    }

    /// Get the first creator's display name if available.
    #[must_use]
    pub fn first_creator(&self) -> Option<String> {
        self.creators.first().map(|c| c.display_name().into_owned())
    }

    /// Get creator display names, in citation order.
    #[must_use]
    pub fn creator_names(&self) -> Vec<String> {
        self.creators.iter().map(|c| c.display_name().into_owned()).collect()
    }

    /// Get creator names as a comma-separated string.
    #[must_use]
    pub fn display_authors(&self) -> String {
        self.creator_names().join(", ")
    }

    /// Venue: publication, proceedings or book title, whichever is set first.
    #[must_use]
    pub fn venue(&self) -> Option<&str> {
        self.publication_title
            .as_deref()
            .or(self.proceedings_title.as_deref())
            .or(self.book_title.as_deref())
            .or(self.conference_name.as_deref())
            .or(self.institution.as_deref())
    }
}

/// Declared `itemType` of a raw item, without validating anything else.
#[must_use]
pub fn raw_item_type(raw: &Value) -> Option<&str> {
    raw.pointer("/data/itemType").and_then(Value::as_str)
}

/// Check if a raw item is an annotation note.
#[must_use]
pub fn is_note(raw: &Value) -> bool {
    raw_item_type(raw) == Some(ItemType::NOTE)
}
