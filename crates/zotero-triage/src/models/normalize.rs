//! Field normalization applied while deserializing raw item data.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::Error as _;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

static ABSTRACT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Abstract(?:\s+|$)").expect("valid abstract prefix regex"));

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})\b").expect("valid year regex"));

/// Deserialize an optional string, mapping `""` and `null` to `None`.
///
/// Used for every optional bibliographic field; pair with `#[serde(default)]`.
pub fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Deserialize a string that must not be empty.
pub fn non_empty_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    if value.trim().is_empty() {
        return Err(D::Error::custom("string must not be empty"));
    }
    Ok(value)
}

/// Deserialize an abstract, dropping leading "Abstract" headings.
pub fn abstract_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    Ok(strip_abstract_prefix(&value).to_string())
}

/// Remove leading "Abstract" headings and the whitespace after them.
///
/// Only a heading followed by whitespace (or nothing) counts, so "Abstraction" and
/// "Abstract: ..." are kept. Repeated headings are all removed, which makes the
/// function idempotent.
#[must_use]
pub fn strip_abstract_prefix(text: &str) -> &str {
    let mut rest = text;
    while let Some(m) = ABSTRACT_PREFIX.find(rest) {
        rest = &rest[m.end()..];
    }
    rest
}

/// First four-digit run in a free-form date string ("March 2021" → 2021).
#[must_use]
pub fn year_of(date: &str) -> Option<i32> {
    YEAR.captures(date)?.get(1)?.as_str().parse().ok()
}

#[derive(Deserialize)]
struct TagEntry {
    tag: String,
}

#[derive(Serialize)]
struct TagEntryRef<'a> {
    tag: &'a str,
}

/// Deserialize `[{"tag": "..."}]` into the bare tag strings, in order.
pub fn tag_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<Vec<TagEntry>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries.into_iter().map(|e| e.tag).collect())
}

/// Serialize tag strings back into the `[{"tag": "..."}]` wire shape.
pub fn serialize_tag_list<S>(tags: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut seq = serializer.serialize_seq(Some(tags.len()))?;
    for tag in tags {
        seq.serialize_element(&TagEntryRef { tag })?;
    }
    seq.end()
}
