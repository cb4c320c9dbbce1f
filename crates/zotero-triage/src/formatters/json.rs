//! JSON summary output.

use serde_json::{Value, json};

use crate::models::{ClassifiedRecord, TagFrequencyReport};

/// Create the compact summary of one classified record.
///
/// Shape: `{title, authors, year, tags, assignedTo, relevant}`, plus `key` and, when
/// present, `doi` and `url`.
#[must_use]
pub fn compact_record(item: &ClassifiedRecord) -> Value {
    let record = &item.record;

    let mut obj = json!({
        "key": record.key,
        "title": record.title,
        "authors": record.creator_names(),
        "year": record.year(),
        "tags": item.topic_tags,
        "assignedTo": item.assigned_to,
        "relevant": item.relevance,
    });

    if let Some(doi) = record.doi() {
        obj["doi"] = json!(doi);
    }

    if let Some(url) = &record.url {
        obj["url"] = json!(url);
    }

    obj
}

/// Summaries of all records, in input order.
#[must_use]
pub fn summary_json(items: &[ClassifiedRecord]) -> Value {
    Value::Array(items.iter().map(compact_record).collect())
}

/// Tag report as an array of `{tag, count}` objects, in report order.
#[must_use]
pub fn tag_report_json(report: &TagFrequencyReport) -> Value {
    Value::Array(report.iter().map(|(tag, count)| json!({"tag": tag, "count": count})).collect())
}
