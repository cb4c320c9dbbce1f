//! CSV output for spreadsheet-based screening.

use crate::models::ClassifiedRecord;

const HEADER: &str = "key,title,authors,year,item_type,venue,doi,url,relevant,assigned_to,tags";

/// Format classified records as CSV, one row per record.
///
/// Authors are joined with `"; "` and tags with `"; "`.
#[must_use]
pub fn format_csv(items: &[ClassifiedRecord]) -> String {
    let mut output = String::with_capacity(64 * (items.len() + 1));
    output.push_str(HEADER);
    output.push('\n');

    for item in items {
        let record = &item.record;
        let year = record.year().map_or(String::new(), |y| y.to_string());

        let row = [
            csv_escape(&record.key),
            csv_escape(&record.title),
            csv_escape(&record.creator_names().join("; ")),
            year,
            record.item_type.to_string(),
            csv_escape(record.venue().unwrap_or("")),
            csv_escape(record.doi().unwrap_or("")),
            csv_escape(record.url.as_deref().unwrap_or("")),
            item.relevance.to_string(),
            csv_escape(&item.assigned_to),
            csv_escape(&item.topic_tags.join("; ")),
        ];

        output.push_str(&row.join(","));
        output.push('\n');
    }

    output
}

/// Escape a string for CSV output.
fn csv_escape(s: &str) -> String {
    // Prefix formula-like cells with a single quote so spreadsheets don't evaluate them
    let guarded = if s.starts_with(['=', '+', '-', '@']) { format!("'{s}") } else { s.to_string() };

    if guarded.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", guarded.replace('"', "\"\""))
    } else {
        guarded
    }
}
