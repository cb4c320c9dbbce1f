//! Markdown output formatting for the console report.

use std::borrow::Cow;

use crate::models::{ClassifiedRecord, Relevance, TagFrequencyReport};

const ABSTRACT_PREVIEW_CHARS: usize = 300;

/// Format a list of classified records as Markdown.
#[must_use]
pub fn format_records_markdown(items: &[ClassifiedRecord]) -> String {
    if items.is_empty() {
        return "No records found.".to_string();
    }

    let mut output = format!("# Records ({} results)\n\n", items.len());

    for (i, item) in items.iter().enumerate() {
        output.push_str(&format_record_markdown(item, i + 1));
        output.push_str("\n---\n\n");
    }

    output
}

/// Format a single classified record as Markdown.
#[must_use]
pub fn format_record_markdown(item: &ClassifiedRecord, index: usize) -> String {
    let record = &item.record;
    let mut output = String::new();

    // Title
    output.push_str(&format!("## {}. {}\n\n", index, record.title));

    // Creators
    if !record.creators.is_empty() {
        output.push_str(&format!("**Authors**: {}\n\n", record.display_authors()));
    }

    // Triage
    let mut meta = vec![
        format!("**Relevant**: {}", item.relevance),
        format!("**Assigned to**: {}", item.assigned_to),
        format!("**Type**: {}", record.item_type),
    ];
    if let Some(year) = record.year() {
        meta.push(format!("**Year**: {year}"));
    }
    if let Some(venue) = record.venue() {
        meta.push(format!("**Venue**: {venue}"));
    }
    output.push_str(&format!("{}\n\n", meta.join(" | ")));

    if !item.topic_tags.is_empty() {
        output.push_str(&format!("**Tags**: {}\n\n", item.topic_tags.join(", ")));
    }

    // Links
    let mut links = Vec::new();
    if let Some(doi) = record.doi() {
        links.push(format!("[DOI](https://doi.org/{doi})"));
    }
    if let Some(url) = &record.url {
        links.push(format!("[URL]({url})"));
    }
    if !links.is_empty() {
        output.push_str(&format!("**Links**: {}\n\n", links.join(" | ")));
    }

    // Abstract (truncated)
    if !record.abstract_note.is_empty() {
        let abs = &record.abstract_note;
        let truncated: Cow<'_, str> = match abs.char_indices().nth(ABSTRACT_PREVIEW_CHARS) {
            Some((cut, _)) => Cow::Owned(format!("{}...", &abs[..cut])),
            None => Cow::Borrowed(abs),
        };
        output.push_str(&format!("**Abstract**: {truncated}\n"));
    }

    output
}

/// Format the topic tag distribution as a Markdown table.
#[must_use]
pub fn format_tag_report_markdown(report: &TagFrequencyReport) -> String {
    if report.is_empty() {
        return "No topic tags found.".to_string();
    }

    let mut output = format!("# Tags distribution ({} tags)\n\n", report.len());
    output.push_str("| Tag | Count |\n|-----|-------|\n");

    for (tag, count) in report.iter() {
        output.push_str(&format!("| {} | {count} |\n", tag.replace('|', "\\|")));
    }

    output
}

/// Format relevance and assignee totals as Markdown.
#[must_use]
pub fn format_triage_summary_markdown(items: &[ClassifiedRecord]) -> String {
    let count = |r: Relevance| items.iter().filter(|i| i.relevance == r).count();

    let mut output = format!("# Triage summary ({} records)\n\n", items.len());
    output.push_str(&format!(
        "**Relevant**: {} | **Maybe**: {} | **Not relevant**: {}\n\n",
        count(Relevance::Yes),
        count(Relevance::Maybe),
        count(Relevance::No)
    ));

    // Assignees in first-seen order
    let mut assignees: Vec<(&str, usize)> = Vec::new();
    for item in items {
        match assignees.iter().position(|(name, _)| *name == item.assigned_to) {
            Some(i) => assignees[i].1 += 1,
            None => assignees.push((item.assigned_to.as_str(), 1)),
        }
    }

    for (name, n) in assignees {
        output.push_str(&format!("- {name}: {n}\n"));
    }

    output
}
