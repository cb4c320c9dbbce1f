//! Tag classifier: splits each record's flat tag list into relevance, assignee and topics.
//!
//! Tags are scanned once, left to right. Relevance labels are checked first, then roster
//! names; everything else is a topic tag. Repeated relevance or roster tags overwrite
//! earlier ones.

use std::collections::HashMap;

use crate::config::ClassifierConfig;
use crate::error::ConfigError;
use crate::models::{
    ClassifiedRecord, Relevance, TagCount, TagFrequencyReport, ValidatedRecord,
};

/// Role a single tag plays for the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind<'a> {
    /// A relevance label.
    Relevance(Relevance),
    /// A roster name.
    Assignee(&'a str),
    /// Anything else.
    Topic,
}

/// Classifier over a validated configuration.
#[derive(Debug, Clone)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    /// Create a classifier, rejecting configurations that cannot classify unambiguously.
    pub fn new(config: ClassifierConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Decide what a single tag means.
    #[must_use]
    pub fn tag_kind<'t>(&self, tag: &'t str) -> TagKind<'t> {
        let labels = &self.config.relevance_labels;

        if tag == labels.relevant {
            TagKind::Relevance(Relevance::Yes)
        } else if tag == labels.maybe_relevant {
            TagKind::Relevance(Relevance::Maybe)
        } else if tag == labels.not_relevant {
            TagKind::Relevance(Relevance::No)
        } else if self.config.roster.iter().any(|name| name == tag) {
            TagKind::Assignee(tag)
        } else {
            TagKind::Topic
        }
    }

    /// Classify one record.
    #[must_use]
    pub fn classify_record(&self, record: &ValidatedRecord) -> ClassifiedRecord {
        let mut relevance = Relevance::default();
        let mut assigned_to: Option<&str> = None;
        let mut topic_tags = Vec::new();

        for tag in &record.tags {
            match self.tag_kind(tag) {
                TagKind::Relevance(r) => relevance = r,
                TagKind::Assignee(name) => assigned_to = Some(name),
                TagKind::Topic => topic_tags.push(tag.clone()),
            }
        }

        ClassifiedRecord {
            record: record.clone(),
            assigned_to: assigned_to.unwrap_or(&self.config.default_assignee).to_string(),
            relevance,
            topic_tags,
        }
    }

    /// Classify records, preserving their order.
    #[must_use]
    pub fn classify(&self, records: &[ValidatedRecord]) -> Vec<ClassifiedRecord> {
        let classified: Vec<_> = records.iter().map(|r| self.classify_record(r)).collect();

        tracing::debug!(
            records = classified.len(),
            relevant = classified.iter().filter(|c| c.relevance == Relevance::Yes).count(),
            not_relevant = classified.iter().filter(|c| c.relevance == Relevance::No).count(),
            "Classified records"
        );

        classified
    }
}

/// Classify `records` with `config`.
///
/// The configuration is validated up front, even when `records` is empty.
pub fn classify(
    records: &[ValidatedRecord],
    config: &ClassifierConfig,
) -> Result<Vec<ClassifiedRecord>, ConfigError> {
    Ok(Classifier::new(config.clone())?.classify(records))
}

/// Count topic tags across records, most frequent first.
///
/// Tags with equal counts keep the order in which they were first encountered.
#[must_use]
pub fn tag_frequency(records: &[ClassifiedRecord]) -> TagFrequencyReport {
    let mut entries: Vec<TagCount> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for tag in records.iter().flat_map(|r| &r.topic_tags) {
        match positions.get(tag.as_str()) {
            Some(&i) => entries[i].count += 1,
            None => {
                positions.insert(tag, entries.len());
                entries.push(TagCount { tag: tag.clone(), count: 1 });
            }
        }
    }

    // Stable sort keeps first-seen order among ties.
    entries.sort_by(|a, b| b.count.cmp(&a.count));

    TagFrequencyReport { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RelevanceLabels;
    use crate::models::ItemType;

    fn roster_config() -> ClassifierConfig {
        ClassifierConfig::new(["Bára", "Katka", "Jan", "Roxana", "David", "Adam"], "Bára")
    }

    fn record(tags: &[&str]) -> ValidatedRecord {
        ValidatedRecord {
            key: "K".to_string(),
            version: 1,
            item_type: ItemType::JournalArticle,
            title: "T".to_string(),
            creators: Vec::new(),
            abstract_note: String::new(),
            institution: None,
            book_title: None,
            proceedings_title: None,
            conference_name: None,
            publication_title: None,
            volume: None,
            issue: None,
            pages: None,
            series: None,
            series_title: None,
            series_text: None,
            journal_abbreviation: None,
            doi: None,
            issn: None,
            short_title: None,
            url: None,
            date: None,
            date_added: None,
            date_modified: None,
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
        }
    }

    #[test]
    fn test_last_write_wins() {
        let classifier = Classifier::new(roster_config()).unwrap();
        let out = classifier.classify_record(&record(&["RELEVANT", "Bára", "NOT RELEVANT"]));

        assert_eq!(out.relevance, Relevance::No);
        assert_eq!(out.assigned_to, "Bára");
        assert!(out.topic_tags.is_empty());
    }

    #[test]
    fn test_repeated_assignee_last_wins() {
        let classifier = Classifier::new(roster_config()).unwrap();
        let out = classifier.classify_record(&record(&["Jan", "ml", "Katka"]));

        assert_eq!(out.assigned_to, "Katka");
        assert_eq!(out.topic_tags, ["ml"]);
    }

    #[test]
    fn test_defaults() {
        let config = ClassifierConfig::new(["Bára", "Katka"], "Unassigned");
        let classifier = Classifier::new(config).unwrap();
        let out = classifier.classify_record(&record(&["ml", "graphs"]));

        assert_eq!(out.assigned_to, "Unassigned");
        assert_eq!(out.relevance, Relevance::Maybe);
        assert_eq!(out.topic_tags, ["ml", "graphs"]);
    }

    #[test]
    fn test_duplicate_topic_tags_pass_through() {
        let classifier = Classifier::new(roster_config()).unwrap();
        let out = classifier.classify_record(&record(&["ml", "MAYBE RELEVANT", "ml"]));

        assert_eq!(out.topic_tags, ["ml", "ml"]);
        assert_eq!(out.relevance, Relevance::Maybe);
    }

    #[test]
    fn test_matching_is_exact() {
        let classifier = Classifier::new(roster_config()).unwrap();
        let out = classifier.classify_record(&record(&["relevant", "bára", " Jan"]));

        assert_eq!(out.relevance, Relevance::Maybe);
        assert_eq!(out.assigned_to, "Bára");
        assert_eq!(out.topic_tags, ["relevant", "bára", " Jan"]);
    }

    #[test]
    fn test_custom_labels() {
        let config = roster_config().with_relevance_labels(RelevanceLabels::new("IN", "?", "OUT"));
        let classifier = Classifier::new(config).unwrap();

        assert_eq!(classifier.tag_kind("IN"), TagKind::Relevance(Relevance::Yes));
        assert_eq!(classifier.tag_kind("OUT"), TagKind::Relevance(Relevance::No));
        assert_eq!(classifier.tag_kind("RELEVANT"), TagKind::Topic);
        assert_eq!(classifier.tag_kind("Adam"), TagKind::Assignee("Adam"));
    }

    #[test]
    fn test_classify_rejects_empty_roster() {
        let config = ClassifierConfig::new(Vec::<String>::new(), "Bára");
        assert_eq!(classify(&[record(&[])], &config), Err(ConfigError::EmptyRoster));
    }

    #[test]
    fn test_classify_preserves_order() {
        let mut a = record(&["RELEVANT"]);
        a.key = "A".to_string();
        let mut b = record(&["NOT RELEVANT"]);
        b.key = "B".to_string();

        let out = classify(&[a, b], &roster_config()).unwrap();

        assert_eq!(out[0].record.key, "A");
        assert_eq!(out[1].record.key, "B");
    }

    #[test]
    fn test_tag_frequency() {
        let classifier = Classifier::new(roster_config()).unwrap();
        let records = classifier.classify(&[
            record(&["a", "b"]),
            record(&["a", "RELEVANT"]),
            record(&["b", "b"]),
        ]);

        let report = tag_frequency(&records);
        let pairs: Vec<_> = report.iter().collect();

        assert_eq!(pairs, [("b", 3), ("a", 2)]);
    }

    #[test]
    fn test_tag_frequency_ties_keep_first_seen_order() {
        let classifier = Classifier::new(roster_config()).unwrap();
        let records = classifier.classify(&[record(&["z", "y"]), record(&["x", "y", "z"])]);

        let report = tag_frequency(&records);
        let pairs: Vec<_> = report.iter().collect();

        assert_eq!(pairs, [("z", 2), ("y", 2), ("x", 1)]);
    }

    #[test]
    fn test_tag_frequency_empty() {
        assert!(tag_frequency(&[]).is_empty());
    }
}
