//! Property-based tests for the tag classifier.

use proptest::prelude::*;
use serde_json::json;
use zotero_triage::classifier::{Classifier, tag_frequency};
use zotero_triage::config::ClassifierConfig;
use zotero_triage::models::{Relevance, ValidatedRecord};

const ROSTER: [&str; 3] = ["Jan", "Katka", "Adam"];
const LABELS: [(&str, Relevance); 3] = [
    ("RELEVANT", Relevance::Yes),
    ("MAYBE RELEVANT", Relevance::Maybe),
    ("NOT RELEVANT", Relevance::No),
];

fn classifier() -> Classifier {
    Classifier::new(ClassifierConfig::new(ROSTER, "Bára")).expect("valid config")
}

/// Tags drawn from the roster, the labels, and a small topic vocabulary.
fn arb_tag() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(ROSTER.to_vec()).prop_map(str::to_string),
        prop::sample::select(LABELS.iter().map(|(l, _)| *l).collect::<Vec<_>>())
            .prop_map(str::to_string),
        "[a-z]{1,6}",
    ]
}

fn arb_record() -> impl Strategy<Value = ValidatedRecord> {
    prop::collection::vec(arb_tag(), 0..12).prop_map(|tags| {
        let raw = json!({
            "data": {
                "key": "PROP0001",
                "version": 1,
                "itemType": "document",
                "title": "Generated",
                "creators": [],
                "tags": tags.iter().map(|t| json!({"tag": t})).collect::<Vec<_>>()
            }
        });
        ValidatedRecord::from_raw(&raw, 0, 0).expect("generated record is valid")
    })
}

proptest! {
    /// Every tag lands in exactly one bucket; topics keep source order.
    #[test]
    fn topics_are_the_unclaimed_tags_in_order(record in arb_record()) {
        let classified = classifier().classify_record(&record);

        let expected: Vec<_> = record
            .tags
            .iter()
            .filter(|t| !ROSTER.contains(&t.as_str()) && !LABELS.iter().any(|(l, _)| l == t))
            .cloned()
            .collect();

        prop_assert_eq!(classified.topic_tags, expected);
    }

    /// Relevance and assignee come from the last matching tag.
    #[test]
    fn last_matching_tag_wins(record in arb_record()) {
        let classified = classifier().classify_record(&record);

        let relevance = record
            .tags
            .iter()
            .rev()
            .find_map(|t| LABELS.iter().find(|(l, _)| l == t).map(|(_, r)| *r))
            .unwrap_or(Relevance::Maybe);
        let assignee = record
            .tags
            .iter()
            .rev()
            .find(|t| ROSTER.contains(&t.as_str()))
            .map_or("Bára", String::as_str);

        prop_assert_eq!(classified.relevance, relevance);
        prop_assert_eq!(classified.assigned_to.as_str(), assignee);
    }

    /// Report counts sum to the number of topic tags and are non-increasing.
    #[test]
    fn frequency_report_is_consistent(records in prop::collection::vec(arb_record(), 0..8)) {
        let classified = classifier().classify(&records);
        let report = tag_frequency(&classified);

        let total_topics: usize = classified.iter().map(|c| c.topic_tags.len()).sum();
        let total_counted: usize = report.iter().map(|(_, n)| n).sum();
        prop_assert_eq!(total_counted, total_topics);

        let counts: Vec<_> = report.iter().map(|(_, n)| n).collect();
        prop_assert!(counts.windows(2).all(|w| w[0] >= w[1]));

        for (tag, count) in report.iter() {
            prop_assert!(count >= 1);
            let occurrences = classified
                .iter()
                .flat_map(|c| &c.topic_tags)
                .filter(|t| t.as_str() == tag)
                .count();
            prop_assert_eq!(count, occurrences);
        }
    }

    /// Classification preserves record count and order.
    #[test]
    fn classify_preserves_order(records in prop::collection::vec(arb_record(), 0..8)) {
        let classified = classifier().classify(&records);

        prop_assert_eq!(classified.len(), records.len());
        for (item, original) in classified.iter().zip(&records) {
            prop_assert_eq!(&item.record, original);
        }
    }
}
