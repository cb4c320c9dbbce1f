//! Zotero item types accepted as bibliographic records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Item type of a bibliographic record.
///
/// Anything outside this set (attachments, notes, annotations, ...) is not a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemType {
    /// Book.
    Book,
    /// Book section.
    BookSection,
    /// Conference paper.
    ConferencePaper,
    /// Generic document.
    Document,
    /// Journal article.
    JournalArticle,
    /// Preprint.
    Preprint,
    /// Software.
    ComputerProgram,
    /// Thesis.
    Thesis,
    /// Web page.
    Webpage,
}

impl ItemType {
    /// All accepted item types, in the order they are sent to the API.
    pub const ALL: [Self; 9] = [
        Self::Book,
        Self::BookSection,
        Self::ConferencePaper,
        Self::Document,
        Self::JournalArticle,
        Self::Preprint,
        Self::ComputerProgram,
        Self::Thesis,
        Self::Webpage,
    ];

    /// Item type of annotation notes, which are never records.
    pub const NOTE: &'static str = "note";

    /// Get the API spelling of this item type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Book => "book",
            Self::BookSection => "bookSection",
            Self::ConferencePaper => "conferencePaper",
            Self::Document => "document",
            Self::JournalArticle => "journalArticle",
            Self::Preprint => "preprint",
            Self::ComputerProgram => "computerProgram",
            Self::Thesis => "thesis",
            Self::Webpage => "webpage",
        }
    }

    /// Render the `itemType` query filter (`"book || bookSection || ..."`).
    #[must_use]
    pub fn query_filter() -> String {
        Self::ALL.iter().map(|t| t.as_str()).collect::<Vec<_>>().join(" || ")
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_filter() {
        assert_eq!(
            ItemType::query_filter(),
            "book || bookSection || conferencePaper || document || journalArticle || \
             preprint || computerProgram || thesis || webpage"
        );
    }

    #[test]
    fn test_serde_matches_as_str() {
        for item_type in ItemType::ALL {
            let json = serde_json::to_value(item_type).unwrap();
            assert_eq!(json, item_type.as_str());
        }
    }

    #[test]
    fn test_note_is_not_an_item_type() {
        assert!(serde_json::from_str::<ItemType>(r#""note""#).is_err());
        assert!(serde_json::from_str::<ItemType>(r#""attachment""#).is_err());
    }
}
