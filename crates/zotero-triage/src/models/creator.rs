//! Creator (author/editor) data model.
//!
//! Zotero stores a creator either as a single `name` or as `firstName`/`lastName`.
//! The two shapes accept slightly different roles, so each gets its own struct.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role of a creator stored with a single full name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedRole {
    /// Author.
    Author,
    /// Editor.
    Editor,
}

/// Role of a creator stored with split first/last names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatorRole {
    /// Author.
    Author,
    /// Editor.
    Editor,
    /// Programmer (software records).
    Programmer,
}

/// Creator with a single-field name (institutions, mononyms).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamedCreator {
    /// Creator role.
    #[serde(rename = "creatorType")]
    pub role: NamedRole,

    /// Full display name.
    #[serde(rename = "name")]
    pub full_name: String,
}

/// Creator with first and last name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct SplitCreator {
    /// Creator role.
    #[serde(rename = "creatorType")]
    pub role: CreatorRole,

    /// Given name.
    pub first_name: String,

    /// Family name.
    pub last_name: String,
}

/// A record creator in one of the two shapes Zotero uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Creator {
    /// `{creatorType, name}`
    Named(NamedCreator),
    /// `{creatorType, firstName, lastName}`
    Split(SplitCreator),
}

impl Creator {
    /// Create a single-name creator.
    #[must_use]
    pub fn named(role: NamedRole, full_name: impl Into<String>) -> Self {
        Self::Named(NamedCreator { role, full_name: full_name.into() })
    }

    /// Create a first/last-name creator.
    #[must_use]
    pub fn split(
        role: CreatorRole,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self::Split(SplitCreator {
            role,
            first_name: first_name.into(),
            last_name: last_name.into(),
        })
    }

    /// Name as it should be displayed: the full name, or "first last".
    #[must_use]
    pub fn display_name(&self) -> Cow<'_, str> {
        match self {
            Self::Named(c) => Cow::Borrowed(&c.full_name),
            Self::Split(c) => Cow::Owned(format!("{} {}", c.first_name, c.last_name)),
        }
    }

    /// Role of this creator, widened to the split-shape role set.
    #[must_use]
    pub const fn role(&self) -> CreatorRole {
        match self {
            Self::Named(c) => match c.role {
                NamedRole::Author => CreatorRole::Author,
                NamedRole::Editor => CreatorRole::Editor,
            },
            Self::Split(c) => c.role,
        }
    }
}
