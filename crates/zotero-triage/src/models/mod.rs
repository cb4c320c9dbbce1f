//! Data models for Zotero records and their classification.
//!
//! Records use `#[serde(rename_all = "camelCase")]` to match the Zotero item `data`
//! object, and validate while deserializing.

mod classified;
mod creator;
mod item_type;
mod normalize;
mod record;

pub use classified::{ClassifiedRecord, Relevance, TagCount, TagFrequencyReport};
pub use creator::{Creator, CreatorRole, NamedCreator, NamedRole, SplitCreator};
pub use item_type::ItemType;
pub use normalize::{empty_as_none, strip_abstract_prefix, year_of};
pub use record::{ValidatedRecord, is_note, raw_item_type};
