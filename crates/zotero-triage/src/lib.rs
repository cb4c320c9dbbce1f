//! Zotero Triage
//!
//! Fetches every record of a Zotero group collection, validates and normalizes it, and
//! triages it by the tags curators put on it: a relevance label, the roster member
//! assigned to review it, and free-form topic tags.
//!
//! # Pipeline
//!
//! - **Fetch**: sequential pagination (`limit`/`start`) until a short page; notes dropped
//! - **Validate**: strict schema check per page, one bad item fails the fetch
//! - **Classify**: single-pass, last-write-wins tag partitioning
//! - **Report**: topic tag frequencies, JSON/CSV/Markdown output
//!
//! # Example
//!
//! ```no_run
//! use zotero_triage::{
//!     ClassifierConfig, Config,
//!     classifier::{Classifier, tag_frequency},
//!     fetcher::{CollectionFetcher, CollectionScope},
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let fetcher = CollectionFetcher::from_config(Config::from_env()?)?;
//!     let records = fetcher.fetch(&CollectionScope::collection("5014170", "V47TH9U4")).await?;
//!
//!     let classifier = Classifier::new(ClassifierConfig::new(["Bára", "Katka"], "Bára"))?;
//!     let classified = classifier.classify(&records);
//!
//!     for (tag, count) in tag_frequency(&classified).iter() {
//!         println!("{tag}: {count}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod classifier;
pub mod client;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod formatters;
pub mod models;

pub use client::ZoteroClient;
pub use config::{ClassifierConfig, Config, RelevanceLabels};
pub use error::{ClientError, ConfigError, FetchError, ValidationError};
