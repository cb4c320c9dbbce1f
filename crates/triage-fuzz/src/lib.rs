//! Fuzzing library for zotero-triage.
//!
//! Fuzz targets cover the untrusted-input boundary: raw API items and pages going
//! through schema validation, and creator objects in both shapes.
//!
//! # Usage
//!
//! ```bash
//! cd crates/triage-fuzz
//! cargo +nightly fuzz run fuzz_page_validate -- -max_total_time=60
//! ```

pub use zotero_triage::fetcher::FetchedPage;
pub use zotero_triage::models;
