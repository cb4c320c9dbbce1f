#![no_main]

use libfuzzer_sys::fuzz_target;
use zotero_triage::fetcher::FetchedPage;

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = serde_json::from_slice::<Vec<serde_json::Value>>(data) {
        if let Ok(page) = FetchedPage::validate(&raw, 0, 100) {
            assert_eq!(page.records.len() + page.notes_dropped, raw.len());
        }
    }
});
