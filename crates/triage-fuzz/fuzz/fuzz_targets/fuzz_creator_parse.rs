#![no_main]

use libfuzzer_sys::fuzz_target;
use zotero_triage::models::Creator;

fuzz_target!(|data: &[u8]| {
    // Try to parse arbitrary bytes as a creator in either shape
    if let Ok(creator) = serde_json::from_slice::<Creator>(data) {
        let _ = creator.display_name();
    }
});
