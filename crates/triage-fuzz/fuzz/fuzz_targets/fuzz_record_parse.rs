#![no_main]

use libfuzzer_sys::fuzz_target;
use zotero_triage::models::ValidatedRecord;

fuzz_target!(|data: &[u8]| {
    // Arbitrary JSON as one raw item; must return Ok or Err, never panic
    if let Ok(raw) = serde_json::from_slice::<serde_json::Value>(data) {
        if let Ok(record) = ValidatedRecord::from_raw(&raw, 0, 0) {
            // A validated record must survive revalidation unchanged
            let data = serde_json::to_value(&record).unwrap();
            let again = ValidatedRecord::from_raw(&serde_json::json!({ "data": data }), 0, 0)
                .expect("serialized record revalidates");
            assert_eq!(record, again);
        }
    }
});
