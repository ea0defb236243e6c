#![no_main]

use libfuzzer_sys::fuzz_target;
use rackfit::infrastructure::BuildFile;
use rackfit::BuildStore;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let record = serde_json::json!({
            "builds": [{"build_id": "fuzz", "components": [
                {"type": "sfp", "uuid": "sfp-1", "assignment": text}
            ]}]
        });
        if let Ok(store) = BuildFile::parse(&record.to_string()) {
            // Assignment text decodes or errors; never panics
            let _ = store.get_components("fuzz");
        }
    }
});
