#![no_main]

use libfuzzer_sys::fuzz_target;
use rackfit::domain::services::extraction::parse_spec;
use rackfit::ComponentType;

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let ty = ComponentType::ALL[usize::from(selector) % ComponentType::ALL.len()];
    if let Ok(doc) = serde_json::from_slice::<serde_json::Value>(rest) {
        // Any JSON document either parses or is rejected; never panics
        let _ = parse_spec(ty, "fuzz", &doc);
    }
});
