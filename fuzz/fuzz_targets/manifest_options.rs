#![no_main]

use libfuzzer_sys::fuzz_target;
use nexus_upload::config::OptionLayer;

fuzz_target!(|data: &[u8]| {
    // Arbitrary JSON either parses into an option layer or errors cleanly;
    // the string-or-list ignore field must not panic on odd shapes.
    if let Ok(layer) = serde_json::from_slice::<OptionLayer>(data) {
        // Merging a layer over itself must not panic.
        let _ = layer.clone().over(layer);
    }
});
