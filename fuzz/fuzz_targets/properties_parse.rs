#![no_main]

use libfuzzer_sys::fuzz_target;
use nexus_upload::config;

fuzz_target!(|content: &str| {
    let layer = config::parse_properties(content);

    // Invariants: extracted values are trimmed and never span lines.
    for value in [
        layer.repository,
        layer.username,
        layer.password,
        layer.version,
        layer.timeout,
    ]
    .into_iter()
    .flatten()
    {
        assert_eq!(value.trim(), value);
        assert!(!value.contains('\n'));
    }
});
