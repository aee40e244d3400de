#![no_main]

use libfuzzer_sys::fuzz_target;
use nexus_upload::ignore::IgnoreSet;

fuzz_target!(|data: (String, String)| {
    let (pattern, path) = data;

    // Compilation may reject a raw regex but must never panic.
    let Ok(set) = IgnoreSet::compile(&[pattern.clone()]) else {
        return;
    };

    // Matching must never panic either.
    let _ = set.ignores(&path);

    // Invariant: a literal pattern (no wildcard, no raw-regex marker)
    // always matches itself.
    if !pattern.trim().is_empty() && !pattern.starts_with('/') && !pattern.contains('*') {
        assert!(set.ignores(&pattern));
    }
});
