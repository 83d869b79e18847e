#![no_main]

//! Fuzz target for reference orderings in both formats.

use ledgerfix_parse::{ReferenceFormat, parse_reference};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    // Every non-blank, non-comment text line is either an entry or skipped.
    if let Ok(set) = parse_reference(s, ReferenceFormat::Text) {
        let meaningful = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .count();
        assert_eq!(set.entries.len() + set.skipped.len(), meaningful);
    }

    let _ = parse_reference(s, ReferenceFormat::Json);
});
