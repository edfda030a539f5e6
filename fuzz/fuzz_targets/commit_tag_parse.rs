#![no_main]

use libfuzzer_sys::fuzz_target;
use patchbridge_core::parse_issue_number;

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    let references = parse_issue_number(&raw);
    if references.is_empty() {
        return;
    }

    assert!(references.related.is_some());
    for number in references.related() {
        assert!(!references.closes().contains(number));
    }
    if references.closes.is_some() {
        assert!(raw.contains("Closes: #"));
    }
});
