#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(table) = resest_prob::ConfidenceTable::parse(s) {
            for n in 1..=40 {
                let value = table.critical_value(n).expect("positive sample size");
                assert!(value.is_finite() && value > 0.0);
            }
        }
    }
});
