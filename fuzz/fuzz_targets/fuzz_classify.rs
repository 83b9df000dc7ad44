#![no_main]
use libfuzzer_sys::fuzz_target;
use resest_prob::{classify, Histogram};

fuzz_target!(|input: (i64, Vec<(i64, u32)>)| {
    let (reference, pairs) = input;
    let histogram: Histogram = pairs
        .into_iter()
        .map(|(level, count)| (level, u64::from(count)))
        .collect();
    if let Ok(reduced) = classify(&histogram, reference) {
        // Classification succeeds only when nothing is negative, and then
        // conserves the total count.
        assert!(reference >= 0 && histogram.keys().all(|&k| k >= 0));
        assert_eq!(
            reduced.values().map(|&v| u128::from(v)).sum::<u128>(),
            histogram.values().map(|&v| u128::from(v)).sum::<u128>()
        );
    }
});
