#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The loader must never panic on any input.
    if let Ok(population) = resest_prob::Population::from_reader(data, Some(4096)) {
        let _ = population.histogram();
    }
});
