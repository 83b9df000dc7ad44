use std::collections::BTreeSet;

use crate::histogram::Distribution;

/// Total-variation distance between two normalized distributions.
///
/// `0.5 · Σ |a[k] − b[k]|` over the union of keys, with a missing key
/// counted as zero mass. The result is symmetric and lies in `[0, 1]` for
/// normalized inputs.
pub fn total_variation(a: &Distribution, b: &Distribution) -> f64 {
    let keys: BTreeSet<i64> = a.keys().chain(b.keys()).copied().collect();
    let sum: f64 = keys
        .into_iter()
        .map(|k| {
            let pa = a.get(&k).copied().unwrap_or(0.0);
            let pb = b.get(&k).copied().unwrap_or(0.0);
            (pa - pb).abs()
        })
        .sum();
    sum / 2.0
}
