use serde::Serialize;
use std::collections::BTreeMap;

/// How often a single categorical value occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

fn tally<T: Ord>(values: impl IntoIterator<Item = T>) -> BTreeMap<T, usize> {
    let mut counts = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
}

/// Most frequent value. Ties go to the smallest value in sort order.
/// Returns `None` for empty input.
pub fn mode<T: Ord>(values: impl IntoIterator<Item = T>) -> Option<T> {
    let mut best: Option<(T, usize)> = None;
    // BTreeMap iterates ascending, so strict `>` keeps the smallest tied value.
    for (value, count) in tally(values) {
        if best.as_ref().is_none_or(|(_, n)| count > *n) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

/// Occurrences per distinct value, most frequent first; ties ascending by value.
pub fn value_counts<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<ValueCount> {
    let mut counts: Vec<ValueCount> = tally(values)
        .into_iter()
        .map(|(value, count)| ValueCount {
            value: value.to_string(),
            count,
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    counts
}

/// Average of `values`, or `None` when there is nothing to average.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Rounds to `places` decimals, halves away from zero.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
