use crate::loader::TripRecord;
use crate::stats::utility::{mean, round_to};
use serde::Serialize;

/// Total and average trip duration, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub trip_count: usize,
    pub total_duration: f64,
    /// Rounded to one decimal, halves away from zero.
    pub mean_duration: Option<f64>,
}

#[tracing::instrument(skip_all, fields(trips = trips.len()))]
pub fn duration_stats(trips: &[TripRecord]) -> DurationStats {
    let durations: Vec<f64> = trips.iter().map(|t| t.trip_duration).collect();

    DurationStats {
        trip_count: durations.len(),
        // `sum()` over no floats yields -0.0.
        total_duration: durations.iter().fold(0.0, |acc, d| acc + d),
        mean_duration: mean(&durations).map(|m| round_to(m, 1)),
    }
}
