use crate::loader::TripRecord;
use crate::stats::utility::mode;
use serde::Serialize;

/// Most frequent times of travel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeStats {
    pub most_common_month: Option<u32>,
    pub most_common_day: Option<&'static str>,
    pub most_common_hour: Option<u32>,
}

#[tracing::instrument(skip_all, fields(trips = trips.len()))]
pub fn time_stats(trips: &[TripRecord]) -> TimeStats {
    TimeStats {
        most_common_month: mode(trips.iter().map(TripRecord::month)),
        most_common_day: mode(trips.iter().map(TripRecord::day_name)),
        most_common_hour: mode(trips.iter().map(TripRecord::hour)),
    }
}
