//! Descriptive statistics over a filtered trip set.
//!
//! Four independent routines (time of travel, stations, trip duration,
//! users), each a pure function of the trips. Empty input yields `None`
//! for every most-common value rather than an error.

pub mod duration;
pub mod station;
pub mod time;
pub mod user;
pub mod utility;

pub use duration::{DurationStats, duration_stats};
pub use station::{StationPair, StationStats, station_stats};
pub use time::{TimeStats, time_stats};
pub use user::{Demographics, UserStats, user_stats};
pub use utility::ValueCount;

use crate::loader::TripSet;
use serde::Serialize;

/// All four statistic sections for one trip set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub city: String,
    pub time: TimeStats,
    pub station: StationStats,
    pub duration: DurationStats,
    pub user: UserStats,
}

/// Runs every routine in display order: time, station, duration, user.
pub fn analyze(set: &TripSet) -> Report {
    Report {
        city: set.city.clone(),
        time: time_stats(&set.trips),
        station: station_stats(&set.trips),
        duration: duration_stats(&set.trips),
        user: user_stats(&set.trips, set.demographics),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use test_support::trip;

    #[test]
    fn test_analyze_empty_set() {
        let set = TripSet {
            city: "washington".into(),
            demographics: false,
            headers: csv::StringRecord::new(),
            trips: vec![],
        };
        let report = analyze(&set);
        assert_eq!(report.time.most_common_month, None);
        assert_eq!(report.station.most_common_trip, None);
        assert_eq!(report.duration.total_duration, 0.0);
        assert_eq!(report.duration.mean_duration, None);
        assert!(report.user.user_types.is_empty());
        assert!(report.user.demographics.is_none());
    }

    #[test]
    fn test_analyze_mean_matches_sum_over_count() {
        let set = TripSet {
            city: "chicago".into(),
            demographics: true,
            headers: csv::StringRecord::new(),
            trips: vec![
                trip("2017-05-01 07:00:00", 100.0, "A", "B"),
                trip("2017-05-01 07:30:00", 250.0, "B", "A"),
            ],
        };
        let report = analyze(&set);
        let d = &report.duration;
        assert_eq!(
            d.mean_duration,
            Some(utility::round_to(d.total_duration / d.trip_count as f64, 1))
        );
        assert!(report.user.demographics.is_some());
    }
}
