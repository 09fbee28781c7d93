use crate::loader::TripRecord;
use crate::stats::utility::mode;
use serde::Serialize;

/// An ordered start → end station combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationPair {
    pub start_station: String,
    pub end_station: String,
}

/// Most popular stations and trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationStats {
    pub most_common_start_station: Option<String>,
    pub most_common_end_station: Option<String>,
    pub most_common_trip: Option<StationPair>,
}

#[tracing::instrument(skip_all, fields(trips = trips.len()))]
pub fn station_stats(trips: &[TripRecord]) -> StationStats {
    let pair = mode(
        trips
            .iter()
            .map(|t| (t.start_station.as_str(), t.end_station.as_str())),
    );

    StationStats {
        most_common_start_station: mode(trips.iter().map(|t| t.start_station.as_str()))
            .map(str::to_string),
        most_common_end_station: mode(trips.iter().map(|t| t.end_station.as_str()))
            .map(str::to_string),
        most_common_trip: pair.map(|(start, end)| StationPair {
            start_station: start.to_string(),
            end_station: end.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::test_support::trip;

    #[test]
    fn test_station_stats() {
        let trips = vec![
            trip("2017-01-02 08:00:00", 60.0, "Canal St", "Lake St"),
            trip("2017-01-02 09:00:00", 60.0, "Canal St", "Wood St"),
            trip("2017-01-02 10:00:00", 60.0, "Lake St", "Wood St"),
            trip("2017-01-02 11:00:00", 60.0, "Lake St", "Canal St"),
            trip("2017-01-02 12:00:00", 60.0, "Lake St", "Canal St"),
        ];
        let stats = station_stats(&trips);
        assert_eq!(stats.most_common_start_station.as_deref(), Some("Lake St"));
        // Canal St and Wood St tie at 2; the smaller name wins.
        assert_eq!(stats.most_common_end_station.as_deref(), Some("Canal St"));
        assert_eq!(
            stats.most_common_trip,
            Some(StationPair {
                start_station: "Lake St".into(),
                end_station: "Canal St".into(),
            })
        );
    }

    #[test]
    fn test_station_pairs_are_ordered() {
        let trips = vec![
            trip("2017-01-02 08:00:00", 60.0, "B", "A"),
            trip("2017-01-02 08:00:00", 60.0, "A", "B"),
            trip("2017-01-02 08:00:00", 60.0, "C", "D"),
            trip("2017-01-02 08:00:00", 60.0, "C", "D"),
        ];
        let pair = station_stats(&trips).most_common_trip.unwrap();
        assert_eq!(pair.start_station, "C");
        assert_eq!(pair.end_station, "D");
    }

    #[test]
    fn test_station_stats_empty() {
        let stats = station_stats(&[]);
        assert_eq!(stats.most_common_start_station, None);
        assert_eq!(stats.most_common_end_station, None);
        assert_eq!(stats.most_common_trip, None);
    }
}
