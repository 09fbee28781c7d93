//! CSV loader for per-city trip records.
//!
//! Every row must carry a parseable `Start Time` and `Trip Duration` and
//! non-blank station names; the first row that does not aborts the load with
//! [`LoadError::MalformedRecord`].

use crate::catalog::Catalog;
use crate::error::LoadError;
use crate::filters::{DayFilter, FilterCriteria, MonthFilter, weekday_name};
use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

const START_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Row shape as it appears in the source files. Unknown columns (such as the
/// unnamed index column some exports carry) are ignored.
#[derive(Debug, Deserialize)]
struct SourceRow {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time", default)]
    end_time: Option<String>,
    #[serde(rename = "Trip Duration")]
    trip_duration: f64,
    #[serde(rename = "Start Station")]
    start_station: String,
    #[serde(rename = "End Station")]
    end_station: String,
    #[serde(rename = "User Type", default)]
    user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<f64>,
}

/// A single parsed trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    pub end_time: Option<String>,
    pub trip_duration: f64,
    pub start_station: String,
    pub end_station: String,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
    /// The row exactly as read, for raw display.
    pub raw: StringRecord,
}

impl TripRecord {
    /// 1-based month of `start_time`.
    pub fn month(&self) -> u32 {
        self.start_time.month()
    }

    pub fn weekday(&self) -> Weekday {
        self.start_time.weekday()
    }

    pub fn day_name(&self) -> &'static str {
        weekday_name(self.weekday())
    }

    pub fn hour(&self) -> u32 {
        self.start_time.hour()
    }
}

/// Filtered records of one city, in source order.
#[derive(Debug, Clone)]
pub struct TripSet {
    pub city: String,
    pub demographics: bool,
    pub headers: StringRecord,
    pub trips: Vec<TripRecord>,
}

impl TripSet {
    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}

/// Reads the city's dataset and applies the month and day filters.
#[tracing::instrument(skip(catalog, criteria), fields(criteria = %criteria))]
pub fn load_trips(catalog: &Catalog, criteria: &FilterCriteria) -> Result<TripSet, LoadError> {
    let entry = catalog
        .get(&criteria.city)
        .ok_or_else(|| LoadError::DatasetNotFound {
            city: criteria.city.clone(),
        })?;

    let (headers, trips) = read_trips(&entry.source, entry.demographics)?;
    let total = trips.len();
    let trips = filter_trips(trips, criteria.month, criteria.day);

    info!(total, kept = trips.len(), "Trips loaded");
    Ok(TripSet {
        city: criteria.city.clone(),
        demographics: entry.demographics,
        headers,
        trips,
    })
}

/// Parses every row of a trip CSV. Gender and birth year are only kept when
/// `demographics` is set.
pub fn read_trips(
    path: &Path,
    demographics: bool,
) -> Result<(StringRecord, Vec<TripRecord>), LoadError> {
    let unavailable = |source: csv::Error| LoadError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    };

    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(path)
        .map_err(unavailable)?;
    let headers = rdr.headers().map_err(unavailable)?.clone();
    debug!(path = %path.display(), columns = headers.len(), "Reading trips");

    let mut trips = Vec::new();
    for result in rdr.records() {
        let raw = result.map_err(|e| LoadError::MalformedRecord {
            line: e.position().map_or(0, |p| p.line()),
            reason: e.to_string(),
        })?;
        let line = raw.position().map_or(0, |p| p.line());
        let malformed = |reason: String| LoadError::MalformedRecord { line, reason };

        let row: SourceRow = raw
            .deserialize(Some(&headers))
            .map_err(|e| malformed(e.to_string()))?;
        let start_time = parse_start_time(&row.start_time)
            .ok_or_else(|| malformed(format!("unparseable start time '{}'", row.start_time)))?;
        if row.start_station.is_empty() || row.end_station.is_empty() {
            return Err(malformed("blank station name".to_string()));
        }
        if !row.trip_duration.is_finite() || row.trip_duration < 0.0 {
            return Err(malformed(format!(
                "invalid trip duration {}",
                row.trip_duration
            )));
        }

        let (gender, birth_year) = if demographics {
            (
                row.gender,
                row.birth_year.filter(|y| y.is_finite()).map(|y| y as i32),
            )
        } else {
            (None, None)
        };

        trips.push(TripRecord {
            start_time,
            end_time: row.end_time,
            trip_duration: row.trip_duration,
            start_station: row.start_station,
            end_station: row.end_station,
            user_type: row.user_type,
            gender,
            birth_year,
            raw,
        });
    }

    Ok((headers, trips))
}

/// Keeps the trips matching both filters. Pure and idempotent.
pub fn filter_trips(trips: Vec<TripRecord>, month: MonthFilter, day: DayFilter) -> Vec<TripRecord> {
    trips
        .into_iter()
        .filter(|t| month.matches(t.month()))
        .filter(|t| day.matches(t.weekday()))
        .collect()
}

fn parse_start_time(s: &str) -> Option<NaiveDateTime> {
    START_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::Vocabulary;
    use std::io::Write;

    const HEADER: &str = ",Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year";

    fn write_csv(rows: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file
    }

    #[test]
    fn test_parse_start_time_formats() {
        let expected = NaiveDateTime::parse_from_str("2017-06-23 15:09:32", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(parse_start_time("2017-06-23 15:09:32"), Some(expected));
        assert_eq!(parse_start_time("2017-06-23T15:09:32"), Some(expected));
        assert!(parse_start_time("2017-06-23 15:09:32.250").is_some());
        assert!(parse_start_time("23/06/2017").is_none());
        assert!(parse_start_time("").is_none());
    }

    #[test]
    fn test_read_trips_derives_time_parts() {
        let file = write_csv(&[
            "0,2017-06-23 15:09:32,2017-06-23 15:14:53,321,Wood St,Lake St,Subscriber,Male,1992.0",
        ]);
        let (headers, trips) = read_trips(file.path(), true).unwrap();
        assert_eq!(headers.len(), 9);
        let trip = &trips[0];
        assert_eq!(trip.month(), 6);
        assert_eq!(trip.day_name(), "Friday");
        assert_eq!(trip.hour(), 15);
        assert_eq!(trip.trip_duration, 321.0);
        assert_eq!(trip.gender.as_deref(), Some("Male"));
        assert_eq!(trip.birth_year, Some(1992));
        assert_eq!(&trip.raw[4], "Wood St");
    }

    #[test]
    fn test_blank_optional_fields_are_absent() {
        let file = write_csv(&["0,2017-01-01 00:07:57,,99.5,A,B,,,"]);
        let (_, trips) = read_trips(file.path(), true).unwrap();
        assert_eq!(trips[0].end_time, None);
        assert_eq!(trips[0].user_type, None);
        assert_eq!(trips[0].gender, None);
        assert_eq!(trips[0].birth_year, None);
    }

    #[test]
    fn test_demographics_dropped_for_plain_city() {
        let file = write_csv(&["0,2017-01-01 00:07:57,,10,A,B,Customer,Female,1980"]);
        let (_, trips) = read_trips(file.path(), false).unwrap();
        assert_eq!(trips[0].gender, None);
        assert_eq!(trips[0].birth_year, None);
    }

    #[test]
    fn test_bad_start_time_is_malformed() {
        let file = write_csv(&[
            "0,2017-01-01 00:07:57,,10,A,B,Customer,,",
            "1,yesterday,,10,A,B,Customer,,",
        ]);
        match read_trips(file.path(), false) {
            Err(LoadError::MalformedRecord { line, reason }) => {
                assert_eq!(line, 3);
                assert!(reason.contains("yesterday"));
            }
            other => panic!("expected malformed record, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_duration_is_malformed() {
        let file = write_csv(&["0,2017-01-01 00:07:57,,abc,A,B,Customer,,"]);
        assert!(matches!(
            read_trips(file.path(), false),
            Err(LoadError::MalformedRecord { line: 2, .. })
        ));

        let file = write_csv(&["0,2017-01-01 00:07:57,,-5,A,B,Customer,,"]);
        assert!(matches!(
            read_trips(file.path(), false),
            Err(LoadError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_blank_station_is_malformed() {
        let file = write_csv(&["0,2017-01-01 00:07:57,,10,,B,Customer,,"]);
        match read_trips(file.path(), false) {
            Err(LoadError::MalformedRecord { line, reason }) => {
                assert_eq!(line, 2);
                assert!(reason.contains("station"));
            }
            other => panic!("expected malformed record, got {other:?}"),
        }

        let file = write_csv(&["0,2017-01-01 00:07:57,,10,A,  ,Customer,,"]);
        assert!(matches!(
            read_trips(file.path(), false),
            Err(LoadError::MalformedRecord { line: 2, .. })
        ));
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let err = read_trips(Path::new("/nonexistent/trips.csv"), false).unwrap_err();
        assert!(matches!(err, LoadError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_unknown_city_is_dataset_not_found() {
        let catalog = Catalog::with_data_dir(".");
        let criteria = FilterCriteria {
            city: "boston".to_string(),
            month: MonthFilter::All,
            day: DayFilter::All,
        };
        let err = load_trips(&catalog, &criteria).unwrap_err();
        assert!(matches!(err, LoadError::DatasetNotFound { city } if city == "boston"));
    }

    #[test]
    fn test_filter_trips_month_and_day() {
        let file = write_csv(&[
            "0,2017-03-06 08:00:00,,10,A,B,Subscriber,,", // Monday, March
            "1,2017-03-07 08:00:00,,10,A,B,Subscriber,,", // Tuesday, March
            "2,2017-04-03 08:00:00,,10,A,B,Subscriber,,", // Monday, April
        ]);
        let (_, trips) = read_trips(file.path(), false).unwrap();
        let vocab = Vocabulary::default();
        let march = crate::filters::parse_month(&vocab, "march").unwrap();
        let monday = crate::filters::parse_day(&vocab, "monday").unwrap();

        assert_eq!(filter_trips(trips.clone(), march, DayFilter::All).len(), 2);
        assert_eq!(filter_trips(trips.clone(), MonthFilter::All, monday).len(), 2);

        let both = filter_trips(trips.clone(), march, monday);
        assert_eq!(both.len(), 1);
        assert_eq!(&both[0].raw[0], "0");

        assert_eq!(filter_trips(both.clone(), march, monday), both);
        assert_eq!(filter_trips(trips.clone(), MonthFilter::All, DayFilter::All), trips);
    }
}
