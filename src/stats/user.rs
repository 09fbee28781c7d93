use crate::loader::TripRecord;
use crate::stats::utility::{ValueCount, mode, value_counts};
use serde::Serialize;

/// Gender and birth year breakdown, only for cities that record them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Demographics {
    pub genders: Vec<ValueCount>,
    pub earliest_birth_year: Option<i32>,
    pub most_recent_birth_year: Option<i32>,
    pub most_common_birth_year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub user_types: Vec<ValueCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demographics: Option<Demographics>,
}

/// Counts riders by type, plus demographics when `demographics` is set.
/// Blank cells are left out of every count.
#[tracing::instrument(skip(trips), fields(trips = trips.len()))]
pub fn user_stats(trips: &[TripRecord], demographics: bool) -> UserStats {
    let user_types = value_counts(trips.iter().filter_map(|t| t.user_type.as_deref()));

    let demographics = demographics.then(|| {
        let years: Vec<i32> = trips.iter().filter_map(|t| t.birth_year).collect();
        Demographics {
            genders: value_counts(trips.iter().filter_map(|t| t.gender.as_deref())),
            earliest_birth_year: years.iter().copied().min(),
            most_recent_birth_year: years.iter().copied().max(),
            most_common_birth_year: mode(years.iter().copied()),
        }
    });

    UserStats {
        user_types,
        demographics,
    }
}
