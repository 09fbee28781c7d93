//! Output formatting for statistics reports and raw rows.
//!
//! Supports plain-text sections, JSON serialization, and aligned raw-row
//! pages.

use anyhow::Result;
use csv::StringRecord;
use std::io::Write;
use std::time::Duration;
use tracing::debug;

use crate::filters::SEPARATOR;
use crate::loader::TripRecord;
use crate::stats::{DurationStats, Report, StationStats, TimeStats, UserStats, ValueCount};

pub const NO_DATA: &str = "no data";

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

fn or_no_data<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| NO_DATA.to_string(), |v| v.to_string())
}

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &Report) {
    debug!("{:#?}", report);
}

/// Writes the whole report as pretty-printed JSON.
pub fn print_json(w: &mut impl Write, report: &Report) -> Result<()> {
    serde_json::to_writer_pretty(&mut *w, report)?;
    writeln!(w)?;
    Ok(())
}

pub fn render_time(w: &mut impl Write, stats: &TimeStats) -> Result<()> {
    writeln!(w, "\nCalculating The Most Frequent Times of Travel...\n")?;
    let month = stats.most_common_month.map(|m| {
        let name = MONTH_NAMES.get(m as usize - 1).copied().unwrap_or("?");
        format!("{m} ({name})")
    });
    writeln!(w, "Most common month: {}", or_no_data(month))?;
    writeln!(w, "Most common day of week: {}", or_no_data(stats.most_common_day))?;
    writeln!(w, "Most common start hour: {}", or_no_data(stats.most_common_hour))?;
    Ok(())
}

pub fn render_station(w: &mut impl Write, stats: &StationStats) -> Result<()> {
    writeln!(w, "\nCalculating The Most Popular Stations and Trip...\n")?;
    writeln!(
        w,
        "Most commonly used start station: {}",
        or_no_data(stats.most_common_start_station.as_deref())
    )?;
    writeln!(
        w,
        "Most commonly used end station: {}",
        or_no_data(stats.most_common_end_station.as_deref())
    )?;
    match &stats.most_common_trip {
        Some(pair) => writeln!(
            w,
            "Most frequent trip: {} -> {}",
            pair.start_station, pair.end_station
        )?,
        None => writeln!(w, "Most frequent trip: {NO_DATA}")?,
    }
    Ok(())
}

pub fn render_duration(w: &mut impl Write, stats: &DurationStats) -> Result<()> {
    writeln!(w, "\nCalculating Trip Duration...\n")?;
    writeln!(w, "Total travel time: {}", stats.total_duration)?;
    writeln!(
        w,
        "Mean travel time: {}",
        or_no_data(stats.mean_duration.map(|m| format!("{m:.1}")))
    )?;
    Ok(())
}

fn render_counts(w: &mut impl Write, title: &str, counts: &[ValueCount]) -> Result<()> {
    writeln!(w, "{title}:")?;
    if counts.is_empty() {
        writeln!(w, "  {NO_DATA}")?;
        return Ok(());
    }
    let width = counts.iter().map(|c| c.value.len()).max().unwrap_or(0);
    for c in counts {
        writeln!(w, "  {:<width$}  {}", c.value, c.count)?;
    }
    Ok(())
}

pub fn render_user(w: &mut impl Write, stats: &UserStats) -> Result<()> {
    writeln!(w, "\nCalculating User Stats...\n")?;
    render_counts(w, "Counts of user types", &stats.user_types)?;

    if let Some(demo) = &stats.demographics {
        render_counts(w, "Counts of gender", &demo.genders)?;
        writeln!(w, "Earliest year of birth: {}", or_no_data(demo.earliest_birth_year))?;
        writeln!(
            w,
            "Most recent year of birth: {}",
            or_no_data(demo.most_recent_birth_year)
        )?;
        writeln!(
            w,
            "Most common year of birth: {}",
            or_no_data(demo.most_common_birth_year)
        )?;
    }
    Ok(())
}

/// Closing line of a section: elapsed time and a separator.
pub fn render_elapsed(w: &mut impl Write, elapsed: Duration) -> Result<()> {
    writeln!(w, "\nThis took {:.6} seconds.", elapsed.as_secs_f64())?;
    writeln!(w, "{SEPARATOR}")?;
    Ok(())
}

/// Writes all four sections without timings.
pub fn render_report(w: &mut impl Write, report: &Report) -> Result<()> {
    render_time(w, &report.time)?;
    render_station(w, &report.station)?;
    render_duration(w, &report.duration)?;
    render_user(w, &report.user)?;
    writeln!(w, "{SEPARATOR}")?;
    Ok(())
}

/// Writes a page of raw rows under the source header, columns padded to the
/// widest cell.
pub fn render_rows(w: &mut impl Write, headers: &StringRecord, page: &[TripRecord]) -> Result<()> {
    let mut widths: Vec<usize> = headers.iter().map(str::len).collect();
    for trip in page {
        for (i, field) in trip.raw.iter().enumerate() {
            match widths.get_mut(i) {
                Some(width) => *width = (*width).max(field.len()),
                None => widths.push(field.len()),
            }
        }
    }

    writeln!(w, "{}", pad_line(headers.iter(), &widths))?;
    for trip in page {
        writeln!(w, "{}", pad_line(trip.raw.iter(), &widths))?;
    }
    Ok(())
}

fn pad_line<'a>(fields: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    fields
        .zip(widths)
        .map(|(f, &width)| format!("{f:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}
