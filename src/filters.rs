//! Filter criteria and the interactive collector that produces them.

use crate::catalog::{Catalog, normalize_key};
use crate::console::Console;
use crate::error::{ConsoleError, FilterError};
use chrono::Weekday;
use std::fmt;
use std::io::{BufRead, Write};
use tracing::debug;

pub const SEPARATOR: &str = "----------------------------------------";

/// Accepted month and weekday names, lowercase, in calendar order.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    months: Vec<&'static str>,
    days: Vec<(&'static str, Weekday)>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            months: vec!["january", "february", "march", "april", "may", "june"],
            days: vec![
                ("monday", Weekday::Mon),
                ("tuesday", Weekday::Tue),
                ("wednesday", Weekday::Wed),
                ("thursday", Weekday::Thu),
                ("friday", Weekday::Fri),
                ("saturday", Weekday::Sat),
                ("sunday", Weekday::Sun),
            ],
        }
    }
}

impl Vocabulary {
    pub fn months(&self) -> &[&'static str] {
        &self.months
    }

    pub fn days(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.days.iter().map(|&(name, _)| name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthFilter {
    All,
    /// `index` is 1-based (January = 1).
    Only { index: u32, name: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayFilter {
    All,
    Only(Weekday),
}

impl MonthFilter {
    pub fn matches(&self, month: u32) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Only { index, .. } => *index == month,
        }
    }

    pub fn label(&self) -> &'static str {
        match *self {
            MonthFilter::All => "all",
            MonthFilter::Only { name, .. } => name,
        }
    }
}

impl DayFilter {
    pub fn matches(&self, day: Weekday) -> bool {
        match self {
            DayFilter::All => true,
            DayFilter::Only(wanted) => *wanted == day,
        }
    }

    pub fn label(&self) -> String {
        match self {
            DayFilter::All => "all".to_string(),
            DayFilter::Only(day) => weekday_name(*day).to_lowercase(),
        }
    }
}

/// A validated (city, month, day) triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub city: String,
    pub month: MonthFilter,
    pub day: DayFilter,
}

impl FilterCriteria {
    /// Validates all three raw values at once.
    pub fn parse(
        catalog: &Catalog,
        vocab: &Vocabulary,
        city: &str,
        month: &str,
        day: &str,
    ) -> Result<Self, FilterError> {
        Ok(Self {
            city: parse_city(catalog, city)?,
            month: parse_month(vocab, month)?,
            day: parse_day(vocab, day)?,
        })
    }
}

impl fmt::Display for FilterCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "city={} month={} day={}",
            self.city,
            self.month.label(),
            self.day.label()
        )
    }
}

/// Full capitalized weekday name, e.g. `"Monday"`.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn parse_city(catalog: &Catalog, input: &str) -> Result<String, FilterError> {
    let city = normalize_key(input);
    if catalog.contains(&city) {
        Ok(city)
    } else {
        Err(FilterError::invalid("city", input))
    }
}

pub fn parse_month(vocab: &Vocabulary, input: &str) -> Result<MonthFilter, FilterError> {
    let month = input.trim().to_lowercase();
    if month == "all" {
        return Ok(MonthFilter::All);
    }
    vocab
        .months
        .iter()
        .position(|&m| m == month)
        .map(|i| MonthFilter::Only {
            index: i as u32 + 1,
            name: vocab.months[i],
        })
        .ok_or_else(|| FilterError::invalid("month", input))
}

pub fn parse_day(vocab: &Vocabulary, input: &str) -> Result<DayFilter, FilterError> {
    let day = input.trim().to_lowercase();
    if day == "all" {
        return Ok(DayFilter::All);
    }
    vocab
        .days
        .iter()
        .find(|&&(name, _)| name == day)
        .map(|&(_, weekday)| DayFilter::Only(weekday))
        .ok_or_else(|| FilterError::invalid("day", input))
}

/// Prompts until city, month and day are all valid.
///
/// Invalid answers print a warning and are asked again; the loop only ends
/// early if the input stream closes.
pub fn collect_filters<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    catalog: &Catalog,
    vocab: &Vocabulary,
) -> Result<FilterCriteria, ConsoleError> {
    console.say("Hello! Let's explore some US bikeshare data!")?;

    let city_names: Vec<String> = catalog.cities().map(title_case).collect();
    let city_prompt = format!("Type the name of the city ({}): ", city_names.join(", "));
    let city = ask_until(
        console,
        &city_prompt,
        &city_prompt,
        "Warning, invalid input. Enter a valid city name.",
        |s| parse_city(catalog, s),
    )?;
    console.say(&format!("You entered: {city}"))?;

    let month_prompt = format!(
        "Type the name of the month (all, {}, ..., {}): ",
        title_case(vocab.months.first().copied().unwrap_or("january")),
        title_case(vocab.months.last().copied().unwrap_or("june")),
    );
    let month = ask_until(
        console,
        &month_prompt,
        &month_prompt,
        "Warning, invalid input. Enter a valid month.",
        |s| parse_month(vocab, s),
    )?;
    console.say(&format!("You entered: {}", month.label()))?;

    let day_names: Vec<String> = vocab.days().map(title_case).collect();
    let day_prompt = "Enter the day of the week (all, Monday, Tuesday, ... Sunday): ";
    let day_retry = format!(
        "Type the name of the day you want to analyse (all, {}): ",
        day_names.join(", ")
    );
    let day_warning = format!(
        "Warning, invalid input. Enter one of the following: all, {}.",
        day_names.join(", ")
    );
    let day = ask_until(console, day_prompt, &day_retry, &day_warning, |s| parse_day(vocab, s))?;
    console.say(&format!("You entered: {}", day.label()))?;

    console.say(SEPARATOR)?;
    Ok(FilterCriteria { city, month, day })
}

fn ask_until<R: BufRead, W: Write, T>(
    console: &mut Console<R, W>,
    prompt: &str,
    retry_prompt: &str,
    warning: &str,
    parse: impl Fn(&str) -> Result<T, FilterError>,
) -> Result<T, ConsoleError> {
    let mut answer = console.ask(prompt)?;
    loop {
        match parse(&answer) {
            Ok(value) => return Ok(value),
            Err(e) => {
                debug!(error = %e, "Rejected filter input");
                console.say(warning)?;
                answer = console.ask(retry_prompt)?;
            }
        }
    }
}

/// "new york city" -> "New York City"
fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(input: &str) -> (Result<FilterCriteria, ConsoleError>, String) {
        let catalog = Catalog::with_data_dir(".");
        let vocab = Vocabulary::default();
        let mut console = Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        let result = collect_filters(&mut console, &catalog, &vocab);
        let out = String::from_utf8(console.into_output()).unwrap();
        (result, out)
    }

    #[test]
    fn test_parse_month_case_insensitive() {
        let vocab = Vocabulary::default();
        assert_eq!(
            parse_month(&vocab, "March").unwrap(),
            MonthFilter::Only {
                index: 3,
                name: "march"
            }
        );
        assert_eq!(parse_month(&vocab, "ALL").unwrap(), MonthFilter::All);
        assert!(parse_month(&vocab, "july").is_err());
        assert!(parse_month(&vocab, "").is_err());
    }

    #[test]
    fn test_parse_day() {
        let vocab = Vocabulary::default();
        assert_eq!(
            parse_day(&vocab, "sUnDaY").unwrap(),
            DayFilter::Only(Weekday::Sun)
        );
        assert_eq!(parse_day(&vocab, "all").unwrap(), DayFilter::All);
        assert_eq!(
            parse_day(&vocab, "wednesdays").unwrap_err(),
            FilterError::invalid("day", "wednesdays")
        );
    }

    #[test]
    fn test_parse_city_trims_and_lowercases() {
        let catalog = Catalog::with_data_dir(".");
        assert_eq!(parse_city(&catalog, "  New York City ").unwrap(), "new york city");
        assert!(parse_city(&catalog, "boston").is_err());
    }

    #[test]
    fn test_collect_valid_first_try() {
        let (result, out) = run("Chicago\nall\nall\n");
        let criteria = result.unwrap();
        assert_eq!(criteria.city, "chicago");
        assert_eq!(criteria.month, MonthFilter::All);
        assert_eq!(criteria.day, DayFilter::All);
        assert!(out.contains("Chicago, New York City, Washington"));
        assert!(!out.contains("Warning"));
    }

    #[test]
    fn test_collect_reprompts_each_field() {
        let (result, out) =
            run("boston\nparis\nWashington\njuly\nMarch\nfunday\nsomeday\nFriday\n");
        let criteria = result.unwrap();
        assert_eq!(criteria.city, "washington");
        assert_eq!(criteria.month.label(), "march");
        assert_eq!(criteria.day, DayFilter::Only(Weekday::Fri));

        assert_eq!(out.matches("Enter a valid city name.").count(), 2);
        assert_eq!(out.matches("Enter a valid month.").count(), 1);
        assert_eq!(out.matches("Enter one of the following").count(), 2);
        assert!(out.contains("Type the name of the day you want to analyse"));
    }

    #[test]
    fn test_collect_stops_when_input_closes() {
        let (result, _) = run("boston\n");
        assert!(matches!(result, Err(ConsoleError::InputClosed)));
    }

    #[test]
    fn test_criteria_display_is_lowercase() {
        let catalog = Catalog::with_data_dir(".");
        let vocab = Vocabulary::default();
        let criteria =
            FilterCriteria::parse(&catalog, &vocab, "New York City", "June", "Tuesday").unwrap();
        assert_eq!(
            criteria.to_string(),
            "city=new york city month=june day=tuesday"
        );
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("new york city"), "New York City");
        assert_eq!(title_case("monday"), "Monday");
    }
}
