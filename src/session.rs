//! Interactive session loop: filters, load, statistics, raw rows, restart.

use crate::catalog::Catalog;
use crate::console::Console;
use crate::error::ConsoleError;
use crate::filters::{FilterCriteria, Vocabulary, collect_filters};
use crate::loader::{TripSet, load_trips};
use crate::output::{
    render_duration, render_elapsed, render_rows, render_station, render_time, render_user,
};
use crate::pager::RowPager;
use crate::stats::{duration_stats, station_stats, time_stats, user_stats};
use anyhow::Result;
use std::io::{BufRead, Write};
use std::time::Instant;
use tracing::{error, info};

enum Flow {
    Restart,
    Exit,
}

pub struct Session<'a, R, W> {
    console: Console<R, W>,
    catalog: &'a Catalog,
    vocab: &'a Vocabulary,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(console: Console<R, W>, catalog: &'a Catalog, vocab: &'a Vocabulary) -> Self {
        Self {
            console,
            catalog,
            vocab,
        }
    }

    /// Runs cycles until the operator declines to restart or input closes.
    pub fn run(&mut self) -> Result<()> {
        let mut cycles = 0usize;
        loop {
            cycles += 1;
            let span = tracing::info_span!("cycle", n = cycles);
            let _enter = span.enter();

            match self.cycle() {
                Ok(Flow::Restart) => continue,
                Ok(Flow::Exit) => break,
                Err(e) if matches!(e.downcast_ref::<ConsoleError>(), Some(ConsoleError::InputClosed)) => {
                    info!("Input closed, ending session");
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        info!(cycles, "Session finished");
        Ok(())
    }

    pub fn into_console(self) -> Console<R, W> {
        self.console
    }

    fn cycle(&mut self) -> Result<Flow> {
        let criteria = collect_filters(&mut self.console, self.catalog, self.vocab)?;
        let set = match load_trips(self.catalog, &criteria) {
            Ok(set) => set,
            Err(e) => {
                error!(error = %e, "Dataset load failed");
                self.console.say(&format!("Could not load data: {e}"))?;
                return Ok(Flow::Restart);
            }
        };

        self.show_statistics(&criteria, &set)?;

        if self
            .console
            .confirm("\nDo you want to see the first 5 rows of raw data? Type yes or no.\n")?
        {
            self.page_rows(&set)?;
        }

        if self
            .console
            .confirm("\nWould you like to restart? Enter yes or no.\n")?
        {
            Ok(Flow::Restart)
        } else {
            Ok(Flow::Exit)
        }
    }

    fn show_statistics(&mut self, criteria: &FilterCriteria, set: &TripSet) -> Result<()> {
        if set.is_empty() {
            self.console
                .say(&format!("No trips match {criteria}; statistics report no data."))?;
        }
        let out = self.console.out();

        let start = Instant::now();
        render_time(out, &time_stats(&set.trips))?;
        render_elapsed(out, start.elapsed())?;

        let start = Instant::now();
        render_station(out, &station_stats(&set.trips))?;
        render_elapsed(out, start.elapsed())?;

        let start = Instant::now();
        render_duration(out, &duration_stats(&set.trips))?;
        render_elapsed(out, start.elapsed())?;

        let start = Instant::now();
        render_user(out, &user_stats(&set.trips, set.demographics))?;
        render_elapsed(out, start.elapsed())?;
        Ok(())
    }

    fn page_rows(&mut self, set: &TripSet) -> Result<()> {
        let mut pager = RowPager::new();
        loop {
            let Some(page) = pager.next_page(&set.trips) else {
                self.console.say("No rows match the selected filters.")?;
                return Ok(());
            };
            render_rows(self.console.out(), &set.headers, page)?;

            if pager.is_exhausted(&set.trips) {
                self.console.say("\nNo more rows to display.")?;
                return Ok(());
            }
            if !self
                .console
                .confirm("\nDo you want to see the next 5 rows of raw data? Type yes or no.\n")?
            {
                return Ok(());
            }
        }
    }
}
