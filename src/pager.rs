//! Five-at-a-time paging over an already filtered trip set.

use crate::loader::TripRecord;

pub const PAGE_SIZE: usize = 5;

/// Cursor over the filtered records. Never reloads or refilters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RowPager {
    cursor: usize,
}

impl RowPager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the next `[cursor, cursor + 5)` slice, clipped to the end, or
    /// `None` once every record has been shown.
    pub fn next_page<'a>(&mut self, trips: &'a [TripRecord]) -> Option<&'a [TripRecord]> {
        if self.cursor >= trips.len() {
            return None;
        }
        let end = (self.cursor + PAGE_SIZE).min(trips.len());
        let page = &trips[self.cursor..end];
        self.cursor += PAGE_SIZE;
        Some(page)
    }

    pub fn is_exhausted(&self, trips: &[TripRecord]) -> bool {
        self.cursor >= trips.len()
    }
}
