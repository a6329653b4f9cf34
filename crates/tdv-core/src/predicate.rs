//! Filter predicate shared by every table view.
//!
//! A record passes when it matches the search term (case-insensitive
//! substring over the configured search fields, OR-ed), every active field
//! filter (exact match), and the date range (inclusive, by calendar day).
//! The predicate is a pure function of its inputs.

use tdv_model::{FilterState, Record, ViewConfig};

use crate::date::{record_day, within};

/// Pre-computed predicate for one (config, filter state) pair.
#[derive(Debug, Clone)]
pub struct FilterPredicate<'a> {
    config: &'a ViewConfig,
    state: &'a FilterState,
    needle: String,
}

impl<'a> FilterPredicate<'a> {
    pub fn new(config: &'a ViewConfig, state: &'a FilterState) -> Self {
        Self {
            config,
            state,
            needle: state.search_term.to_lowercase(),
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.matches_search(record) && self.matches_fields(record) && self.matches_dates(record)
    }

    /// Empty terms match everything, as do views without search fields.
    pub fn matches_search(&self, record: &Record) -> bool {
        if self.needle.is_empty() || self.config.search_fields.is_empty() {
            return true;
        }
        self.config.search_fields.iter().any(|field| {
            record
                .text(field)
                .is_some_and(|text| text.to_lowercase().contains(&self.needle))
        })
    }

    /// Exact, case-sensitive match for every filter not set to `all`.
    /// A missing or null field never matches.
    pub fn matches_fields(&self, record: &Record) -> bool {
        self.state
            .active_filters()
            .all(|(field, wanted)| record.text(field).is_some_and(|value| value == wanted))
    }

    pub fn matches_dates(&self, record: &Record) -> bool {
        if !self.state.has_date_range() {
            return true;
        }
        let Some(field) = self.config.date_field.as_deref() else {
            return true;
        };
        record_day(record, field)
            .is_some_and(|day| within(day, self.state.date_from, self.state.date_to))
    }

    /// Matching records, in input order.
    pub fn filter<'r>(&self, records: &'r [Record]) -> Vec<&'r Record> {
        records.iter().filter(|record| self.matches(record)).collect()
    }
}

/// One-shot form of [`FilterPredicate::matches`].
pub fn matches(record: &Record, config: &ViewConfig, state: &FilterState) -> bool {
    FilterPredicate::new(config, state).matches(record)
}

/// One-shot form of [`FilterPredicate::filter`].
pub fn filter_records<'r>(
    records: &'r [Record],
    config: &ViewConfig,
    state: &FilterState,
) -> Vec<&'r Record> {
    FilterPredicate::new(config, state).filter(records)
}
