//! One table view: a record store plus its filter and page state.
//!
//! The filtered set and the visible page are always derived on demand from
//! the store and the current state; nothing is cached between calls, so a
//! mutation is reflected by the next read without any invalidation step.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use tdv_model::{
    ExportFormat, ExportJob, FilterState, ID_FIELD, ModelError, PageState, Record, RecordId,
    ViewConfig,
};

use crate::paginate::Page;
use crate::predicate::FilterPredicate;
use crate::store::{RecordStore, StoreError};
use crate::validation::{SubmissionRules, ValidationErrors};

#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("invalid submission: {0}")]
    Invalid(#[from] ValidationErrors),
}

pub type Result<T> = std::result::Result<T, ViewError>;

#[derive(Debug, Clone)]
pub struct TableView {
    config: ViewConfig,
    store: RecordStore,
    filter: FilterState,
    page: PageState,
    rules: SubmissionRules,
}

impl TableView {
    pub fn new(config: ViewConfig, records: Vec<Record>) -> Result<Self> {
        let store = RecordStore::from_records(records)?;
        let filter = config.initial_filter();
        let page = config.initial_page()?;
        let rules = SubmissionRules::from_config(&config);
        debug!(view = %config.name, records = store.len(), "table view created");
        Ok(Self {
            config,
            store,
            filter,
            page,
            rules,
        })
    }

    #[must_use]
    pub fn with_rules(mut self, rules: SubmissionRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    pub fn page_state(&self) -> PageState {
        self.page
    }

    /// Replace the filter state. Any change resets the page index to 0.
    /// Returns whether the state changed.
    pub fn set_filter(&mut self, state: FilterState) -> Result<bool> {
        self.config.validate_filter(&state)?;
        if state == self.filter {
            return Ok(false);
        }
        debug!(view = %self.config.name, search = %state.search_term, "filter changed");
        self.filter = state;
        self.page = self.page.first();
        Ok(true)
    }

    /// Jump to a page. Indices past the end are kept as-is and render an
    /// empty page.
    pub fn set_page_index(&mut self, page_index: usize) {
        self.page = self.page.with_page_index(page_index);
    }

    /// Change the page size, clamping the current index into range.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        let total = self.filtered_count();
        self.page = self.page.resize(page_size, total)?;
        Ok(())
    }

    pub fn next_page(&mut self) -> bool {
        let last = self.page.last_index(self.filtered_count());
        if self.page.page_index() >= last {
            return false;
        }
        self.page = self.page.with_page_index(self.page.page_index() + 1);
        true
    }

    pub fn previous_page(&mut self) -> bool {
        match self.page.page_index().checked_sub(1) {
            Some(index) => {
                self.page = self.page.with_page_index(index);
                true
            }
            None => false,
        }
    }

    /// Records matching the current filter, in store order.
    pub fn filtered(&self) -> Vec<&Record> {
        FilterPredicate::new(&self.config, &self.filter).filter(self.store.records())
    }

    pub fn filtered_count(&self) -> usize {
        let predicate = FilterPredicate::new(&self.config, &self.filter);
        self.store.iter().filter(|record| predicate.matches(record)).count()
    }

    pub fn page(&self) -> Page<&Record> {
        Page::build(&self.filtered(), self.page)
    }

    /// Fill in the view's defaults, validate and append a submitted record.
    /// A record whose id is absent or null gets the next free integer id;
    /// any other id must be usable as-is.
    pub fn submit(&mut self, mut record: Record, today: NaiveDate) -> Result<RecordId> {
        self.fill_defaults(&mut record, today);
        self.rules.validate(&record)?;
        let id = match record.fields().get(ID_FIELD) {
            None | Some(Value::Null) => {
                let id = self.store.next_id();
                record.insert(ID_FIELD, id.clone());
                id
            }
            Some(_) => record.id().ok_or(StoreError::MissingId)?,
        };
        self.store.append(record)?;
        self.clamp_page();
        info!(view = %self.config.name, %id, "record submitted");
        Ok(id)
    }

    fn fill_defaults(&self, record: &mut Record, today: NaiveDate) {
        for (field, value) in self.config.submit_defaults.fields() {
            if matches!(record.fields().get(field), None | Some(Value::Null)) {
                record.insert(field.clone(), value.clone());
            }
        }
        if let Some(field) = &self.config.created_stamp {
            record.insert(field.clone(), today.to_string());
        }
    }

    pub fn update_field(
        &mut self,
        id: &RecordId,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<&Record> {
        self.store.update_field(id, field, value)?;
        self.after_mutation(id)
    }

    /// Merge an edit form into a record, stamping the view's edit-date field.
    pub fn update(&mut self, id: &RecordId, mut patch: Record, today: NaiveDate) -> Result<&Record> {
        if let Some(field) = &self.config.updated_stamp {
            patch.insert(field.clone(), today.to_string());
        }
        self.store.update(id, patch)?;
        self.after_mutation(id)
    }

    pub fn modify<F>(&mut self, id: &RecordId, edit: F) -> Result<&Record>
    where
        F: FnOnce(&mut Record),
    {
        self.store.modify(id, edit)?;
        self.after_mutation(id)
    }

    /// An edited record may drop out of the filter; keep the index in range.
    fn after_mutation(&mut self, id: &RecordId) -> Result<&Record> {
        self.clamp_page();
        self.store
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()).into())
    }

    fn clamp_page(&mut self) {
        let total = self.filtered_count();
        self.page = self.page.clamp(total);
    }

    /// Delete a record and pull the page index back if its page emptied.
    pub fn remove(&mut self, id: &RecordId) -> Result<Record> {
        let removed = self.store.remove(id)?;
        self.clamp_page();
        info!(view = %self.config.name, %id, "record removed");
        Ok(removed)
    }

    /// Snapshot the full filtered set (not just the visible page) for export.
    pub fn export_job(&self, format: ExportFormat, requested_at: NaiveDateTime) -> ExportJob {
        let records = self.filtered().into_iter().cloned().collect();
        ExportJob::new(format, self.config.export_label.clone(), records, requested_at)
            .with_date_suffix(self.config.date_suffix)
    }
}
