//! In-memory record store for one screen.
//!
//! Records stay in insertion order. Every operation is a linear scan by id;
//! screens hold tens to low hundreds of rows.

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use tdv_model::{ID_FIELD, Record, RecordId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("record has no usable id")]
    MissingId,
    #[error("a record with id {0} already exists")]
    DuplicateId(RecordId),
    #[error("no record with id {0}")]
    NotFound(RecordId),
    #[error("the id of record {0} cannot be changed")]
    ImmutableId(RecordId),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    records: Vec<Record>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store, checking that every record carries a unique id.
    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        let mut store = Self::new();
        for record in records {
            store.append(record)?;
        }
        Ok(store)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.position(id).map(|index| &self.records[index])
    }

    fn position(&self, id: &RecordId) -> Option<usize> {
        self.records
            .iter()
            .position(|record| record.id().as_ref() == Some(id))
    }

    fn require(&self, id: &RecordId) -> Result<usize> {
        self.position(id).ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Smallest integer id above every integer id in the store.
    pub fn next_id(&self) -> RecordId {
        let max = self
            .records
            .iter()
            .filter_map(|record| match record.id() {
                Some(RecordId::Int(value)) => Some(value),
                _ => None,
            })
            .max()
            .unwrap_or(0);
        RecordId::Int(max.saturating_add(1))
    }

    pub fn append(&mut self, record: Record) -> Result<&Record> {
        let id = record.id().ok_or(StoreError::MissingId)?;
        if self.position(&id).is_some() {
            return Err(StoreError::DuplicateId(id));
        }
        debug!(%id, "append record");
        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Set one field in place, e.g. a status change.
    pub fn update_field(
        &mut self,
        id: &RecordId,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<&Record> {
        if field == ID_FIELD {
            return Err(StoreError::ImmutableId(id.clone()));
        }
        let index = self.require(id)?;
        debug!(%id, field, "update record field");
        self.records[index].insert(field, value);
        Ok(&self.records[index])
    }

    /// Merge the fields of `patch` into the stored record (edit form).
    /// The patch may repeat the record's id but not change it.
    pub fn update(&mut self, id: &RecordId, patch: Record) -> Result<&Record> {
        if let Some(patched) = patch.fields().get(ID_FIELD)
            && RecordId::from_value(patched).as_ref() != Some(id)
        {
            return Err(StoreError::ImmutableId(id.clone()));
        }
        let index = self.require(id)?;
        debug!(%id, fields = patch.len(), "merge record patch");
        let record = &mut self.records[index];
        for (field, value) in patch.into_map() {
            record.insert(field, value);
        }
        Ok(&self.records[index])
    }

    /// Apply an arbitrary in-place edit. The edit is rolled back if it
    /// changes the record's id.
    pub fn modify<F>(&mut self, id: &RecordId, edit: F) -> Result<&Record>
    where
        F: FnOnce(&mut Record),
    {
        let index = self.require(id)?;
        let original = self.records[index].clone();
        edit(&mut self.records[index]);
        if self.records[index].id().as_ref() != Some(id) {
            self.records[index] = original;
            return Err(StoreError::ImmutableId(id.clone()));
        }
        Ok(&self.records[index])
    }

    pub fn remove(&mut self, id: &RecordId) -> Result<Record> {
        let index = self.require(id)?;
        debug!(%id, "remove record");
        Ok(self.records.remove(index))
    }
}
