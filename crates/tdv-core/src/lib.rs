//! Filtering, pagination and record bookkeeping for table views.

pub mod date;
pub mod paginate;
pub mod predicate;
pub mod store;
pub mod validation;
pub mod view;

pub use date::{parse_day, record_day, within};
pub use paginate::{Page, PageStatus, paginate};
pub use predicate::{FilterPredicate, filter_records, matches};
pub use store::{RecordStore, StoreError};
pub use validation::{SubmissionRules, ValidationErrors};
pub use view::{TableView, ViewError};
