//! Data model shared by the tabular data view crates.

pub mod error;
pub mod export;
pub mod filter;
pub mod notice;
pub mod page;
pub mod record;
pub mod view;

pub use error::{ModelError, Result};
pub use export::{CSV_MIME, DataBlock, ExportFormat, ExportJob, PDF_MIME};
pub use filter::{ALL, FilterState, Selection};
pub use notice::{Notice, NoticeSeverity};
pub use page::PageState;
pub use record::{ID_FIELD, Record, RecordId, scalar_text, value_kind};
pub use view::{FilterField, ViewConfig};
