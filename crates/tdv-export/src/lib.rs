//! CSV and PDF export of filtered table views.
//!
//! An [`Exporter`] turns an [`ExportJob`](tdv_model::ExportJob) into bytes,
//! names the artifact and passes it to an [`ArtifactSink`]. At most one
//! export runs per exporter at a time.

pub mod chart;
pub mod csv_writer;
pub mod error;
pub mod exporter;
pub mod filename;
pub mod pdf;
pub mod sink;

pub use chart::{CaptureFuture, ChartImage, ChartSource, PngFileChart, StaticChart};
pub use error::{CaptureError, ExportError, Result, SinkError};
pub use exporter::{ChartFailure, ExportOutcome, Exporter};
pub use csv_writer::to_csv;
pub use filename::export_filename;
pub use pdf::{HeaderColor, Orientation, PdfStyle};
pub use sink::{Artifact, ArtifactSink, DirectorySink, MemorySink, SavedArtifact};
