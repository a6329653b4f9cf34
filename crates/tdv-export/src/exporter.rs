//! The exporter: serializes an export job and hands it to a sink.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use tdv_model::{ExportFormat, ExportJob, Notice};

use crate::chart::{ChartImage, ChartSource};
use crate::csv_writer::to_csv;
use crate::error::{ExportError, Result};
use crate::filename::export_filename;
use crate::pdf::{PdfContent, PdfStyle, TableSection, render_pdf};
use crate::sink::{ArtifactSink, SavedArtifact};

/// What happens to a PDF export when a chart cannot be captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartFailure {
    /// Leave the chart out, warn, and still export the tables.
    #[default]
    Skip,
    /// Fail the whole export.
    Abort,
}

/// A finished export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub artifact: SavedArtifact,
    pub notices: Vec<Notice>,
}

/// Marks an export as in flight until dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Exporter<S> {
    sink: S,
    charts: Vec<Box<dyn ChartSource>>,
    style: PdfStyle,
    chart_failure: ChartFailure,
    in_flight: AtomicBool,
}

impl<S: ArtifactSink> Exporter<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            charts: Vec::new(),
            style: PdfStyle::default(),
            chart_failure: ChartFailure::default(),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Add a chart to every PDF export, in insertion order.
    #[must_use]
    pub fn with_chart(mut self, chart: impl ChartSource + 'static) -> Self {
        self.charts.push(Box::new(chart));
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: PdfStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_chart_failure(mut self, policy: ChartFailure) -> Self {
        self.chart_failure = policy;
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Export and report the result as notices, the way the screens do.
    pub async fn run(&self, job: &ExportJob) -> Vec<Notice> {
        match self.export(job).await {
            Ok(outcome) => outcome.notices,
            Err(error) => {
                warn!(error = %error, format = %job.format, label = %job.label, "export failed");
                vec![Notice::error(format!(
                    "Failed to export {}: {}",
                    job.format.label(),
                    error.user_message()
                ))]
            }
        }
    }

    /// Render the job and save it. Rejected with [`ExportError::Busy`] while
    /// another export on this exporter is still running.
    pub async fn export(&self, job: &ExportJob) -> Result<ExportOutcome> {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            return Err(ExportError::Busy);
        };

        let mut notices = Vec::new();
        let bytes = match job.format {
            ExportFormat::Csv => to_csv(&job.label, &job.records)?,
            ExportFormat::Pdf => self.render(job, &mut notices).await?,
        };

        let date = job.date_suffix.then(|| job.date());
        let filename = export_filename(&job.label, job.format, date);
        let artifact = self.sink.save(&bytes, &filename, job.format.mime())?;
        info!(
            filename = %artifact.filename,
            records = job.record_count(),
            bytes = artifact.size,
            "export finished"
        );
        notices.push(Notice::success(format!(
            "{} exported successfully",
            job.format.label()
        )));
        Ok(ExportOutcome { artifact, notices })
    }

    async fn render(&self, job: &ExportJob, notices: &mut Vec<Notice>) -> Result<Vec<u8>> {
        let sections: Vec<TableSection> = std::iter::once(TableSection::from_records(&job.label, &job.records))
            .chain(
                job.blocks
                    .iter()
                    .map(|block| TableSection::from_records(&block.title, &block.records)),
            )
            .filter(|section| !section.rows.is_empty() && !section.columns.is_empty())
            .collect();
        if sections.is_empty() {
            return Err(empty(job));
        }

        let charts = self.capture_charts(notices).await?;
        render_pdf(
            &PdfContent {
                title: &job.title,
                generated_at: job.requested_at,
                charts: &charts,
                sections: &sections,
            },
            &self.style,
        )
    }

    async fn capture_charts(&self, notices: &mut Vec<Notice>) -> Result<Vec<ChartImage>> {
        let mut images = Vec::with_capacity(self.charts.len());
        for chart in &self.charts {
            match chart.capture().await {
                Ok(image) => images.push(image),
                Err(error) if self.chart_failure == ChartFailure::Skip => {
                    warn!(chart = chart.title(), error = %error, "chart capture failed; leaving it out");
                    notices.push(Notice::warning(format!(
                        "Chart '{}' could not be captured and was left out of the PDF",
                        chart.title()
                    )));
                }
                Err(error) => return Err(error.into()),
            }
        }
        Ok(images)
    }
}

fn empty(job: &ExportJob) -> ExportError {
    ExportError::Empty {
        label: job.label.clone(),
    }
}
