//! Exporter behaviour: notices, chart failures, concurrency and sinks.

use std::sync::Arc;

use tokio::sync::Notify;

use tdv_export::{
    CaptureError, CaptureFuture, ChartFailure, ChartImage, ChartSource, DirectorySink, ExportError,
    Exporter, MemorySink, StaticChart,
};
use tdv_model::{DataBlock, ExportFormat, NoticeSeverity, Record};

mod common;

/// A chart whose source has gone away.
struct DetachedChart;

impl ChartSource for DetachedChart {
    fn title(&self) -> &str {
        "Pass rates"
    }

    fn capture(&self) -> CaptureFuture<'_> {
        Box::pin(async {
            Err(CaptureError::Detached {
                chart: "Pass rates".to_string(),
            })
        })
    }
}

/// A chart that signals when capture starts and finishes once the gate opens.
struct GatedChart {
    started: Arc<Notify>,
    gate: Arc<Notify>,
    png: Vec<u8>,
}

impl ChartSource for GatedChart {
    fn title(&self) -> &str {
        "Gated"
    }

    fn capture(&self) -> CaptureFuture<'_> {
        Box::pin(async move {
            self.started.notify_one();
            self.gate.notified().await;
            ChartImage::from_png("Gated", &self.png)
        })
    }
}

#[tokio::test]
async fn csv_export_saves_and_reports_success() {
    let exporter = Exporter::new(MemorySink::new());
    let job = common::job(ExportFormat::Csv, common::people()).with_date_suffix(true);

    let outcome = exporter.export(&job).await.unwrap();
    assert_eq!(outcome.artifact.filename, "Audit-Trail-2024-03-05.csv");
    assert_eq!(outcome.artifact.mime, "text/csv;charset=utf-8");
    assert_eq!(outcome.notices.len(), 1);
    insta::assert_snapshot!(outcome.notices[0].to_string(), @"ok: CSV exported successfully");

    let saved = exporter.sink().get("Audit-Trail-2024-03-05.csv").unwrap();
    assert_eq!(saved.bytes, b"id,name\r\n\"1\",\"Ann\"\r\n\"2\",\"Bo\"\r\n");
}

#[tokio::test]
async fn empty_exports_fail_with_a_notice() {
    let exporter = Exporter::new(MemorySink::new());
    let job = common::job(ExportFormat::Csv, Vec::new());
    assert!(matches!(exporter.export(&job).await, Err(ExportError::Empty { .. })));

    let notices = exporter.run(&job).await;
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, NoticeSeverity::Error);
    assert!(notices[0].message.starts_with("Failed to export CSV"));
    assert!(exporter.sink().artifacts().is_empty());
}

#[tokio::test]
async fn chart_failure_still_exports_tables() {
    let exporter = Exporter::new(MemorySink::new())
        .with_chart(StaticChart::new("Compliance", common::png(40, 20)))
        .with_chart(DetachedChart);
    let job = common::job(ExportFormat::Pdf, common::people());

    let outcome = exporter.export(&job).await.unwrap();
    let severities: Vec<_> = outcome.notices.iter().map(|notice| notice.severity).collect();
    assert_eq!(severities, vec![NoticeSeverity::Warning, NoticeSeverity::Success]);
    assert!(outcome.notices[0].message.contains("Pass rates"));

    let saved = exporter.sink().get("Audit-Trail.pdf").unwrap();
    assert_eq!(saved.mime, "application/pdf");
    assert!(saved.bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn strict_chart_policy_aborts_without_saving() {
    let exporter = Exporter::new(MemorySink::new())
        .with_chart(DetachedChart)
        .with_chart_failure(ChartFailure::Abort);
    let job = common::job(ExportFormat::Pdf, common::people());

    let err = exporter.export(&job).await.unwrap_err();
    assert!(matches!(err, ExportError::Capture(CaptureError::Detached { .. })));
    assert!(exporter.sink().artifacts().is_empty());
    assert!(!exporter.is_busy());
}

#[tokio::test]
async fn undecodable_charts_are_capture_failures() {
    let exporter = Exporter::new(MemorySink::new())
        .with_chart(StaticChart::new("Broken", b"not a png".to_vec()))
        .with_chart_failure(ChartFailure::Abort);
    let job = common::job(ExportFormat::Pdf, common::people());
    assert!(matches!(
        exporter.export(&job).await,
        Err(ExportError::Capture(CaptureError::Decode { .. }))
    ));
}

#[tokio::test]
async fn second_export_while_busy_is_rejected() {
    let started = Arc::new(Notify::new());
    let gate = Arc::new(Notify::new());
    let exporter = Exporter::new(MemorySink::new()).with_chart(GatedChart {
        started: Arc::clone(&started),
        gate: Arc::clone(&gate),
        png: common::png(8, 8),
    });
    let job = common::job(ExportFormat::Pdf, common::people());

    let first = exporter.export(&job);
    let second = async {
        started.notified().await;
        let result = exporter.export(&job).await;
        gate.notify_one();
        result
    };
    let (first, second) = tokio::join!(first, second);

    assert!(first.is_ok());
    assert!(matches!(second, Err(ExportError::Busy)));
    assert!(!exporter.is_busy());

    gate.notify_one();
    assert!(exporter.export(&job).await.is_ok());
}

#[tokio::test]
async fn pdf_renders_extra_blocks() {
    let exporter = Exporter::new(MemorySink::new());
    let learners = vec![
        Record::new().with("id", "A101").with("learner", "Emma Watson").with("score", 85),
    ];
    let job = common::job(ExportFormat::Pdf, Vec::new())
        .with_title("Assessment Details")
        .with_block(DataBlock::new("Sampled assessments", learners));

    let outcome = exporter.export(&job).await.unwrap();
    assert_eq!(outcome.artifact.filename, "Audit-Trail.pdf");
}

#[tokio::test]
async fn directory_sink_replaces_files_atomically() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = Exporter::new(DirectorySink::new(dir.path()));

    let first = common::job(ExportFormat::Csv, common::people());
    exporter.export(&first).await.unwrap();
    let second = common::job(ExportFormat::Csv, common::people()[..1].to_vec());
    let outcome = exporter.export(&second).await.unwrap();

    let path = dir.path().join("Audit-Trail.csv");
    assert_eq!(outcome.artifact.location, path.display().to_string());
    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "id,name\r\n\"1\",\"Ann\"\r\n");

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name())
        .collect();
    assert_eq!(leftovers.len(), 1, "temp files left behind: {leftovers:?}");
}
