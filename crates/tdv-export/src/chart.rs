//! Chart snapshots for PDF exports.
//!
//! A chart is captured as a PNG bitmap by an async [`ChartSource`]. Capture
//! either yields a decoded image or an explicit [`CaptureError`]; it is never
//! retried.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use image::{DynamicImage, GenericImageView, ImageFormat};
use tracing::debug;

use crate::error::CaptureError;

/// A decoded chart bitmap.
#[derive(Debug, Clone)]
pub struct ChartImage {
    pub title: String,
    image: DynamicImage,
}

impl ChartImage {
    pub fn from_png(title: impl Into<String>, png: &[u8]) -> Result<Self, CaptureError> {
        let title = title.into();
        let image = image::load_from_memory_with_format(png, ImageFormat::Png).map_err(|source| {
            CaptureError::Decode {
                chart: title.clone(),
                source,
            }
        })?;
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(CaptureError::ZeroSize { chart: title });
        }
        Ok(Self { title, image })
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Height in mm when drawn `width_mm` wide.
    pub fn height_for_width(&self, width_mm: f32) -> f32 {
        let (width, height) = self.dimensions();
        width_mm * height as f32 / width as f32
    }
}

pub type CaptureFuture<'a> = Pin<Box<dyn Future<Output = Result<ChartImage, CaptureError>> + Send + 'a>>;

/// Something that can produce a chart snapshot on demand.
pub trait ChartSource: Send + Sync {
    fn title(&self) -> &str;

    fn capture(&self) -> CaptureFuture<'_>;
}

/// A chart already rendered to PNG bytes.
#[derive(Debug, Clone)]
pub struct StaticChart {
    title: String,
    png: Vec<u8>,
}

impl StaticChart {
    pub fn new(title: impl Into<String>, png: Vec<u8>) -> Self {
        Self {
            title: title.into(),
            png,
        }
    }
}

impl ChartSource for StaticChart {
    fn title(&self) -> &str {
        &self.title
    }

    fn capture(&self) -> CaptureFuture<'_> {
        Box::pin(async move { ChartImage::from_png(self.title.clone(), &self.png) })
    }
}

/// A chart rendered to a PNG file by some other tool.
#[derive(Debug, Clone)]
pub struct PngFileChart {
    title: String,
    path: PathBuf,
}

impl PngFileChart {
    pub fn new(title: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
        }
    }

    /// Titled after the file stem.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let title = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().replace(['-', '_'], " "))
            .unwrap_or_else(|| "Chart".to_string());
        Self { title, path }
    }
}

impl ChartSource for PngFileChart {
    fn title(&self) -> &str {
        &self.title
    }

    fn capture(&self) -> CaptureFuture<'_> {
        Box::pin(async move {
            debug!(chart = %self.title, path = %self.path.display(), "capturing chart");
            let png = match tokio::fs::read(&self.path).await {
                Ok(png) => png,
                Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                    return Err(CaptureError::Detached {
                        chart: self.title.clone(),
                    });
                }
                Err(source) => {
                    return Err(CaptureError::Io {
                        chart: self.title.clone(),
                        path: self.path.clone(),
                        source,
                    });
                }
            };
            if png.is_empty() {
                return Err(CaptureError::ZeroSize {
                    chart: self.title.clone(),
                });
            }
            ChartImage::from_png(self.title.clone(), &png)
        })
    }
}
