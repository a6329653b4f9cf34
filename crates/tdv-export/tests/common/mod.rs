//! Shared fixtures for export tests.

#![allow(dead_code)]

use std::io::Cursor;

use chrono::{NaiveDate, NaiveDateTime};
use image::{DynamicImage, ImageFormat, RgbImage};

use tdv_model::{ExportFormat, ExportJob, Record};

pub fn requested_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 5)
        .and_then(|date| date.and_hms_opt(9, 30, 0))
        .expect("valid timestamp")
}

pub fn people() -> Vec<Record> {
    vec![
        Record::new().with("id", 1).with("name", "Ann"),
        Record::new().with("id", 2).with("name", "Bo"),
    ]
}

pub fn job(format: ExportFormat, records: Vec<Record>) -> ExportJob {
    ExportJob::new(format, "Audit Trail", records, requested_at())
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([41, 128, 185])));
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, ImageFormat::Png)
        .expect("encode png");
    bytes.into_inner()
}
