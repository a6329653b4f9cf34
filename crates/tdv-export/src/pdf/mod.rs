//! PDF documents: a title, a generation stamp, chart snapshots and one
//! auto-laid-out table per data block.

pub mod layout;
mod render;

pub use layout::{Orientation, TableSection, choose_orientation};
pub use render::{HeaderColor, InvalidColor, PdfContent, PdfStyle, render_pdf};
