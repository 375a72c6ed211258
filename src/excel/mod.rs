//! Excel import/export for attendance sheets and salary reports
//!
//! - Import: attendance workbook (.xlsx) → sheet rows → classified sheet
//! - Export: salary reports → Summary/Details workbook (or JSON)

mod exporter;
mod importer;

pub use exporter::ReportExporter;
pub use importer::{convert_cell, load_attendance, read_range, SheetImporter};
