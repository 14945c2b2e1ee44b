mod format;
pub mod views;

pub use format::{escape_html, ReportFormatter};
pub use views::{RenderedReport, ReportData, ReportKind};
