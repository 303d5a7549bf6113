//! Output module
//! Report rendering and the downloadable JSON report

pub mod formatter;
pub mod report;

pub use formatter::{OutputFormatter, ReportGenerator};
pub use report::DownloadReport;
