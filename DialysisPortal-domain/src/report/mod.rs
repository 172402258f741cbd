// Report generation
// Layout is computed first as plain drawing operations, then handed to the
// PDF backend.

pub mod composer;
pub mod layout;
pub mod pdf;

pub use composer::{generate_report, report_filename, ReportComposer, ReportSection};
pub use layout::{Block, DrawOp, FinishedReport, LayoutState, PageFooter, ReportDocument};
pub use pdf::{render_pdf, ReportRenderError};
