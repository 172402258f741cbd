// Public entities for the dialysis portal API
// Request parameters and error payloads shared by the handlers

pub mod common;

pub use common::{ErrorResponse, HistoryQuery, ReportQuery};
