// Domain services
// This module contains the clinical-history pipeline: classifiers, window
// filter, normalizer, statistics, export and the history service tying them
// to the portal API.

pub mod export;
pub mod history;
pub mod normalizer;
pub mod severity;
pub mod statistics;
pub mod thresholds;
pub mod window;

// Re-export service traits and factory functions
pub use history::{
    create_history_service, parse_period, HistoryService, HistoryServiceConfig, HistoryServiceError,
    HistoryServiceTrait, ReportFile,
};
