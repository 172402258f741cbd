// Domain entities and value objects
pub mod conversions;
pub mod dialysis;
pub mod history;
pub mod report;
pub mod statistics;
pub mod symptom;

// Re-export common types for easier imports
pub use dialysis::{DateRange, DialysisSession, NormalizedSessionView, PeriodWindow, SessionStatus};
pub use history::{HistoryExport, HistoryPeriod, HistoryView};
pub use report::{Patient, PrescribedMedication, ReportData};
pub use statistics::{AggregatedStatistics, PrecomputedAverages, SymptomSummary};
pub use symptom::{DisplayPriority, NormalizedSymptomView, Severity, Symptom};
