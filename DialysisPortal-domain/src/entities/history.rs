use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::dialysis::{DateRange, NormalizedSessionView, PeriodWindow};
use super::statistics::{AggregatedStatistics, SymptomSummary};
use super::symptom::NormalizedSymptomView;

/// Period descriptor carried by views and exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct HistoryPeriod {
    /// Window size in days
    pub days: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl HistoryPeriod {
    pub fn new(window: PeriodWindow, today: NaiveDate) -> Self {
        let range = window.date_range(today);
        Self {
            days: window.days(),
            start: range.start,
            end: range.end,
        }
    }

    pub fn range(&self) -> DateRange {
        DateRange::new(self.start, self.end)
    }
}

/// Filtered, normalized history of one patient for a trailing window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct HistoryView {
    pub period: HistoryPeriod,
    pub statistics: AggregatedStatistics,
    pub symptom_summary: SymptomSummary,

    /// Sessions, most recent first
    pub sessions: Vec<NormalizedSessionView>,

    /// Symptoms, most recent first
    pub symptoms: Vec<NormalizedSymptomView>,
}

/// Downloadable JSON snapshot of a history view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct HistoryExport {
    pub export_timestamp: DateTime<Utc>,
    pub period: HistoryPeriod,
    pub statistics: AggregatedStatistics,
    pub dialysis_records: Vec<NormalizedSessionView>,
    pub symptoms: Vec<NormalizedSymptomView>,
}
