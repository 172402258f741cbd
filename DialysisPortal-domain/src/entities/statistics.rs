use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Count and mean statistics over a filtered session collection
///
/// A mean is `None` when no record carried the underlying field; it is
/// never reported as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AggregatedStatistics {
    /// Number of sessions in the period
    pub total_records: usize,

    pub period_start: NaiveDate,
    pub period_end: NaiveDate,

    /// Mean systolic pressure (mmHg, integer)
    pub mean_systolic: Option<f64>,

    /// Mean diastolic pressure (mmHg, integer)
    pub mean_diastolic: Option<f64>,

    /// Mean ultrafiltration (liters, one decimal)
    pub mean_uf_liters: Option<f64>,

    /// Mean glucose (mg/dL, integer)
    pub mean_glucose: Option<f64>,

    /// Mean dwell time (minutes, integer)
    pub mean_dwell_time: Option<f64>,

    /// Sessions whose symptom text is not blank
    pub sessions_with_symptoms: usize,

    /// Sessions whose blood pressure fell outside the reference band
    pub sessions_needing_attention: usize,
}

/// Averages already computed by the portal for the same period
///
/// When present they replace the locally computed blood pressure means.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PrecomputedAverages {
    pub systolic: Option<f64>,
    pub diastolic: Option<f64>,
}

impl PrecomputedAverages {
    pub fn is_empty(&self) -> bool {
        self.systolic.is_none() && self.diastolic.is_none()
    }
}

/// Symptom counts for a period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SymptomSummary {
    pub total: usize,

    /// Count per severity label
    pub by_severity: BTreeMap<String, usize>,

    /// Count per category
    pub by_category: BTreeMap<String, usize>,

    /// Most frequently logged symptom name, ties broken alphabetically
    pub most_frequent: Option<String>,
}
