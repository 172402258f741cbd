use super::dialysis::{DateRange, NormalizedSessionView};
use super::statistics::AggregatedStatistics;

/// Patient identity shown on the report
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<String>,
}

/// One prescription line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrescribedMedication {
    pub name: String,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub note: Option<String>,
}

impl PrescribedMedication {
    /// `Name - dosage - frequency`, skipping absent parts
    pub fn summary_line(&self) -> String {
        let mut parts = vec![self.name.as_str()];
        parts.extend(self.dosage.as_deref());
        parts.extend(self.frequency.as_deref());
        parts.join(" - ")
    }
}

/// Everything the report composer lays out for one patient
#[derive(Debug, Clone, PartialEq)]
pub struct ReportData {
    pub patient: Patient,
    pub period: DateRange,
    pub statistics: AggregatedStatistics,

    /// Sessions inside the period, most recent first
    pub sessions: Vec<NormalizedSessionView>,
    pub medications: Vec<PrescribedMedication>,
}
