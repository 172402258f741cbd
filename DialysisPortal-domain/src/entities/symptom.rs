use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Symptom severity as logged by the patient
///
/// Labels outside the known set map to `Unspecified` instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
    VerySevere,
    #[default]
    Unspecified,
}

impl Severity {
    /// Parse a portal label; accepts Portuguese and English spellings
    pub fn from_label(label: Option<&str>) -> Self {
        let Some(label) = label else {
            return Severity::Unspecified;
        };
        let normalized = label.trim().to_lowercase().replace(['-', ' '], "_");

        match normalized.as_str() {
            "leve" | "mild" => Severity::Mild,
            "moderada" | "moderado" | "moderate" => Severity::Moderate,
            "grave" | "severa" | "severo" | "severe" => Severity::Severe,
            "muito_grave" | "gravissima" | "gravíssima" | "very_severe" => Severity::VerySevere,
            _ => Severity::Unspecified,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Severe => "severe",
            Severity::VerySevere => "very_severe",
            Severity::Unspecified => "unspecified",
        };
        f.write_str(label)
    }
}

/// Rendering priority attached to a severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum DisplayPriority {
    Low,
    Medium,
    High,
    Critical,
}

/// Canonical symptom, built from the raw API record
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Symptom {
    pub id: String,

    /// Owning session; symptoms may be logged on their own
    pub session_id: Option<String>,

    pub recorded_at: Option<NaiveDateTime>,
    pub name: String,
    pub category: String,
    pub severity: Severity,
    pub note: Option<String>,
}

impl Symptom {
    pub fn date(&self) -> Option<NaiveDate> {
        self.recorded_at.map(|at| at.date())
    }
}

/// Display-ready symptom view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NormalizedSymptomView {
    pub id: String,
    pub session_id: Option<String>,
    pub date: NaiveDate,
    pub sort_key: NaiveDateTime,
    pub display_date: String,
    pub name: String,
    pub category: String,
    pub severity: Severity,

    /// Human label for the severity
    pub severity_label: String,

    /// Intensity on a 1-10 scale
    pub intensity: u8,

    /// Hex display color of the severity
    pub color: String,
    pub priority: DisplayPriority,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_labels() {
        assert_eq!(Severity::from_label(Some("grave")), Severity::Severe);
        assert_eq!(Severity::from_label(Some(" Moderada ")), Severity::Moderate);
        assert_eq!(Severity::from_label(Some("muito grave")), Severity::VerySevere);
        assert_eq!(Severity::from_label(Some("very-severe")), Severity::VerySevere);
        assert_eq!(Severity::from_label(Some("LEVE")), Severity::Mild);
    }

    #[test]
    fn test_unknown_severity_degrades() {
        assert_eq!(Severity::from_label(Some("catastrófica")), Severity::Unspecified);
        assert_eq!(Severity::from_label(Some("")), Severity::Unspecified);
        assert_eq!(Severity::from_label(None), Severity::Unspecified);
    }
}
