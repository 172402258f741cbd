use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Canonical dialysis session, built from the raw API record
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DialysisSession {
    /// Unique identifier for the session
    pub id: String,

    /// Session date (and time, when the API sent a full timestamp)
    pub recorded_at: Option<NaiveDateTime>,

    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,

    /// Systolic blood pressure (mmHg)
    pub systolic: Option<u16>,

    /// Diastolic blood pressure (mmHg)
    pub diastolic: Option<u16>,

    pub weight_pre_kg: Option<f64>,
    pub weight_post_kg: Option<f64>,

    /// Initial drainage volume (mL)
    pub initial_drainage_ml: Option<f64>,

    /// Total ultrafiltration volume (mL)
    pub ultrafiltration_ml: Option<f64>,

    /// Dwell time (minutes)
    pub dwell_time_min: Option<f64>,

    /// Glucose concentration (mg/dL)
    pub glucose_mg_dl: Option<f64>,

    /// Dextrose concentration (%)
    pub dextrose_percent: Option<f64>,

    pub symptoms: Option<String>,
    pub observations: Option<String>,
}

impl DialysisSession {
    /// Calendar date of the session
    pub fn date(&self) -> Option<NaiveDate> {
        self.recorded_at.map(|at| at.date())
    }

    /// Timestamp used for ordering: session date plus start time when known
    pub fn sort_key(&self) -> Option<NaiveDateTime> {
        let recorded_at = self.recorded_at?;
        Some(match self.start_time {
            Some(start) => recorded_at.date().and_time(start),
            None => recorded_at,
        })
    }
}

/// Clinical status derived from blood pressure thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Blood pressure inside the reference band
    Normal,

    /// Blood pressure outside the reference band
    Attention,
}

impl SessionStatus {
    pub fn label(self) -> &'static str {
        match self {
            SessionStatus::Normal => "Normal",
            SessionStatus::Attention => "Atenção",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Display-ready view of one session, derived per request and never stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct NormalizedSessionView {
    pub id: String,

    /// Session date, kept for sorting and filtering
    pub date: NaiveDate,

    /// Original timestamp (date + start time) the collection is ordered by
    pub sort_key: NaiveDateTime,

    /// Date in day/month/year form
    pub display_date: String,

    /// `HH:MM - HH:MM`, when at least one bound is known
    pub time_range: Option<String>,

    pub systolic: Option<u16>,
    pub diastolic: Option<u16>,

    /// Raw ultrafiltration volume (mL)
    pub uf_ml: Option<f64>,

    /// Ultrafiltration in liters, rounded to one decimal
    pub uf_liters: Option<f64>,

    /// Ultrafiltration display string (`"2.5"` or `"N/D"`)
    pub uf_display: String,

    pub glucose_mg_dl: Option<f64>,
    pub dwell_time_min: Option<f64>,
    pub dextrose_percent: Option<f64>,
    pub weight_pre_kg: Option<f64>,
    pub weight_post_kg: Option<f64>,
    pub symptoms: Option<String>,
    pub observations: Option<String>,

    pub status: SessionStatus,
}

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// `dd/mm/yyyy a dd/mm/yyyy`
    pub fn display(&self) -> String {
        format!(
            "{} a {}",
            self.start.format("%d/%m/%Y"),
            self.end.format("%d/%m/%Y")
        )
    }
}

/// Trailing period a view or export covers
///
/// Only the four windows offered by the portal are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeriodWindow {
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}

impl PeriodWindow {
    pub const ALLOWED_DAYS: [u32; 4] = [7, 30, 90, 365];

    pub fn days(self) -> u32 {
        match self {
            PeriodWindow::Week => 7,
            PeriodWindow::Month => 30,
            PeriodWindow::Quarter => 90,
            PeriodWindow::Year => 365,
        }
    }

    /// `[today - N days, today]`
    pub fn date_range(self, today: NaiveDate) -> DateRange {
        let start = today
            .checked_sub_signed(Duration::days(i64::from(self.days())))
            .unwrap_or(NaiveDate::MIN);
        DateRange::new(start, today)
    }
}

impl TryFrom<u32> for PeriodWindow {
    type Error = u32;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        match days {
            7 => Ok(PeriodWindow::Week),
            30 => Ok(PeriodWindow::Month),
            90 => Ok(PeriodWindow::Quarter),
            365 => Ok(PeriodWindow::Year),
            other => Err(other),
        }
    }
}
