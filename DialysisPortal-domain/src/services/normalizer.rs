use chrono::NaiveDate;
use tracing::debug;

use crate::entities::{DialysisSession, NormalizedSessionView, NormalizedSymptomView, Symptom};
use crate::services::{severity, thresholds};

/// Display marker for a value that is not available
pub const NOT_AVAILABLE: &str = "N/D";

/// Round to `decimals` decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Day/month/year display form
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Convert milliliters to liters rounded to one decimal (`2500` -> `2.5`)
pub fn ml_to_liters(ml: f64) -> f64 {
    round_to(ml / 1000.0, 1)
}

/// Format an optional number with a fixed precision, or `N/D`
pub fn format_optional(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Normalize one session; sessions without a usable date are skipped
pub fn normalize_session(session: &DialysisSession) -> Option<NormalizedSessionView> {
    let date = session.date()?;
    let sort_key = session.sort_key()?;

    let time_range = match (session.start_time, session.end_time) {
        (Some(start), Some(end)) => Some(format!("{} - {}", start.format("%H:%M"), end.format("%H:%M"))),
        (Some(start), None) => Some(start.format("%H:%M").to_string()),
        (None, Some(end)) => Some(format!("até {}", end.format("%H:%M"))),
        (None, None) => None,
    };

    let uf_liters = session.ultrafiltration_ml.map(ml_to_liters);

    Some(NormalizedSessionView {
        id: session.id.clone(),
        date,
        sort_key,
        display_date: format_display_date(date),
        time_range,
        systolic: session.systolic,
        diastolic: session.diastolic,
        uf_ml: session.ultrafiltration_ml,
        uf_liters,
        uf_display: format_optional(uf_liters, 1),
        glucose_mg_dl: session.glucose_mg_dl,
        dwell_time_min: session.dwell_time_min,
        dextrose_percent: session.dextrose_percent,
        weight_pre_kg: session.weight_pre_kg,
        weight_post_kg: session.weight_post_kg,
        symptoms: session.symptoms.clone(),
        observations: session.observations.clone(),
        status: thresholds::classify(session.systolic, session.diastolic),
    })
}

/// Normalize sessions, most recent first
pub fn normalize_sessions(sessions: &[DialysisSession]) -> Vec<NormalizedSessionView> {
    let mut views: Vec<_> = sessions.iter().filter_map(normalize_session).collect();
    if views.len() < sessions.len() {
        debug!("Skipped {} undated sessions", sessions.len() - views.len());
    }
    views.sort_by(|a, b| b.sort_key.cmp(&a.sort_key));
    views
}

/// Normalize one symptom; symptoms without a usable date are skipped
pub fn normalize_symptom(symptom: &Symptom) -> Option<NormalizedSymptomView> {
    let sort_key = symptom.recorded_at?;
    let date = sort_key.date();
    let palette = severity::palette(symptom.severity);

    Some(NormalizedSymptomView {
        id: symptom.id.clone(),
        session_id: symptom.session_id.clone(),
        date,
        sort_key,
        display_date: format_display_date(date),
        name: symptom.name.clone(),
        category: symptom.category.clone(),
        severity: symptom.severity,
        severity_label: severity::label(symptom.severity).to_string(),
        intensity: severity::intensity(symptom.severity),
        color: palette.hex.to_string(),
        priority: palette.priority,
        description: symptom.note.clone(),
    })
}

/// Normalize symptoms, most recent first
pub fn normalize_symptoms(symptoms: &[Symptom]) -> Vec<NormalizedSymptomView> {
    let mut views: Vec<_> = symptoms.iter().filter_map(normalize_symptom).collect();
    views.sort_by(|a, b| b.sort_key.cmp(&a.sort_key));
    views
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{SessionStatus, Severity};
    use chrono::NaiveTime;

    fn session_on(day: u32, start: Option<(u32, u32)>) -> DialysisSession {
        DialysisSession {
            id: format!("{}-{:?}", day, start),
            recorded_at: NaiveDate::from_ymd_opt(2024, 3, day).and_then(|d| d.and_hms_opt(0, 0, 0)),
            start_time: start.and_then(|(h, m)| NaiveTime::from_hms_opt(h, m, 0)),
            ..Default::default()
        }
    }

    #[test]
    fn test_uf_converted_to_liters() {
        let session = DialysisSession {
            ultrafiltration_ml: Some(2500.0),
            ..session_on(10, None)
        };

        let view = normalize_session(&session).unwrap();
        assert_eq!(view.uf_liters, Some(2.5));
        assert_eq!(view.uf_display, "2.5");
        assert_eq!(view.display_date, "10/03/2024");
    }

    #[test]
    fn test_missing_uf_is_not_available() {
        let view = normalize_session(&session_on(10, None)).unwrap();
        assert_eq!(view.uf_liters, None);
        assert_eq!(view.uf_display, NOT_AVAILABLE);
    }

    #[test]
    fn test_ml_to_liters_rounding() {
        assert_eq!(ml_to_liters(1234.0), 1.2);
        assert_eq!(ml_to_liters(1250.0), 1.3);
        assert_eq!(ml_to_liters(0.0), 0.0);
    }

    #[test]
    fn test_status_comes_from_thresholds() {
        let session = DialysisSession {
            systolic: Some(150),
            diastolic: Some(95),
            ..session_on(10, None)
        };

        assert_eq!(normalize_session(&session).unwrap().status, SessionStatus::Attention);
    }

    #[test]
    fn test_sessions_sorted_most_recent_first() {
        let sessions = vec![
            session_on(8, Some((9, 0))),
            session_on(10, Some((8, 0))),
            session_on(10, Some((14, 0))),
            session_on(9, None),
        ];

        let views = normalize_sessions(&sessions);
        let keys: Vec<_> = views.iter().map(|v| v.sort_key).collect();

        let mut expected = keys.clone();
        expected.sort_by(|a, b| b.cmp(a));
        assert_eq!(keys, expected);
        assert_eq!(views[0].time_range.as_deref(), Some("14:00"));
    }

    #[test]
    fn test_undated_session_skipped() {
        let undated = DialysisSession {
            id: "x".to_string(),
            ..Default::default()
        };
        assert!(normalize_sessions(&[undated]).is_empty());
    }

    #[test]
    fn test_symptom_view_carries_palette() {
        let symptom = Symptom {
            id: "s1".to_string(),
            recorded_at: NaiveDate::from_ymd_opt(2024, 3, 10).and_then(|d| d.and_hms_opt(10, 0, 0)),
            name: "Náusea".to_string(),
            category: "gastrointestinal".to_string(),
            severity: Severity::Severe,
            ..Default::default()
        };

        let view = normalize_symptom(&symptom).unwrap();
        assert_eq!(view.intensity, 9);
        assert_eq!(view.color, "#dc2626");
        assert_eq!(view.severity_label, "Grave");
    }
}
