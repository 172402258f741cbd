use chrono::{DateTime, NaiveDate, Utc};

use crate::entities::{HistoryExport, HistoryView};

/// Build the downloadable snapshot of a history view
pub fn build_export(view: &HistoryView, exported_at: DateTime<Utc>) -> HistoryExport {
    HistoryExport {
        export_timestamp: exported_at,
        period: view.period,
        statistics: view.statistics.clone(),
        dialysis_records: view.sessions.clone(),
        symptoms: view.symptoms.clone(),
    }
}

/// `historico-dialise-YYYY-MM-DD.json`
pub fn export_filename(date: NaiveDate) -> String {
    format!("historico-dialise-{}.json", date.format("%Y-%m-%d"))
}

/// Pretty-printed JSON body of an export
pub fn export_to_json(export: &HistoryExport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{DialysisSession, HistoryPeriod, PeriodWindow, PrecomputedAverages, Severity, Symptom};
    use crate::services::normalizer::{normalize_sessions, normalize_symptoms};
    use crate::services::statistics::{aggregate_statistics, summarize_symptoms};
    use chrono::TimeZone;

    fn sample_view() -> HistoryView {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let period = HistoryPeriod::new(PeriodWindow::Week, today);
        let at = |day: u32| NaiveDate::from_ymd_opt(2024, 3, day).and_then(|d| d.and_hms_opt(8, 0, 0));

        let sessions = normalize_sessions(&[
            DialysisSession {
                id: "1".to_string(),
                recorded_at: at(9),
                ultrafiltration_ml: Some(2500.0),
                ..Default::default()
            },
            DialysisSession {
                id: "2".to_string(),
                recorded_at: at(10),
                ..Default::default()
            },
        ]);
        let symptoms = normalize_symptoms(&[Symptom {
            id: "s1".to_string(),
            recorded_at: at(9),
            name: "Cãibra".to_string(),
            category: "geral".to_string(),
            severity: Severity::Moderate,
            ..Default::default()
        }]);

        HistoryView {
            period,
            statistics: aggregate_statistics(&sessions, period.range(), PrecomputedAverages::default()),
            symptom_summary: summarize_symptoms(&symptoms),
            sessions,
            symptoms,
        }
    }

    #[test]
    fn test_export_round_trip_preserves_counts() {
        let exported_at = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let export = build_export(&sample_view(), exported_at);

        let json = export_to_json(&export).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["dialysisRecords"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["symptoms"].as_array().map(Vec::len), Some(1));
        assert!(value.get("exportTimestamp").is_some());
        assert_eq!(value["period"]["days"], 7);

        let parsed: HistoryExport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, export);
    }

    #[test]
    fn test_missing_means_serialize_as_null() {
        let exported_at = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let json = export_to_json(&build_export(&sample_view(), exported_at)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value["statistics"]["meanSystolic"].is_null());
        assert_eq!(value["statistics"]["meanUfLiters"], 2.5);
    }

    fn snake_case_keys(value: &serde_json::Value, found: &mut Vec<String>) {
        match value {
            serde_json::Value::Object(map) => {
                for (key, nested) in map {
                    if key.contains('_') {
                        found.push(key.clone());
                    }
                    snake_case_keys(nested, found);
                }
            }
            serde_json::Value::Array(items) => items.iter().for_each(|item| snake_case_keys(item, found)),
            _ => {}
        }
    }

    #[test]
    fn test_export_keys_are_camel_case_throughout() {
        let exported_at = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let json = export_to_json(&build_export(&sample_view(), exported_at)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let mut found = Vec::new();
        snake_case_keys(&value, &mut found);
        assert!(found.is_empty(), "snake_case keys in export: {:?}", found);

        assert!(value["dialysisRecords"][0].get("ufDisplay").is_some());
        assert!(value["symptoms"][0].get("severityLabel").is_some());
        assert!(value["statistics"].get("totalRecords").is_some());
    }

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(export_filename(date), "historico-dialise-2024-03-10.json");
    }
}
