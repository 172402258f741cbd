// Testing utilities and fixtures for the domain layer
// This module is only available when the "mock" feature is enabled

// Re-export useful test mocks from the data layer
pub use dialysis_portal_data::repository::tests::{MockPortalApi, MockPortalConnector};

use chrono::NaiveDate;
use dialysis_portal_data::models::{
    DialysisSessionRecord, Medication, PatientInfo, ReportPayload, ReportPeriod, SymptomRecord,
};

/// Session record as the portal would send it
pub fn session_record(id: &str, date: NaiveDate, systolic: f64, diastolic: f64) -> DialysisSessionRecord {
    DialysisSessionRecord {
        id: id.to_string(),
        data_registro: Some(date.format("%Y-%m-%d").to_string()),
        hora_inicio: Some("08:00".to_string()),
        hora_fim: Some("08:40".to_string()),
        pressao_sistolica: Some(systolic),
        pressao_diastolica: Some(diastolic),
        uf_total: Some(2500.0),
        tempo_permanencia: Some(240.0),
        glicose: Some(110.0),
        concentracao_dextrose: Some(1.5),
        ..Default::default()
    }
}

/// Symptom record as the portal would send it
pub fn symptom_record(id: &str, date: NaiveDate, name: &str, severity: &str) -> SymptomRecord {
    SymptomRecord {
        id: id.to_string(),
        data_registro: Some(date.format("%Y-%m-%d").to_string()),
        nome: Some(name.to_string()),
        categoria: Some("geral".to_string()),
        severidade: Some(severity.to_string()),
        ..Default::default()
    }
}

/// Report payload with `session_count` daily sessions ending on `last_day`
pub fn report_payload(patient_name: &str, last_day: NaiveDate, session_count: i64) -> ReportPayload {
    let registros = (0..session_count)
        .filter_map(|offset| {
            let date = last_day.checked_sub_signed(chrono::Duration::days(offset))?;
            Some(session_record(&offset.to_string(), date, 128.0, 82.0))
        })
        .collect();

    ReportPayload {
        paciente: PatientInfo {
            id: "1".to_string(),
            nome: Some(patient_name.to_string()),
            email: Some("paciente@example.org".to_string()),
            ..Default::default()
        },
        periodo: ReportPeriod::default(),
        estatisticas: None,
        registros,
        medicamentos: vec![Medication {
            nome: Some("Eritropoetina".to_string()),
            dosagem: Some("4000 UI".to_string()),
            frequencia: Some("3x por semana".to_string()),
            observacoes: None,
        }],
    }
}
