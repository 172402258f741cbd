use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::warn;

use dialysis_portal_data::models::{
    DialysisSessionRecord, Medication, PatientInfo, PeriodStatistics, SymptomRecord,
};

use super::dialysis::DialysisSession;
use super::report::{Patient, PrescribedMedication};
use super::statistics::PrecomputedAverages;
use super::symptom::{Severity, Symptom};

// Conversion functions between data-layer API records and domain entities.
// These follow the pattern convert_to_domain_[entity].

/// Readings above this are kept but logged as suspicious
const MAX_PLAUSIBLE_PRESSURE: f64 = 350.0;

/// Parse a date or timestamp sent by the portal.
///
/// Accepted forms, in order: `YYYY-MM-DD`, RFC 3339, `YYYY-MM-DDTHH:MM:SS`,
/// `YYYY-MM-DD HH:MM:SS`, `DD/MM/YYYY`. Anything else yields `None`.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(timestamp);
        }
    }
    NaiveDate::parse_from_str(raw, "%d/%m/%Y")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Parse an `HH:MM` or `HH:MM:SS` time of day
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

/// Round a pressure reading to mmHg, saturating at `u16::MAX`.
///
/// Only negative or non-finite values are dropped; out-of-range readings still
/// reach the classifier.
fn pressure(value: Option<f64>, field: &str, id: &str) -> Option<u16> {
    let value = value?;
    if !value.is_finite() || value < 0.0 {
        warn!("Dropping invalid {} value {} on session {}", field, value, id);
        return None;
    }
    if value > MAX_PLAUSIBLE_PRESSURE {
        warn!("Implausible {} value {} on session {}", field, value, id);
    }
    Some(value.round().min(f64::from(u16::MAX)) as u16)
}

fn non_negative(value: Option<f64>, field: &str, id: &str) -> Option<f64> {
    let value = value?;
    if value < 0.0 {
        warn!("Dropping negative {} value {} on session {}", field, value, id);
        return None;
    }
    Some(value)
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

/// Convert from an API session record to a domain session
pub fn convert_to_domain_session(record: DialysisSessionRecord) -> DialysisSession {
    let id = record.id;
    let recorded_at = record.data_registro.as_deref().and_then(parse_timestamp);
    if recorded_at.is_none() {
        warn!("Session {} has no usable date: {:?}", id, record.data_registro);
    }

    DialysisSession {
        recorded_at,
        start_time: record.hora_inicio.as_deref().and_then(parse_time_of_day),
        end_time: record.hora_fim.as_deref().and_then(parse_time_of_day),
        systolic: pressure(record.pressao_sistolica, "systolic", &id),
        diastolic: pressure(record.pressao_diastolica, "diastolic", &id),
        weight_pre_kg: non_negative(record.peso_pre, "pre-session weight", &id),
        weight_post_kg: non_negative(record.peso_pos, "post-session weight", &id),
        initial_drainage_ml: non_negative(record.drenagem_inicial, "initial drainage", &id),
        ultrafiltration_ml: non_negative(record.uf_total, "ultrafiltration", &id),
        dwell_time_min: non_negative(record.tempo_permanencia, "dwell time", &id),
        glucose_mg_dl: non_negative(record.glicose, "glucose", &id),
        dextrose_percent: non_negative(record.concentracao_dextrose, "dextrose", &id),
        symptoms: non_blank(record.sintomas),
        observations: non_blank(record.observacoes),
        id,
    }
}

/// Convert from an API symptom record to a domain symptom
pub fn convert_to_domain_symptom(record: SymptomRecord) -> Symptom {
    Symptom {
        severity: Severity::from_label(record.severidade.as_deref()),
        session_id: record.registro_dialise_id,
        recorded_at: record.data_registro.as_deref().and_then(parse_timestamp),
        name: non_blank(record.nome).unwrap_or_else(|| "Sintoma não informado".to_string()),
        category: non_blank(record.categoria)
            .map(|c| c.to_lowercase())
            .unwrap_or_else(|| "geral".to_string()),
        note: non_blank(record.observacoes),
        id: record.id,
    }
}

/// Extract pre-computed blood pressure averages, object form first
pub fn convert_to_domain_averages(statistics: &PeriodStatistics) -> PrecomputedAverages {
    PrecomputedAverages {
        systolic: statistics.systolic_average(),
        diastolic: statistics.diastolic_average(),
    }
}

/// Convert from the report payload's patient block
pub fn convert_to_domain_patient(info: PatientInfo) -> Patient {
    Patient {
        name: non_blank(info.nome).unwrap_or_else(|| "Paciente".to_string()),
        email: non_blank(info.email),
        phone: non_blank(info.telefone),
        birth_date: info
            .data_nascimento
            .as_deref()
            .and_then(parse_timestamp)
            .map(|at| at.format("%d/%m/%Y").to_string())
            .or_else(|| non_blank(info.data_nascimento)),
        id: info.id,
    }
}

/// Convert a prescription line; lines without a medication name are dropped
pub fn convert_to_domain_medication(medication: Medication) -> Option<PrescribedMedication> {
    Some(PrescribedMedication {
        name: non_blank(medication.nome)?,
        dosage: non_blank(medication.dosagem),
        frequency: non_blank(medication.frequencia),
        note: non_blank(medication.observacoes),
    })
}
