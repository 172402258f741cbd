use serde::{Deserialize, Serialize};

use super::{id_text, lenient_f64, lenient_text};

/// Dialysis session record as returned by the portal API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialysisSessionRecord {
    /// Unique identifier for the session
    #[serde(default, deserialize_with = "id_text")]
    pub id: String,

    /// Session date (`YYYY-MM-DD` or an RFC 3339 timestamp)
    #[serde(default, alias = "data", alias = "data_sessao", alias = "date", deserialize_with = "lenient_text")]
    pub data_registro: Option<String>,

    /// Start time of day (`HH:MM`)
    #[serde(default, alias = "horario_inicio", alias = "start_time", deserialize_with = "lenient_text")]
    pub hora_inicio: Option<String>,

    /// End time of day (`HH:MM`)
    #[serde(default, alias = "horario_fim", alias = "end_time", deserialize_with = "lenient_text")]
    pub hora_fim: Option<String>,

    /// Systolic blood pressure (mmHg)
    #[serde(default, alias = "pressao_arterial_sistolica", alias = "systolic", deserialize_with = "lenient_f64")]
    pub pressao_sistolica: Option<f64>,

    /// Diastolic blood pressure (mmHg)
    #[serde(default, alias = "pressao_arterial_diastolica", alias = "diastolic", deserialize_with = "lenient_f64")]
    pub pressao_diastolica: Option<f64>,

    /// Weight before the session (kg)
    #[serde(default, alias = "peso_pre_dialise", deserialize_with = "lenient_f64")]
    pub peso_pre: Option<f64>,

    /// Weight after the session (kg)
    #[serde(default, alias = "peso_pos_dialise", deserialize_with = "lenient_f64")]
    pub peso_pos: Option<f64>,

    /// Initial drainage volume (mL)
    #[serde(default, alias = "volume_drenagem_inicial", deserialize_with = "lenient_f64")]
    pub drenagem_inicial: Option<f64>,

    /// Total ultrafiltration volume (mL)
    #[serde(default, alias = "ultrafiltracao", alias = "volume_uf", deserialize_with = "lenient_f64")]
    pub uf_total: Option<f64>,

    /// Dwell time (minutes)
    #[serde(default, alias = "tempo_permanencia_min", deserialize_with = "lenient_f64")]
    pub tempo_permanencia: Option<f64>,

    /// Glucose concentration (mg/dL)
    #[serde(default, alias = "glicemia", alias = "concentracao_glicose", deserialize_with = "lenient_f64")]
    pub glicose: Option<f64>,

    /// Dextrose concentration (%)
    #[serde(default, alias = "dextrose", deserialize_with = "lenient_f64")]
    pub concentracao_dextrose: Option<f64>,

    /// Free-text symptoms reported during the session
    #[serde(default, deserialize_with = "lenient_text")]
    pub sintomas: Option<String>,

    /// Free-text observations
    #[serde(default, alias = "observacao", deserialize_with = "lenient_text")]
    pub observacoes: Option<String>,
}

/// Average blood pressure object, as pre-computed by the API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AverageBloodPressure {
    #[serde(default, alias = "systolic", deserialize_with = "lenient_f64")]
    pub sistolica: Option<f64>,

    #[serde(default, alias = "diastolic", deserialize_with = "lenient_f64")]
    pub diastolica: Option<f64>,
}

/// Pre-aggregated period statistics from the API
///
/// Blood pressure averages come either as an object (`pressao_arterial_media`)
/// or as flat keys (`media_sistolica`, `media_diastolica`); the object wins
/// when both are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodStatistics {
    /// Number of sessions the API counted in the period
    #[serde(default, alias = "total_sessoes", deserialize_with = "lenient_f64")]
    pub total_registros: Option<f64>,

    /// Average blood pressure object
    #[serde(default, alias = "media_pressao_arterial")]
    pub pressao_arterial_media: Option<AverageBloodPressure>,

    /// Average systolic pressure (flat form)
    #[serde(default, alias = "pressao_sistolica_media", deserialize_with = "lenient_f64")]
    pub media_sistolica: Option<f64>,

    /// Average diastolic pressure (flat form)
    #[serde(default, alias = "pressao_diastolica_media", deserialize_with = "lenient_f64")]
    pub media_diastolica: Option<f64>,

    /// Average ultrafiltration (mL)
    #[serde(default, alias = "media_uf", deserialize_with = "lenient_f64")]
    pub uf_media: Option<f64>,

    /// Average glucose (mg/dL)
    #[serde(default, alias = "media_glicose", deserialize_with = "lenient_f64")]
    pub glicose_media: Option<f64>,

    /// Average dwell time (minutes)
    #[serde(default, alias = "media_tempo_permanencia", deserialize_with = "lenient_f64")]
    pub tempo_permanencia_medio: Option<f64>,
}

impl PeriodStatistics {
    /// Pre-computed systolic average, object form first
    pub fn systolic_average(&self) -> Option<f64> {
        self.pressao_arterial_media
            .as_ref()
            .and_then(|avg| avg.sistolica)
            .or(self.media_sistolica)
    }

    /// Pre-computed diastolic average, object form first
    pub fn diastolic_average(&self) -> Option<f64> {
        self.pressao_arterial_media
            .as_ref()
            .and_then(|avg| avg.diastolica)
            .or(self.media_diastolica)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_accepts_alternate_keys() {
        let live: DialysisSessionRecord = serde_json::from_str(
            r#"{"id": 7, "data_registro": "2024-03-10", "pressao_sistolica": 130, "uf_total": 2500}"#,
        )
        .unwrap();
        let mocked: DialysisSessionRecord = serde_json::from_str(
            r#"{"id": "7", "data": "2024-03-10", "pressao_arterial_sistolica": "130", "ultrafiltracao": "2500"}"#,
        )
        .unwrap();

        assert_eq!(live, mocked);
        assert_eq!(live.id, "7");
        assert_eq!(live.uf_total, Some(2500.0));
    }

    #[test]
    fn test_session_with_malformed_fields_still_parses() {
        let record: DialysisSessionRecord = serde_json::from_str(
            r#"{"id": 1, "data_registro": "2024-03-10", "glicose": "n/a", "sintomas": "   "}"#,
        )
        .unwrap();

        assert_eq!(record.glicose, None);
        assert_eq!(record.sintomas, None);
    }

    #[test]
    fn test_statistics_average_object_takes_precedence() {
        let stats: PeriodStatistics = serde_json::from_str(
            r#"{"pressao_arterial_media": {"sistolica": 128}, "media_sistolica": 140, "media_diastolica": 85}"#,
        )
        .unwrap();

        assert_eq!(stats.systolic_average(), Some(128.0));
        // The object has no diastolic value, so the flat key is used
        assert_eq!(stats.diastolic_average(), Some(85.0));
    }
}
