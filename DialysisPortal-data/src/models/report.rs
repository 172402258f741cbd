use serde::{Deserialize, Serialize};

use super::{id_text, lenient_text, DialysisSessionRecord, PeriodStatistics};

/// Patient identity block of the report payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientInfo {
    #[serde(default, deserialize_with = "id_text")]
    pub id: String,

    #[serde(default, alias = "name", alias = "nome_completo", deserialize_with = "lenient_text")]
    pub nome: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,

    #[serde(default, alias = "celular", deserialize_with = "lenient_text")]
    pub telefone: Option<String>,

    #[serde(default, alias = "nascimento", deserialize_with = "lenient_text")]
    pub data_nascimento: Option<String>,
}

/// Period the report covers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportPeriod {
    #[serde(default, alias = "data_inicio", alias = "start", deserialize_with = "lenient_text")]
    pub inicio: Option<String>,

    #[serde(default, alias = "data_fim", alias = "end", deserialize_with = "lenient_text")]
    pub fim: Option<String>,
}

/// Medication in the patient's current prescription
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    #[serde(default, alias = "medicamento", deserialize_with = "lenient_text")]
    pub nome: Option<String>,

    #[serde(default, alias = "dose", deserialize_with = "lenient_text")]
    pub dosagem: Option<String>,

    #[serde(default, alias = "posologia", deserialize_with = "lenient_text")]
    pub frequencia: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    pub observacoes: Option<String>,
}

/// Full payload used to generate a patient report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportPayload {
    #[serde(default, alias = "patient")]
    pub paciente: PatientInfo,

    #[serde(default, alias = "period")]
    pub periodo: ReportPeriod,

    #[serde(default, alias = "statistics")]
    pub estatisticas: Option<PeriodStatistics>,

    #[serde(default, alias = "sessoes", alias = "registros_dialise")]
    pub registros: Vec<DialysisSessionRecord>,

    #[serde(default, alias = "medicacoes", alias = "medications")]
    pub medicamentos: Vec<Medication>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_with_missing_sections() {
        let payload: ReportPayload = serde_json::from_str(
            r#"{"paciente": {"id": 9, "nome": "Maria Souza"}, "sessoes": [{"id": 1}]}"#,
        )
        .unwrap();

        assert_eq!(payload.paciente.id, "9");
        assert_eq!(payload.registros.len(), 1);
        assert!(payload.medicamentos.is_empty());
        assert!(payload.estatisticas.is_none());
        assert_eq!(payload.periodo, ReportPeriod::default());
    }
}
