use serde::{Deserialize, Serialize};

use super::{id_text, lenient_text, opt_id_text};

/// Symptom record as returned by the portal API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymptomRecord {
    /// Unique identifier for the symptom entry
    #[serde(default, deserialize_with = "id_text")]
    pub id: String,

    /// Owning dialysis session, if the symptom was logged with one
    #[serde(default, alias = "sessao_id", alias = "dialise_id", deserialize_with = "opt_id_text")]
    pub registro_dialise_id: Option<String>,

    /// Record date (`YYYY-MM-DD` or an RFC 3339 timestamp)
    #[serde(default, alias = "data", alias = "data_sintoma", alias = "created_at", deserialize_with = "lenient_text")]
    pub data_registro: Option<String>,

    /// Symptom name
    #[serde(default, alias = "sintoma", alias = "sintoma_nome", alias = "nome_sintoma", deserialize_with = "lenient_text")]
    pub nome: Option<String>,

    /// Category (respiratório, gastrointestinal, circulatório, geral, ...)
    #[serde(default, deserialize_with = "lenient_text")]
    pub categoria: Option<String>,

    /// Severity label (`leve`, `moderada`, `grave`, `muito_grave`)
    #[serde(default, alias = "intensidade", alias = "severity", deserialize_with = "lenient_text")]
    pub severidade: Option<String>,

    /// Free-text note
    #[serde(default, alias = "descricao", alias = "observacao", deserialize_with = "lenient_text")]
    pub observacoes: Option<String>,
}
