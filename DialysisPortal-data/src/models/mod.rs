// Raw record shapes as returned by the portal API.
//
// Field names follow the live API; mocked and older responses use different
// keys for the same value, which are accepted through serde aliases. Numeric
// fields are read leniently: a value that is missing, null or not a number
// becomes `None` instead of failing the whole record.

pub mod dialysis;
pub mod report;
pub mod symptom;

pub use dialysis::{AverageBloodPressure, DialysisSessionRecord, PeriodStatistics};
pub use report::{Medication, PatientInfo, ReportPayload, ReportPeriod};
pub use symptom::SymptomRecord;

use serde::{Deserialize, Deserializer};

#[allow(dead_code)]
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseValue {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

/// Read an identifier that may be sent as a string or as a number
pub(crate) fn id_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_id_text(deserializer)?.unwrap_or_default())
}

/// Read an optional identifier that may be sent as a string, a number or null
pub(crate) fn opt_id_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<LooseValue>::deserialize(deserializer)?;
    Ok(match value {
        Some(LooseValue::Text(text)) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Some(LooseValue::Number(number)) if number.fract() == 0.0 => Some(format!("{}", number as i64)),
        Some(LooseValue::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

/// Read an optional number, accepting numeric strings ("12,5" or "12.5")
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<LooseValue>::deserialize(deserializer)?;
    Ok(match value {
        Some(LooseValue::Number(number)) if number.is_finite() => Some(number),
        Some(LooseValue::Text(text)) => text
            .trim()
            .replace(',', ".")
            .parse::<f64>()
            .ok()
            .filter(|number| number.is_finite()),
        _ => None,
    })
}

/// Read optional free text, treating blank strings as absent
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<LooseValue>::deserialize(deserializer)?;
    Ok(match value {
        Some(LooseValue::Text(text)) if !text.trim().is_empty() => Some(text),
        Some(LooseValue::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "lenient_f64")]
        value: Option<f64>,
        #[serde(default, deserialize_with = "opt_id_text")]
        id: Option<String>,
    }

    fn decode_sample(json: &str) -> Sample {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_lenient_number_accepts_numeric_strings() {
        assert_eq!(decode_sample(r#"{"value": "12,5"}"#).value, Some(12.5));
        assert_eq!(decode_sample(r#"{"value": 80}"#).value, Some(80.0));
    }

    #[test]
    fn test_lenient_number_degrades_garbage_to_none() {
        assert_eq!(decode_sample(r#"{"value": "abc"}"#).value, None);
        assert_eq!(decode_sample(r#"{"value": null}"#).value, None);
        assert_eq!(decode_sample(r#"{"value": {"nested": 1}}"#).value, None);
        assert_eq!(decode_sample(r#"{}"#).value, None);
    }

    #[test]
    fn test_identifiers_from_numbers_and_strings() {
        assert_eq!(decode_sample(r#"{"id": 42}"#).id.as_deref(), Some("42"));
        assert_eq!(decode_sample(r#"{"id": "abc-1"}"#).id.as_deref(), Some("abc-1"));
        assert_eq!(decode_sample(r#"{"id": ""}"#).id, None);
    }
}
