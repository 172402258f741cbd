use std::collections::BTreeMap;

use crate::entities::{
    AggregatedStatistics, DateRange, NormalizedSessionView, NormalizedSymptomView, PrecomputedAverages,
    SessionStatus, SymptomSummary,
};
use crate::services::normalizer::ml_to_liters;

/// Mean of the present values, `None` when there are none
fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Aggregate count and mean statistics over a filtered session collection
///
/// Blood pressure means only use sessions carrying both values; averages
/// pre-computed by the portal win over the local ones. Every other mean
/// skips a session lacking its own field.
pub fn aggregate_statistics(
    sessions: &[NormalizedSessionView],
    period: DateRange,
    precomputed: PrecomputedAverages,
) -> AggregatedStatistics {
    let bp_pairs: Vec<(f64, f64)> = sessions
        .iter()
        .filter_map(|s| Some((f64::from(s.systolic?), f64::from(s.diastolic?))))
        .collect();

    let mean_systolic = precomputed
        .systolic
        .or_else(|| mean(bp_pairs.iter().map(|(s, _)| *s)))
        .map(f64::round);
    let mean_diastolic = precomputed
        .diastolic
        .or_else(|| mean(bp_pairs.iter().map(|(_, d)| *d)))
        .map(f64::round);

    AggregatedStatistics {
        total_records: sessions.len(),
        period_start: period.start,
        period_end: period.end,
        mean_systolic,
        mean_diastolic,
        mean_uf_liters: mean(sessions.iter().filter_map(|s| s.uf_ml)).map(ml_to_liters),
        mean_glucose: mean(sessions.iter().filter_map(|s| s.glucose_mg_dl)).map(f64::round),
        mean_dwell_time: mean(sessions.iter().filter_map(|s| s.dwell_time_min)).map(f64::round),
        sessions_with_symptoms: sessions
            .iter()
            .filter(|s| s.symptoms.as_deref().is_some_and(|t| !t.trim().is_empty()))
            .count(),
        sessions_needing_attention: sessions
            .iter()
            .filter(|s| s.status == SessionStatus::Attention)
            .count(),
    }
}

/// Count symptoms per severity and category
pub fn summarize_symptoms(symptoms: &[NormalizedSymptomView]) -> SymptomSummary {
    let mut by_severity = BTreeMap::new();
    let mut by_category = BTreeMap::new();
    let mut by_name: BTreeMap<&str, usize> = BTreeMap::new();

    for symptom in symptoms {
        *by_severity.entry(symptom.severity_label.clone()).or_insert(0) += 1;
        *by_category.entry(symptom.category.clone()).or_insert(0) += 1;
        *by_name.entry(symptom.name.as_str()).or_insert(0) += 1;
    }

    // Strict comparison keeps the alphabetically first name on ties
    let mut most_frequent: Option<(&str, usize)> = None;
    for (name, count) in by_name {
        if most_frequent.map_or(true, |(_, best)| count > best) {
            most_frequent = Some((name, count));
        }
    }

    SymptomSummary {
        total: symptoms.len(),
        by_severity,
        by_category,
        most_frequent: most_frequent.map(|(name, _)| name.to_string()),
    }
}
