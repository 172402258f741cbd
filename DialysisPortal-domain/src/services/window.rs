use chrono::NaiveDate;

use crate::entities::{
    DateRange, DialysisSession, NormalizedSessionView, NormalizedSymptomView, PeriodWindow, Symptom,
};

/// Anything carrying a calendar date the window filter can test
pub trait Dated {
    /// `None` when the record has no usable date
    fn record_date(&self) -> Option<NaiveDate>;
}

impl Dated for DialysisSession {
    fn record_date(&self) -> Option<NaiveDate> {
        self.date()
    }
}

impl Dated for Symptom {
    fn record_date(&self) -> Option<NaiveDate> {
        self.date()
    }
}

impl Dated for NormalizedSessionView {
    fn record_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }
}

impl Dated for NormalizedSymptomView {
    fn record_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }
}

/// Keep records dated inside `range` (both ends inclusive)
///
/// Undated records are dropped. Input order is kept.
pub fn filter_between<T: Dated>(records: Vec<T>, range: DateRange) -> Vec<T> {
    records
        .into_iter()
        .filter(|record| record.record_date().is_some_and(|date| range.contains(date)))
        .collect()
}

/// Keep records dated within the trailing `window` ending `today`
pub fn filter_window<T: Dated>(records: Vec<T>, window: PeriodWindow, today: NaiveDate) -> Vec<T> {
    filter_between(records, window.date_range(today))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(id: &str, date: Option<NaiveDate>) -> DialysisSession {
        DialysisSession {
            id: id.to_string(),
            recorded_at: date.and_then(|d| d.and_hms_opt(9, 0, 0)),
            ..Default::default()
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let sessions = vec![
            session("edge", Some(today() - Duration::days(7))),
            session("outside", Some(today() - Duration::days(8))),
            session("today", Some(today())),
        ];

        let filtered = filter_window(sessions, PeriodWindow::Week, today());
        let ids: Vec<_> = filtered.iter().map(|s| s.id.as_str()).collect();

        assert_eq!(ids, vec!["edge", "today"]);
    }

    #[test]
    fn test_future_and_undated_records_excluded() {
        let sessions = vec![
            session("tomorrow", Some(today() + Duration::days(1))),
            session("undated", None),
        ];

        assert!(filter_window(sessions, PeriodWindow::Year, today()).is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let sessions: Vec<_> = (0..40)
            .map(|i| session(&i.to_string(), Some(today() - Duration::days(i))))
            .collect();

        let once = filter_window(sessions, PeriodWindow::Month, today());
        let twice = filter_window(once.clone(), PeriodWindow::Month, today());

        assert_eq!(once.len(), 31);
        assert_eq!(once, twice);
    }
}
