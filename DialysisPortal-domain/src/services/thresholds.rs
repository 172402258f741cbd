use crate::entities::SessionStatus;

/// Upper systolic bound still considered normal (mmHg)
pub const SYSTOLIC_HIGH: u16 = 140;
/// Upper diastolic bound still considered normal (mmHg)
pub const DIASTOLIC_HIGH: u16 = 90;
/// Lower systolic bound still considered normal (mmHg)
pub const SYSTOLIC_LOW: u16 = 90;
/// Lower diastolic bound still considered normal (mmHg)
pub const DIASTOLIC_LOW: u16 = 60;

/// Classify a session's blood pressure
///
/// Attention when systolic > 140, diastolic > 90, systolic < 90 or
/// diastolic < 60. The bounds themselves are normal. A missing value only
/// disables its own checks.
pub fn classify(systolic: Option<u16>, diastolic: Option<u16>) -> SessionStatus {
    let systolic_out = systolic.is_some_and(|s| s > SYSTOLIC_HIGH || s < SYSTOLIC_LOW);
    let diastolic_out = diastolic.is_some_and(|d| d > DIASTOLIC_HIGH || d < DIASTOLIC_LOW);

    if systolic_out || diastolic_out {
        SessionStatus::Attention
    } else {
        SessionStatus::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_normal() {
        assert_eq!(classify(Some(140), Some(90)), SessionStatus::Normal);
        assert_eq!(classify(Some(90), Some(60)), SessionStatus::Normal);
    }

    #[test]
    fn test_high_values_need_attention() {
        assert_eq!(classify(Some(141), Some(90)), SessionStatus::Attention);
        assert_eq!(classify(Some(120), Some(91)), SessionStatus::Attention);
    }

    #[test]
    fn test_low_values_need_attention() {
        assert_eq!(classify(Some(90), Some(59)), SessionStatus::Attention);
        assert_eq!(classify(Some(89), Some(70)), SessionStatus::Attention);
    }

    #[test]
    fn test_missing_values() {
        assert_eq!(classify(None, None), SessionStatus::Normal);
        assert_eq!(classify(None, Some(95)), SessionStatus::Attention);
        assert_eq!(classify(Some(150), None), SessionStatus::Attention);
        assert_eq!(classify(Some(120), None), SessionStatus::Normal);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let first = classify(Some(150), Some(95));
        for _ in 0..10 {
            assert_eq!(classify(Some(150), Some(95)), first);
        }
    }
}
