use chrono::{DateTime, SubsecRound, Utc};

use crate::error::{AppError, AppResult};

/// Current UTC time truncated to whole seconds
///
/// All record timestamps use second precision.
pub fn now_seconds() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// Generate a fresh domain id for a new record
pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Round `amount` to `precision` decimal places, halves away from zero.
///
/// Scales, adds a signed one half, truncates toward zero, then scales back.
pub fn to_fixed(amount: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    let scaled = amount * factor;
    (scaled + 0.5f64.copysign(scaled)).trunc() / factor
}

/// Normalize a monetary amount to two places
///
/// Rejects amounts whose scaled value leaves the finite range, so a stored
/// price always decodes back as a number.
pub fn normalize_price(amount: f64, field: &str) -> AppResult<f64> {
    let normalized = to_fixed(amount, 2);
    if normalized.is_finite() {
        Ok(normalized)
    } else {
        Err(AppError::validation(format!("Validation failed: {field}"))
            .with_detail("fields", serde_json::json!({ field: ["range"] })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_price() {
        assert_eq!(normalize_price(9.999, "price").unwrap(), 10.0);

        let err = normalize_price(1e307, "unit_price").unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert_eq!(details["fields"]["unit_price"][0], "range");

        assert!(normalize_price(f64::INFINITY, "price").is_err());
    }

    #[test]
    fn test_to_fixed_half_away_from_zero() {
        assert_eq!(to_fixed(2.345, 2), 2.35);
        assert_eq!(to_fixed(-2.345, 2), -2.35);
        assert_eq!(to_fixed(2.344, 2), 2.34);
        assert_eq!(to_fixed(0.125, 2), 0.13);
    }

    #[test]
    fn test_to_fixed_carries_into_units() {
        assert_eq!(to_fixed(9.999, 2), 10.0);
        assert_eq!(to_fixed(15.5, 2), 15.5);
        assert_eq!(to_fixed(0.0, 2), 0.0);
    }

    #[test]
    fn test_now_seconds_has_no_subsecond_part() {
        assert_eq!(now_seconds().timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn test_record_ids_are_unique() {
        let a = new_record_id();
        let b = new_record_id();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }
}
