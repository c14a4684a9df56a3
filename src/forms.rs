//! Form Helpers
//!
//! Submit-time checks shared by every form: required fields and numeric
//! inputs. Everything else is validated by the backend.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{0} must be a number")]
    NotANumber(&'static str),

    #[error("{field} must be at least {min}")]
    BelowMinimum { field: &'static str, min: f64 },
}

/// Reject blank values
pub fn require(field: &'static str, value: &str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        return Err(FormError::Missing(field));
    }
    Ok(())
}

/// Parse a required numeric input and enforce its lower bound
pub fn require_number(field: &'static str, value: &str, min: f64) -> Result<f64, FormError> {
    require(field, value)?;

    let number: f64 = value
        .trim()
        .parse()
        .map_err(|_| FormError::NotANumber(field))?;

    if !number.is_finite() {
        return Err(FormError::NotANumber(field));
    }
    if number < min {
        return Err(FormError::BelowMinimum { field, min });
    }
    Ok(number)
}

/// Today's date in the `YYYY-MM-DD` form used by date inputs
pub fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Numeric reading of a backend value; decimals arrive as strings
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Render a backend value for display
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Progress of `value` towards `max` in percent, capped at 100.
/// A missing or zero `max` counts as 1.
pub fn progress_percent(value: &Value, max: &Value) -> f64 {
    let value = as_number(value).unwrap_or(0.0);
    let max = as_number(max).filter(|m| *m != 0.0).unwrap_or(1.0);
    (value / max * 100.0).min(100.0)
}
