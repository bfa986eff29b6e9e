//! Input validation shared by the finance tools.
//!
//! Each function takes the field name it validates so failures always say
//! which argument broke which constraint. Nothing here coerces implicitly:
//! a value either parses into its typed form or is rejected.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Maximum length of free-text notes.
pub const NOTE_MAX_LEN: usize = 500;

/// Maximum length of a category name.
pub const CATEGORY_NAME_MAX_LEN: usize = 80;

/// A constraint violation on one input field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field '{field}' {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Movement direction. Serialized exactly as the backend spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementType {
    Ingreso,
    Egreso,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ingreso => "INGRESO",
            Self::Egreso => "EGRESO",
        }
    }
}

/// Strictly positive decimal amount.
///
/// Accepts a JSON number or a numeric string. Numbers are read from their
/// textual form so `0.1` stays exactly `0.1`.
pub fn amount(field: &str, value: &Value) -> ValidationResult<Decimal> {
    let parsed = match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .map_err(|_| unrepresentable(field, n.as_f64()))?
        }
        Value::String(s) => Decimal::from_str(s.trim())
            .map_err(|_| ValidationError::new(field, "must be a decimal number"))?,
        _ => {
            return Err(ValidationError::new(field, "must be a decimal number"));
        }
    };

    if parsed <= Decimal::ZERO {
        return Err(ValidationError::new(field, "must be greater than 0"));
    }
    Ok(parsed)
}

/// A valid JSON number that does not fit a decimal amount.
fn unrepresentable(field: &str, value: Option<f64>) -> ValidationError {
    match value {
        Some(v) if v <= 0.0 => ValidationError::new(field, "must be greater than 0"),
        Some(v) if v.abs() < 1.0 => ValidationError::new(
            field,
            format!("has too many decimal places (at most {})", Decimal::MAX_SCALE),
        ),
        _ => ValidationError::new(field, "is too large"),
    }
}

/// Identifier of a backend entity: integer `>= 1`.
pub fn positive_id(field: &str, value: i64) -> ValidationResult<i64> {
    if value < 1 {
        return Err(ValidationError::new(field, "must be greater than or equal to 1"));
    }
    Ok(value)
}

/// Calendar date in exact `YYYY-MM-DD` form.
pub fn date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    let invalid = || {
        ValidationError::new(
            field,
            format!("must be a valid date in yyyy-MM-dd format, got '{}'", value),
        )
    };

    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return Err(invalid());
    }
    let year = digits(&value[0..4]).ok_or_else(invalid)?;
    let month = digits(&value[5..7]).ok_or_else(invalid)?;
    let day = digits(&value[8..10]).ok_or_else(invalid)?;
    if year == 0 {
        return Err(invalid());
    }

    NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(invalid)
}

/// Year and month in exact `YYYY-MM` form.
pub fn year_month(field: &str, value: &str) -> ValidationResult<String> {
    let invalid = || {
        ValidationError::new(
            field,
            format!("must be a year-month in yyyy-MM format, got '{}'", value),
        )
    };

    let bytes = value.as_bytes();
    if bytes.len() != 7 || bytes[4] != b'-' {
        return Err(invalid());
    }
    let year = digits(&value[0..4]).ok_or_else(invalid)?;
    let month = digits(&value[5..7]).ok_or_else(invalid)?;
    if year == 0 || !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok(value.to_string())
}

/// `INGRESO` or `EGRESO`, case-sensitive.
pub fn movement_type(field: &str, value: &str) -> ValidationResult<MovementType> {
    match value {
        "INGRESO" => Ok(MovementType::Ingreso),
        "EGRESO" => Ok(MovementType::Egreso),
        other => Err(ValidationError::new(
            field,
            format!("must be one of INGRESO, EGRESO, got '{}'", other),
        )),
    }
}

/// Optional note of at most [`NOTE_MAX_LEN`] characters.
pub fn note(field: &str, value: Option<String>) -> ValidationResult<Option<String>> {
    match value {
        Some(text) if text.chars().count() > NOTE_MAX_LEN => Err(ValidationError::new(
            field,
            format!("must be at most {} characters", NOTE_MAX_LEN),
        )),
        other => Ok(other),
    }
}

/// Text with a character-length range.
pub fn text(field: &str, value: &str, min: usize, max: usize) -> ValidationResult<String> {
    let len = value.chars().count();
    if len < min {
        return Err(ValidationError::new(
            field,
            format!("must be at least {} character(s)", min),
        ));
    }
    if len > max {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters", max),
        ));
    }
    Ok(value.to_string())
}

/// Billing day of month, 1 to 31. No calendar check: the backend decides
/// what day 31 means in a 30-day month.
pub fn day_of_month(field: &str, value: i64) -> ValidationResult<u8> {
    if !(1..=31).contains(&value) {
        return Err(ValidationError::new(field, "must be between 1 and 31"));
    }
    Ok(value as u8)
}

/// Integer within an inclusive range.
pub fn in_range(field: &str, value: i64, min: i64, max: i64) -> ValidationResult<i64> {
    if value < min || value > max {
        return Err(ValidationError::new(
            field,
            format!("must be between {} and {}", min, max),
        ));
    }
    Ok(value)
}

/// Optional filter: empty or blank strings mean "no filter".
pub fn optional_filter(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn digits(s: &str) -> Option<u32> {
    if s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}
