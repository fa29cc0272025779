//! Field-level schema rules
//!
//! Request bodies arrive as loose JSON objects. Each reader here pulls one field
//! out, casts it to the stored type and reports a [`FieldError`] carrying the
//! user-facing message when the field is missing or cannot be cast. A value is
//! missing when absent, `null`, or (for strings) empty after trimming.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};

use crate::error::FieldError;

/// A request body: the JSON object the client sent
pub type Body = Map<String, Value>;

/// User-facing validation messages
pub mod messages {
    pub const TASK_TITLE_REQUIRED: &str = "O título da tarefa é obrigatório.";
    pub const TASK_COMPLETED_INVALID: &str = "O campo concluída deve ser verdadeiro ou falso.";

    pub const TRANSACTION_DESCRIPTION_REQUIRED: &str = "A descrição da transação é obrigatória.";
    pub const TRANSACTION_AMOUNT_REQUIRED: &str = "O valor da transação é obrigatório.";
    pub const TRANSACTION_AMOUNT_INVALID: &str = "O valor da transação deve ser numérico.";
    pub const TRANSACTION_DATE_REQUIRED: &str = "A data da transação é obrigatória.";
    pub const TRANSACTION_DATE_INVALID: &str = "A data da transação é inválida.";
    pub const TRANSACTION_TYPE_REQUIRED: &str = "O tipo da transação é obrigatório (income/expense).";
    pub const TRANSACTION_CATEGORY_REQUIRED: &str = "A categoria da transação é obrigatória.";

    pub fn transaction_type_invalid(value: &str) -> String {
        format!("`{}` não é um tipo de transação válido (income/expense).", value)
    }

    pub fn invalid_value(field: &str) -> String {
        format!("Valor inválido para o campo {}.", field)
    }
}

fn present<'a>(body: &'a Body, field: &str) -> Option<&'a Value> {
    body.get(field).filter(|value| !value.is_null())
}

/// Required string, trimmed. Numbers and booleans are cast to their text form.
pub fn required_string(body: &Body, field: &str, required: &str) -> Result<String, FieldError> {
    match present(body, field) {
        None => Err(FieldError::new(field, required)),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Err(FieldError::new(field, required))
            } else {
                Ok(trimmed.to_string())
            }
        }
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(_) => Err(FieldError::new(field, messages::invalid_value(field))),
    }
}

/// Optional boolean; accepts `true`/`false`, `"true"`/`"false"` and `0`/`1`
pub fn optional_bool(body: &Body, field: &str, invalid: &str) -> Result<Option<bool>, FieldError> {
    let value = match present(body, field) {
        None => return Ok(None),
        Some(value) => value,
    };
    let parsed = match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        Value::Number(n) => match n.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        _ => None,
    };
    parsed
        .map(Some)
        .ok_or_else(|| FieldError::new(field, invalid))
}

/// Required finite number; numeric strings are cast
pub fn required_number(
    body: &Body,
    field: &str,
    required: &str,
    invalid: &str,
) -> Result<f64, FieldError> {
    let number = match present(body, field) {
        None => return Err(FieldError::new(field, required)),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(FieldError::new(field, required));
            }
            trimmed.parse::<f64>().ok()
        }
        Some(_) => None,
    };
    number
        .filter(|n| n.is_finite())
        .ok_or_else(|| FieldError::new(field, invalid))
}

/// Required timestamp: date-time string, plain date, or epoch milliseconds
pub fn required_date(
    body: &Body,
    field: &str,
    required: &str,
    invalid: &str,
) -> Result<DateTime<Utc>, FieldError> {
    let date = match present(body, field) {
        None => return Err(FieldError::new(field, required)),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(FieldError::new(field, required));
            }
            parse_date(trimmed)
        }
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        Some(_) => None,
    };
    date.ok_or_else(|| FieldError::new(field, invalid))
}

/// Required enumerated string. `invalid` builds the message from the rejected value.
pub fn required_enum<T, F>(body: &Body, field: &str, required: &str, invalid: F) -> Result<T, FieldError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> String,
{
    match present(body, field) {
        None => Err(FieldError::new(field, required)),
        Some(Value::String(s)) if s.is_empty() => Err(FieldError::new(field, required)),
        Some(Value::String(s)) => s.parse().map_err(|_| FieldError::new(field, invalid(s))),
        Some(other) => Err(FieldError::new(field, invalid(&other.to_string()))),
    }
}

/// Parse the date formats clients send
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
