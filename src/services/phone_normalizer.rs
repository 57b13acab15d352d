//! services/phone_normalizer.rs
//! Normaliza teléfonos ingresados a mano al formato internacional (+61...).
//!
//! Heurística fija para Australia: no valida largo ni formato nacional, y una
//! entrada sin dígitos termina en "+61". El gateway es quien rechaza esos casos.

use serde_json::Value;

use crate::error::{MessagingError, MessagingResult};
use crate::models::recipient_model::CanonicalPhone;

pub const DEFAULT_COUNTRY_CODE: &str = "61";

/// Normaliza una celda de la tabla (texto o número).
pub fn normalize(raw: &Value) -> MessagingResult<CanonicalPhone> {
    let text = coerce_to_text(raw)?;
    Ok(normalize_str(&text))
}

/// Normaliza un teléfono ya en texto. Nunca falla.
pub fn normalize_str(raw: &str) -> CanonicalPhone {
    let mut cleaned = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_digit() || (c == '+' && cleaned.is_empty()) {
            cleaned.push(c);
        }
    }

    let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);

    if digits.starts_with(DEFAULT_COUNTRY_CODE) {
        CanonicalPhone::from_digits(digits)
    } else {
        let national = digits.trim_start_matches('0');
        CanonicalPhone::from_digits(&format!("{DEFAULT_COUNTRY_CODE}{national}"))
    }
}

fn coerce_to_text(raw: &Value) -> MessagingResult<String> {
    match raw {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Err(MessagingError::InvalidPhoneFormat(
            "phone number is missing".to_string(),
        )),
        other => Err(MessagingError::InvalidPhoneFormat(format!(
            "cannot read a phone number from {other}"
        ))),
    }
}
