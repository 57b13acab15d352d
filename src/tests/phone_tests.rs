//! tests/phone_tests.rs
//! Pruebas de normalización de teléfonos.

use serde_json::json;

use crate::error::MessagingError;
use crate::services::phone_normalizer::{normalize, normalize_str};

#[test]
fn test_local_mobile_gets_country_code() {
    assert_eq!(normalize_str("0412345678").as_str(), "+61412345678");
}

#[test]
fn test_already_international_is_unchanged() {
    assert_eq!(normalize_str("+61412345678").as_str(), "+61412345678");
    assert_eq!(normalize_str("61412345678").as_str(), "+61412345678");
}

#[test]
fn test_no_leading_zero_no_country_code() {
    assert_eq!(normalize_str("412345678").as_str(), "+61412345678");
}

#[test]
fn test_separators_are_stripped() {
    assert_eq!(normalize_str("0412 345 678").as_str(), "+61412345678");
    assert_eq!(normalize_str("(04) 1234-5678").as_str(), "+61412345678");
    assert_eq!(normalize_str("+61 412.345.678").as_str(), "+61412345678");
}

#[test]
fn test_interior_plus_is_dropped() {
    assert_eq!(normalize_str("0412+345678").as_str(), "+61412345678");
    assert_eq!(normalize_str("++61412345678").as_str(), "+61412345678");
}

#[test]
fn test_all_leading_zeros_are_stripped() {
    assert_eq!(normalize_str("000412345678").as_str(), "+61412345678");
}

#[test]
fn test_empty_input_still_yields_country_code() {
    // Comportamiento documentado: no se rechaza, el gateway lo hará
    assert_eq!(normalize_str("").as_str(), "+61");
    assert_eq!(normalize_str("n/a").as_str(), "+61");
}

#[test]
fn test_normalize_is_idempotent() {
    for raw in ["0412345678", "+61 400 000 000", "412345678", "0061412345678", ""] {
        let once = normalize_str(raw);
        let twice = normalize_str(once.as_str());
        assert_eq!(once, twice, "No es idempotente para {raw:?}");
    }
}

#[test]
fn test_numeric_cells_are_coerced() {
    let phone = normalize(&json!(412345678)).expect("número debería convertirse");
    assert_eq!(phone.as_str(), "+61412345678");

    let phone = normalize(&json!(61412345678u64)).expect("número debería convertirse");
    assert_eq!(phone.as_str(), "+61412345678");
}

#[test]
fn test_uncoercible_cells_are_rejected() {
    for cell in [json!(null), json!(true), json!(["0412345678"]), json!({"n": 1})] {
        let err = normalize(&cell).expect_err("debería fallar");
        assert!(
            matches!(err, MessagingError::InvalidPhoneFormat(_)),
            "error inesperado para {cell}: {err:?}"
        );
    }
}
