use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CLIENT_NAME_COLUMN: &str = "Client Name";
pub const PHONE_NUMBER_COLUMN: &str = "Phone Number";

/// Tabla subida por el operador (cabecera + filas), equivalente al CSV.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipientTable {
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

impl RecipientTable {
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == label)
    }
}

/// Una fila de la tabla, ya extraída por columnas.
#[derive(Debug, Clone)]
pub struct RecipientRow {
    pub index: usize,
    pub client_name: String,
    pub raw_phone: Value,
}

/// Teléfono en formato internacional (+61...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalPhone(String);

impl CanonicalPhone {
    pub(crate) fn from_digits(digits: &str) -> Self {
        CanonicalPhone(format!("+{digits}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedRecipient {
    pub index: usize,
    pub client_name: String,
    pub phone: CanonicalPhone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    pub index: usize,
    pub client_name: String,
    pub reason: String,
}

/// Resultado de validar el lote completo.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationOutcome {
    pub valid: Vec<ValidatedRecipient>,
    pub errors: Vec<RowError>,
}
